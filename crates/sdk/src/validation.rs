//! Input validation
//!
//! Pure predicates applied at the ingest surface before any work happens,
//! plus the api-key decoder used at configuration time.

use crate::error::TellError;

/// Maximum event name length in bytes
pub(crate) const MAX_EVENT_NAME_LENGTH: usize = 256;

/// Maximum log message length in bytes
pub(crate) const MAX_LOG_MESSAGE_LENGTH: usize = 65_536;

/// Maximum service name length in bytes
pub(crate) const MAX_SERVICE_LENGTH: usize = 256;

/// Validate and decode a 32-character hex api key to 16 bytes.
pub(crate) fn decode_api_key(api_key: &str) -> Result<[u8; 16], TellError> {
    if api_key.len() != 32 {
        return Err(TellError::configuration(format!(
            "apiKey must be 32 hex characters, got {}",
            api_key.len()
        )));
    }

    let mut bytes = [0u8; 16];
    hex::decode_to_slice(api_key, &mut bytes)
        .map_err(|_| TellError::configuration("apiKey contains non-hex characters"))?;
    Ok(bytes)
}

pub(crate) fn check_user_id(user_id: &str) -> bool {
    !user_id.is_empty()
}

/// Non-empty, at most 256 bytes.
pub(crate) fn check_event_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_EVENT_NAME_LENGTH
}

/// Non-empty, at most 64 KiB.
pub(crate) fn check_log_message(message: &str) -> bool {
    !message.is_empty() && message.len() <= MAX_LOG_MESSAGE_LENGTH
}

/// At most 256 bytes; empty is allowed (events fall back to "app").
pub(crate) fn check_service_name(service: &str) -> bool {
    service.len() <= MAX_SERVICE_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_decode_api_key() {
        let key = decode_api_key("a1b2c3d4e5f60718293a4b5c6d7e8f90").unwrap();
        assert_eq!(key[0], 0xa1);
        assert_eq!(key[15], 0x90);

        // Upper-case hex is accepted
        let upper = decode_api_key("A1B2C3D4E5F60718293A4B5C6D7E8F90").unwrap();
        assert_eq!(upper, key);
    }

    #[test]
    fn test_decode_api_key_wrong_length() {
        let err = decode_api_key("abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("32 hex characters"));
    }

    #[test]
    fn test_decode_api_key_non_hex() {
        let err = decode_api_key("g1b2c3d4e5f60718293a4b5c6d7e8f90").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_check_user_id() {
        assert!(check_user_id("u"));
        assert!(!check_user_id(""));
    }

    #[test]
    fn test_check_event_name() {
        assert!(check_event_name("Page Viewed"));
        assert!(check_event_name(&"x".repeat(256)));
        assert!(!check_event_name(""));
        assert!(!check_event_name(&"x".repeat(257)));
    }

    #[test]
    fn test_check_log_message() {
        assert!(check_log_message("boom"));
        assert!(check_log_message(&"x".repeat(65_536)));
        assert!(!check_log_message(""));
        assert!(!check_log_message(&"x".repeat(65_537)));
    }

    #[test]
    fn test_check_service_name_empty_allowed() {
        assert!(check_service_name(""));
        assert!(check_service_name("api-gateway"));
        assert!(!check_service_name(&"x".repeat(257)));
    }
}
