//! Low-level byte emission helpers shared by the message encoders.

/// Write a u16 in little-endian format
#[inline]
pub(crate) fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write a u32 in little-endian format
#[inline]
pub(crate) fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write an i32 in little-endian format
#[inline]
pub(crate) fn write_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write a u64 in little-endian format
#[inline]
pub(crate) fn write_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Zero-pad to the next 4-byte boundary.
#[inline]
pub(crate) fn align4(buf: &mut Vec<u8>) {
    while !buf.len().is_multiple_of(4) {
        buf.push(0);
    }
}

/// Write `[u32 length][data]` and return the start position.
///
/// Lengths that do not fit in a u32 become a zero-length vector; the field
/// slot stays present.
#[inline]
pub(crate) fn write_byte_vector(buf: &mut Vec<u8>, data: &[u8]) -> usize {
    let start = buf.len();
    match u32::try_from(data.len()) {
        Ok(len) => {
            write_u32(buf, len);
            buf.extend_from_slice(data);
        }
        Err(_) => write_u32(buf, 0),
    }
    start
}

/// Write `[u32 length][data][NUL]` and return the start position.
#[inline]
pub(crate) fn write_string(buf: &mut Vec<u8>, s: &str) -> usize {
    let start = buf.len();
    match u32::try_from(s.len()) {
        Ok(len) => {
            write_u32(buf, len);
            buf.extend_from_slice(s.as_bytes());
        }
        Err(_) => write_u32(buf, 0),
    }
    buf.push(0); // null terminator
    start
}

/// Patch a 4-byte offset slot with the distance from the slot to `target`.
#[inline]
pub(crate) fn patch_offset(buf: &mut [u8], offset_pos: usize, target: usize) {
    let rel = (target - offset_pos) as u32;
    buf[offset_pos..offset_pos + 4].copy_from_slice(&rel.to_le_bytes());
}

/// Patch a 4-byte slot with a raw little-endian u32.
#[inline]
pub(crate) fn patch_u32(buf: &mut [u8], pos: usize, value: u32) {
    buf[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align4_pads_with_zeros() {
        let mut buf = vec![0xff; 5];
        align4(&mut buf);
        assert_eq!(buf.len(), 8);
        assert_eq!(&buf[5..], &[0, 0, 0]);

        // Already aligned: no-op
        align4(&mut buf);
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_write_byte_vector_length_prefix() {
        let mut buf = Vec::new();
        let start = write_byte_vector(&mut buf, &[1, 2, 3]);
        assert_eq!(start, 0);
        assert_eq!(buf, [3, 0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_write_string_null_terminated() {
        let mut buf = Vec::new();
        write_string(&mut buf, "ab");
        assert_eq!(buf, [2, 0, 0, 0, b'a', b'b', 0]);
    }

    #[test]
    fn test_patch_offset_relative_to_slot() {
        let mut buf = vec![0u8; 16];
        patch_offset(&mut buf, 4, 12);
        assert_eq!(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]), 8);
    }
}
