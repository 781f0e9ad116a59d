//! Batch FlatBuffer encoding
//!
//! Encodes the outer Batch envelope that wraps an EventData or LogData
//! container, as defined in `common.fbs`:
//!
//! ```text
//! table Batch {
//!     api_key:[ubyte] (required, id: 0);
//!     schema_type:SchemaType (id: 1);
//!     version:uint8 (id: 2);
//!     batch_id:uint64 (id: 3);
//!     data:[ubyte] (required, id: 4);
//!     source_ip:[ubyte] (id: 5);
//! }
//! ```
//!
//! `source_ip` is only set by forwarding collectors; clients never emit it,
//! so its vtable slot is pinned to 0 here.

use crate::helpers::{align4, patch_offset, patch_u32, write_byte_vector, write_i32, write_u16, write_u32, write_u64};
use crate::schema::SchemaType;
use crate::{API_KEY_LENGTH, DEFAULT_VERSION};

/// Borrowed view of one batch envelope, ready to encode.
#[derive(Debug, Clone, Copy)]
pub struct BatchParams<'a> {
    pub api_key: &'a [u8; API_KEY_LENGTH],
    pub schema_type: SchemaType,
    /// Protocol version; 0 means "use the default" (100).
    pub version: u8,
    /// Monotone batch counter for deduplication; 0 elides the field.
    pub batch_id: u64,
    /// Opaque bytes of an already-encoded EventData or LogData container.
    pub data: &'a [u8],
}

/// Encode a Batch envelope, appended to `buf`.
///
/// Table layout (inline offsets relative to the table start):
/// ```text
/// +0:  soffset to vtable (i32)
/// +4:  api_key offset      +8:  data offset
/// +12: reserved (source_ip, always zero)
/// +16: batch_id (u64)
/// +24: schema_type (u8)    +25: version (u8), 2 pad
/// ```
pub fn encode_batch_into(buf: &mut Vec<u8>, params: &BatchParams<'_>) {
    let has_batch_id = params.batch_id != 0;
    let version = if params.version == 0 { DEFAULT_VERSION } else { params.version };

    // Root offset placeholder
    let root_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    // === VTable ===
    let vtable_start = buf.len();
    write_u16(buf, 16); // vtable_size: 4 header + 6 fields * 2
    write_u16(buf, 32); // table_size: soffset + 28 inline bytes
    write_u16(buf, 4); // field 0: api_key at +4
    write_u16(buf, 24); // field 1: schema_type at +24
    write_u16(buf, 25); // field 2: version at +25
    write_u16(buf, if has_batch_id { 16 } else { 0 }); // field 3: batch_id
    write_u16(buf, 8); // field 4: data at +8
    write_u16(buf, 0); // field 5: source_ip (never emitted)

    // === Table ===
    let table_start = buf.len();
    write_i32(buf, (table_start - vtable_start) as i32);

    let api_key_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    let data_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    write_u32(buf, 0); // reserved source_ip slot

    write_u64(buf, params.batch_id);

    buf.push(params.schema_type.as_u8());
    buf.push(version);
    buf.extend_from_slice(&[0u8; 2]); // padding

    // === Vectors ===
    align4(buf);

    let api_key_start = write_byte_vector(buf, params.api_key);
    align4(buf);

    let data_start = write_byte_vector(buf, params.data);

    // === Patch offsets ===
    patch_u32(buf, root_pos, (table_start - root_pos) as u32);
    patch_offset(buf, api_key_off_pos, api_key_start);
    patch_offset(buf, data_off_pos, data_start);
}
