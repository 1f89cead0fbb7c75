//! Schema snapshots in `MessagePack` format.
//!
//! Only the files are stored; lookup indexes are rebuilt on load.

use schemata_foundation::{Error, ErrorKind, Result};

use crate::file::ProtoFile;
use crate::schema::Schema;

/// Serializes a linked schema to bytes.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(schema: &Schema) -> Result<Vec<u8>> {
    let files: Vec<&ProtoFile> = schema.files().collect();
    rmp_serde::to_vec_named(&files).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a schema written by [`to_bytes`].
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<Schema> {
    let files: Vec<ProtoFile> = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))?;
    Ok(Schema::from_linked_files(files))
}
