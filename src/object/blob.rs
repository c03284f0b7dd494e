use super::{ObjectType, envelope};
use crate::Result;

/// Returns the encoded version of a blob object:
///
/// `blob {data_length}\0{data}`
pub fn encode_blob(data: &[u8]) -> Vec<u8> {
    envelope::encode(ObjectType::Blob, data)
}

/// Reads an uncompressed envelope, returning the blob's content.
///
/// # Errors
///
/// This function will fail if:
/// - The envelope did not have a valid format.
/// - The object is not a blob (`Error::UnexpectedKind`).
pub fn decode_blob(bytes: &[u8]) -> Result<Vec<u8>> {
    envelope::decode_expecting(ObjectType::Blob, bytes).map(<[u8]>::to_vec)
}
