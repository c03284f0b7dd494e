use std::str::FromStr;

use super::{NULL_BYTE, ObjectType, SPACE_BYTE};
use crate::{Error, Result};

/// Returns the object framed with the following format:
///
/// `{type} {payload_length}\0{payload}`
///
/// This is the exact sequence of bytes that is hashed and compressed when storing an object.
pub fn encode(kind: ObjectType, payload: &[u8]) -> Vec<u8> {
    let len = payload.len().to_string();
    let kind = kind.as_str();

    let mut bytes = Vec::with_capacity(kind.len() + len.len() + 2 + payload.len());
    bytes.extend_from_slice(kind.as_bytes());
    bytes.push(SPACE_BYTE);
    bytes.extend_from_slice(len.as_bytes());
    bytes.push(NULL_BYTE);
    bytes.extend_from_slice(payload);
    bytes
}

/// Splits an envelope into its kind and its payload.
///
/// # Errors
///
/// Fails with `Error::MalformedEnvelope` if:
/// - There is no null byte.
/// - The header is not exactly `{type} {length}`.
/// - The type is unknown.
/// - The declared length does not match the amount of bytes after the null byte.
pub fn decode(bytes: &[u8]) -> Result<(ObjectType, &[u8])> {
    let null_pos = bytes
        .iter()
        .position(|&b| b == NULL_BYTE)
        .ok_or_else(|| Error::MalformedEnvelope("expected null byte after header".into()))?;

    let header = std::str::from_utf8(&bytes[..null_pos])
        .map_err(|_| Error::MalformedEnvelope("header is not valid utf-8".into()))?;
    let payload = &bytes[null_pos + 1..];

    let fields: Vec<&str> = header.split(SPACE_BYTE as char).collect();
    let [kind, len] = fields[..] else {
        return Err(Error::MalformedEnvelope(format!(
            "expected header with two fields, got {:?}",
            header
        )));
    };

    let kind = ObjectType::from_str(kind)?;

    // `usize::from_str` accepts a leading '+', which is not a valid length here
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedEnvelope(format!(
            "length {:?} is not a decimal number",
            len
        )));
    }
    let len: usize = len
        .parse()
        .map_err(|_| Error::MalformedEnvelope(format!("length {:?} is too large", len)))?;

    if len != payload.len() {
        return Err(Error::MalformedEnvelope(format!(
            "declared length {} did not match actual payload length {}",
            len,
            payload.len()
        )));
    }

    Ok((kind, payload))
}

/// Decodes the envelope, checking that the object is of the `expected` kind.
pub(crate) fn decode_expecting(expected: ObjectType, bytes: &[u8]) -> Result<&[u8]> {
    let (found, payload) = decode(bytes)?;
    if found != expected {
        return Err(Error::UnexpectedKind { expected, found });
    }
    Ok(payload)
}
