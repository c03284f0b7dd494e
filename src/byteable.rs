use crate::Result;

/// Trait that ensures an object payload can be manipulated in its binary format.
///
/// The bytes handled here are the payload only, the envelope is added by `object::envelope`.
pub trait Byteable {
    fn as_bytes(&self) -> Result<Vec<u8>>;
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;
}
