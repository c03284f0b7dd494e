use std::io::BufRead;
use std::io::Cursor;

pub trait EasyRead {
    fn read_until_checked(&mut self, byte: u8) -> Option<Vec<u8>>;
    fn is_exhausted(&self) -> bool;
}

impl<T: AsRef<[u8]>> EasyRead for Cursor<T> {
    /// Reads until `byte`, returning what was read without the delimiter.
    ///
    /// Returns `None` if the input ended before `byte` was found. Reading from memory never fails,
    /// so that is the only case to handle.
    fn read_until_checked(&mut self, byte: u8) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        BufRead::read_until(self, byte, &mut buf).ok()?;
        if buf.pop() != Some(byte) {
            return None;
        }
        Some(buf)
    }

    fn is_exhausted(&self) -> bool {
        self.position() as usize >= self.get_ref().as_ref().len()
    }
}
