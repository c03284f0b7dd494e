pub mod cursor;
pub mod zlib;
