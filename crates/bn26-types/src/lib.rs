#![forbid(unsafe_code)]
#![doc = "Common types and error codes for the bn26 big number library."]

pub mod endian;
pub mod error;

pub use endian::*;
pub use error::*;
