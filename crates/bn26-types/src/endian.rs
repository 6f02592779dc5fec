/// Byte order used when converting big numbers to and from byte arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

impl Endian {
    /// Parse the short textual form (`"be"` / `"le"`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "be" => Some(Endian::Big),
            "le" => Some(Endian::Little),
            _ => None,
        }
    }
}
