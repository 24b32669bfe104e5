//! Traits for binary format recognition

/// Trait for recognizers of non-textual file formats
pub trait BinarySignature {
    /// Short human-readable name of the format (e.g. "PNG image")
    fn name(&self) -> &'static str;

    /// Check if the data starts like a file of this format
    fn can_parse(&self, data: &[u8]) -> bool;
}

/// A signature identified by a fixed byte sequence at a fixed offset
#[derive(Clone, Copy, Debug)]
pub struct MagicSignature {
    /// Format name reported on a match
    pub name: &'static str,
    /// Offset of the magic bytes from the start of the data
    pub offset: usize,
    /// The magic bytes themselves
    pub magic: &'static [u8],
}

impl MagicSignature {
    /// Create a signature anchored at the start of the data
    pub const fn new(name: &'static str, magic: &'static [u8]) -> Self {
        Self {
            name,
            offset: 0,
            magic,
        }
    }

    /// Create a signature whose magic bytes sit at `offset`
    pub const fn at(name: &'static str, offset: usize, magic: &'static [u8]) -> Self {
        Self {
            name,
            offset,
            magic,
        }
    }
}

impl BinarySignature for MagicSignature {
    fn name(&self) -> &'static str {
        self.name
    }

    fn can_parse(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.magic.len()) == Some(self.magic)
    }
}
