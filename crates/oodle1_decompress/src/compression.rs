use crate::prelude::*;

/// Compression tag of a container section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    Oodle0,
    Oodle1,
    BitKnit1,
    BitKnit2,
}

impl Compression {
    pub fn from_tag(tag: u32) -> Result<Self, Error> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Oodle0),
            2 => Ok(Self::Oodle1),
            3 => Ok(Self::BitKnit1),
            4 => Ok(Self::BitKnit2),
            _ => Err(Error::UnknownCompression(tag)),
        }
    }

    pub const fn tag(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Oodle0 => 1,
            Self::Oodle1 => 2,
            Self::BitKnit1 => 3,
            Self::BitKnit2 => 4,
        }
    }
}

impl TryFrom<u32> for Compression {
    type Error = Error;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::from_tag(tag)
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Oodle0 => "oodle0",
            Self::Oodle1 => "oodle1",
            Self::BitKnit1 => "bitknit1",
            Self::BitKnit2 => "bitknit2",
        };
        f.write_str(name)
    }
}
