use std::fmt;

use fxhash::FxHashMap;

use crate::error::ChkError;

/// 4-character section name, e.g. `UNIT` or `ERA ` (trailing spaces included).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SectionTag(pub [u8; 4]);

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &c in self.0.iter() {
            if c.is_ascii_graphic() {
                write!(f, "{}", c as char)?;
            } else if c != b' ' {
                write!(f, "\\x{:02x}", c)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SectionTag({})", self)
    }
}

pub mod tag {
    use super::SectionTag;

    pub const VER: SectionTag = SectionTag(*b"VER ");
    pub const VCOD: SectionTag = SectionTag(*b"VCOD");
    pub const OWNR: SectionTag = SectionTag(*b"OWNR");
    pub const SIDE: SectionTag = SectionTag(*b"SIDE");
    pub const COLR: SectionTag = SectionTag(*b"COLR");
    pub const ERA: SectionTag = SectionTag(*b"ERA ");
    pub const DIM: SectionTag = SectionTag(*b"DIM ");
    pub const MTXM: SectionTag = SectionTag(*b"MTXM");
    pub const UNIT: SectionTag = SectionTag(*b"UNIT");
    pub const PUNI: SectionTag = SectionTag(*b"PUNI");
    pub const UNIX: SectionTag = SectionTag(*b"UNIx");
    pub const PUPX: SectionTag = SectionTag(*b"PUPx");
    pub const UPGX: SectionTag = SectionTag(*b"UPGx");
    pub const THG2: SectionTag = SectionTag(*b"THG2");
    pub const MASK: SectionTag = SectionTag(*b"MASK");
    pub const MRGN: SectionTag = SectionTag(*b"MRGN");
    pub const STRX: SectionTag = SectionTag(*b"STRx");
    pub const SPRP: SectionTag = SectionTag(*b"SPRP");
    pub const FORC: SectionTag = SectionTag(*b"FORC");
    pub const PTEX: SectionTag = SectionTag(*b"PTEx");
    pub const TECX: SectionTag = SectionTag(*b"TECx");
    pub const MBRF: SectionTag = SectionTag(*b"MBRF");
    pub const TRIG: SectionTag = SectionTag(*b"TRIG");
    pub const UPRP: SectionTag = SectionTag(*b"UPRP");
}

/// Tag -> raw bytes lookup, filled in by whatever extracted the scenario
/// file from its container. The chunk framing (tag + length prefix) is that
/// collaborator's concern; this only ever sees the chunk payloads.
#[derive(Default)]
pub struct SectionMap {
    sections: FxHashMap<SectionTag, Vec<u8>>,
}

impl SectionMap {
    pub fn new() -> SectionMap {
        Default::default()
    }

    pub fn insert(&mut self, tag: SectionTag, data: Vec<u8>) {
        self.sections.insert(tag, data);
    }

    pub fn get(&self, tag: SectionTag) -> Option<&[u8]> {
        self.sections.get(&tag).map(|x| &**x)
    }

    pub(crate) fn require(&self, tag: SectionTag) -> Result<&[u8], ChkError> {
        self.get(tag).ok_or(ChkError::MissingSection(tag))
    }
}

impl std::iter::FromIterator<(SectionTag, Vec<u8>)> for SectionMap {
    fn from_iter<I: IntoIterator<Item = (SectionTag, Vec<u8>)>>(iter: I) -> SectionMap {
        SectionMap {
            sections: iter.into_iter().collect(),
        }
    }
}

/// Encoded sections in the order they are written out. The container
/// tokenizer reassembles these into the final file.
pub type SectionList = Vec<(SectionTag, Vec<u8>)>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tag_display() {
        assert_eq!(tag::ERA.to_string(), "ERA");
        assert_eq!(tag::UNIX.to_string(), "UNIx");
    }

    #[test]
    fn require_missing() {
        let map = SectionMap::new();
        let err = map.require(tag::DIM).unwrap_err();
        assert_eq!(err.to_string(), "Missing section DIM");
    }
}
