use byteorder::{ByteOrder, LittleEndian};
use fxhash::FxHashMap;
use smallvec::SmallVec;

use crate::error::ChkError;
use crate::sections::{tag, SectionTag};

/// 1-based string table index as stored in sections; 0 means "no string"
/// (unnamed location, default unit name, and so on).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct StrIndex(pub u16);

impl StrIndex {
    pub const NONE: StrIndex = StrIndex(0);

    pub fn from_index(index: usize) -> StrIndex {
        StrIndex(index as u16 + 1)
    }

    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Decoded scenario string table.
///
/// Strings are kept in table order; references elsewhere in the map store
/// 1-based `StrIndex` values into this.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    pub fn decode(data: &[u8], lossy: bool) -> Result<StringTable, ChkError> {
        let section = tag::STRX;
        if data.len() < 4 {
            return Err(ChkError::SectionSize {
                tag: section,
                expected: 4,
                actual: data.len(),
            });
        }
        let count = LittleEndian::read_u32(data) as usize;
        match count.checked_mul(4).and_then(|x| x.checked_add(4)) {
            Some(end) if end <= data.len() => (),
            _ => {
                return Err(ChkError::SectionSize {
                    tag: section,
                    expected: 4 + count.saturating_mul(4),
                    actual: data.len(),
                });
            }
        }
        let mut strings = Vec::with_capacity(count);
        for i in 0..count {
            let offset = LittleEndian::read_u32(&data[4 + i * 4..]) as usize;
            if offset > data.len() {
                return Err(ChkError::BadReference {
                    tag: section,
                    table: "string offset",
                    index: offset as u32,
                    limit: data.len() as u32,
                });
            }
            let rest = &data[offset..];
            let bytes = match rest.iter().position(|&x| x == 0) {
                Some(nul) => &rest[..nul],
                None => rest,
            };
            let content = match std::str::from_utf8(bytes) {
                Ok(s) => s.into(),
                Err(_) if lossy => String::from_utf8_lossy(bytes).into_owned(),
                Err(_) => {
                    return Err(ChkError::BadString {
                        tag: section,
                        offset,
                    });
                }
            };
            strings.push(content);
        }
        debug!("STRx: {} strings", strings.len());
        Ok(StringTable { strings })
    }

    /// Encodes the table, collapsing identical contents to a single stored
    /// byte run with a shared offset.
    pub fn encode(&self) -> Vec<u8> {
        let count = self.strings.len();
        let mut out = Vec::with_capacity(4 + count * 4);
        out.resize(4 + count * 4, 0);
        LittleEndian::write_u32(&mut out, count as u32);
        let mut seen: FxHashMap<&str, u32> = FxHashMap::default();
        let mut offset = out.len() as u32;
        for (i, content) in self.strings.iter().enumerate() {
            let at = match seen.get(&**content) {
                Some(&prev) => prev,
                None => {
                    let mut encoded: SmallVec<[u8; 64]> = SmallVec::new();
                    encoded.extend_from_slice(content.as_bytes());
                    encoded.push(0);
                    let at = offset;
                    offset += encoded.len() as u32;
                    out.extend_from_slice(&encoded);
                    seen.insert(content, at);
                    at
                }
            };
            LittleEndian::write_u32(&mut out[4 + i * 4..], at);
        }
        out
    }

    pub fn get(&self, index: StrIndex) -> Option<&str> {
        self.strings.get(index.index()?).map(|x| &**x)
    }

    /// Like `get`, but an out-of-range index is an error instead of `None`.
    /// `StrIndex::NONE` resolves to `Ok(None)`.
    pub fn resolve(&self, section: SectionTag, index: StrIndex) -> Result<Option<&str>, ChkError> {
        let i = match index.index() {
            Some(i) => i,
            None => return Ok(None),
        };
        match self.strings.get(i) {
            Some(s) => Ok(Some(s)),
            None => Err(ChkError::BadReference {
                tag: section,
                table: "string",
                index: index.0 as u32,
                limit: self.strings.len() as u32,
            }),
        }
    }

    /// Returns an index for `content`, appending it if it isn't in the
    /// table yet. Editors use this when renaming things.
    pub fn intern(&mut self, content: &str) -> StrIndex {
        match self.strings.iter().position(|x| x == content) {
            Some(i) => StrIndex::from_index(i),
            None => {
                self.strings.push(content.into());
                StrIndex::from_index(self.strings.len() - 1)
            }
        }
    }

    pub fn push(&mut self, content: String) -> StrIndex {
        self.strings.push(content);
        StrIndex::from_index(self.strings.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|x| &**x)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut table = StringTable::default();
        table.push("Scenario".into());
        table.push("Force one".into());
        table.push("Anywhere".into());
        let bytes = table.encode();
        let back = StringTable::decode(&bytes, false).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back.get(StrIndex(1)), Some("Scenario"));
        assert_eq!(back.get(StrIndex(3)), Some("Anywhere"));
        assert_eq!(back.get(StrIndex(0)), None);
        assert_eq!(back.get(StrIndex(4)), None);
    }

    #[test]
    fn dedup_shares_offsets() {
        let mut table = StringTable::default();
        table.push("Twin".into());
        table.push("Twin".into());
        table.push("Other".into());
        let bytes = table.encode();
        let first = LittleEndian::read_u32(&bytes[4..]);
        let second = LittleEndian::read_u32(&bytes[8..]);
        let third = LittleEndian::read_u32(&bytes[12..]);
        assert_eq!(first, second);
        assert_ne!(first, third);
        // Offsets header + one copy of "Twin\0" + "Other\0"
        assert_eq!(bytes.len(), 4 + 3 * 4 + 5 + 6);
        let back = StringTable::decode(&bytes, false).unwrap();
        assert_eq!(back.get(StrIndex(1)), Some("Twin"));
        assert_eq!(back.get(StrIndex(2)), Some("Twin"));
        assert_eq!(back.get(StrIndex(3)), Some("Other"));
    }

    #[test]
    fn intern_reuses_existing() {
        let mut table = StringTable::default();
        let a = table.push("Command Center".into());
        let b = table.intern("Command Center");
        assert_eq!(a, b);
        let c = table.intern("Nexus");
        assert_eq!(c.index(), Some(1));
    }

    #[test]
    fn bad_offset() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&500u32.to_le_bytes());
        assert!(StringTable::decode(&bytes, false).is_err());
    }

    #[test]
    fn lossy_decode() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(b"\xc7\xd1\x00");
        assert!(StringTable::decode(&bytes, false).is_err());
        let table = StringTable::decode(&bytes, true).unwrap();
        assert_eq!(table.len(), 1);
    }
}
