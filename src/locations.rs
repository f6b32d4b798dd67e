use byteorder::{ByteOrder, LittleEndian};
use vec_map::VecMap;

use crate::error::ChkError;
use crate::sections::tag;
use crate::strings::{StrIndex, StringTable};

const RECORD_SIZE: usize = 20;

pub mod elevation_flags {
    pub const LOW_GROUND: u16 = 0x1;
    pub const MEDIUM_GROUND: u16 = 0x2;
    pub const HIGH_GROUND: u16 = 0x4;
    pub const LOW_AIR: u16 = 0x8;
    pub const MEDIUM_AIR: u16 = 0x10;
    pub const HIGH_AIR: u16 = 0x20;
}

/// MRGN record. The rectangle is kept as the raw absolute edges, not as
/// position + size, since right/bottom may be smaller than left/top for
/// inverted locations.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub name: StrIndex,
    pub elevation_flags: u16,
}

impl Location {
    fn is_unused(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }
}

/// Decoded location table, sparse over the section's record slots.
///
/// Triggers address locations by slot index, so re-encoding keeps every
/// location in the slot it came from and fills unused slots with all-zero
/// records.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Locations {
    slots: usize,
    by_slot: VecMap<Location>,
}

impl Locations {
    pub fn decode(data: &[u8], strings: &StringTable) -> Result<Locations, ChkError> {
        if data.len() % RECORD_SIZE != 0 {
            return Err(ChkError::RecordAlign {
                tag: tag::MRGN,
                record: RECORD_SIZE,
                len: data.len(),
            });
        }
        let slots = data.len() / RECORD_SIZE;
        let mut by_slot = VecMap::with_capacity(slots);
        for (i, record) in data.chunks_exact(RECORD_SIZE).enumerate() {
            let location = Location {
                left: LittleEndian::read_u32(record),
                top: LittleEndian::read_u32(&record[4..]),
                right: LittleEndian::read_u32(&record[8..]),
                bottom: LittleEndian::read_u32(&record[12..]),
                name: StrIndex(LittleEndian::read_u16(&record[16..])),
                elevation_flags: LittleEndian::read_u16(&record[18..]),
            };
            // An all-zero rectangle marks an unused slot, not a location.
            if location.is_unused() {
                continue;
            }
            strings.resolve(tag::MRGN, location.name)?;
            by_slot.insert(i, location);
        }
        debug!("MRGN: {} locations in {} slots", by_slot.len(), slots);
        Ok(Locations { slots, by_slot })
    }

    pub fn encode(&self) -> Vec<u8> {
        let slots = self
            .by_slot
            .keys()
            .max()
            .map(|x| x + 1)
            .unwrap_or(0)
            .max(self.slots);
        let mut out = vec![0; slots * RECORD_SIZE];
        for (i, location) in self.by_slot.iter() {
            let record = &mut out[i * RECORD_SIZE..][..RECORD_SIZE];
            LittleEndian::write_u32(record, location.left);
            LittleEndian::write_u32(&mut record[4..], location.top);
            LittleEndian::write_u32(&mut record[8..], location.right);
            LittleEndian::write_u32(&mut record[12..], location.bottom);
            LittleEndian::write_u16(&mut record[16..], location.name.0);
            LittleEndian::write_u16(&mut record[18..], location.elevation_flags);
        }
        out
    }

    pub fn get(&self, slot: usize) -> Option<&Location> {
        self.by_slot.get(slot)
    }

    pub fn insert(&mut self, slot: usize, location: Location) {
        self.slots = self.slots.max(slot + 1);
        self.by_slot.insert(slot, location);
    }

    pub fn remove(&mut self, slot: usize) -> Option<Location> {
        self.by_slot.remove(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Location)> {
        self.by_slot.iter()
    }

    /// Occupied slot count, not total slots.
    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    pub fn slots(&self) -> usize {
        self.slots
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn location_bytes(l: u32, t: u32, r: u32, b: u32, name: u16, flags: u16) -> Vec<u8> {
        let mut out = Vec::new();
        for v in [l, t, r, b].iter() {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&name.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out
    }

    fn strings() -> StringTable {
        let mut strings = StringTable::default();
        strings.push("Anywhere".into());
        strings
    }

    #[test]
    fn zero_rect_slots_are_skipped() {
        let mut data = location_bytes(0, 0, 0, 0, 0, 0);
        data.extend_from_slice(&location_bytes(32, 32, 128, 160, 1, elevation_flags::LOW_GROUND));
        data.extend_from_slice(&location_bytes(0, 0, 0, 0, 1, 0xffff));
        let locations = Locations::decode(&data, &strings()).unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations.slots(), 3);
        assert!(locations.get(0).is_none());
        assert!(locations.get(2).is_none());
        let location = locations.get(1).unwrap();
        assert_eq!(location.left, 32);
        assert_eq!(location.bottom, 160);
        // Unused slots come back as zero records.
        let reencoded = locations.encode();
        assert_eq!(reencoded.len(), 60);
        assert_eq!(&reencoded[..20], &[0u8; 20][..]);
        assert_eq!(&reencoded[40..], &[0u8; 20][..]);
        assert_eq!(&reencoded[20..40], &data[20..40]);
    }

    #[test]
    fn bad_record_size() {
        let data = vec![0; 30];
        assert!(Locations::decode(&data, &strings()).is_err());
    }

    #[test]
    fn bad_name_index() {
        let data = location_bytes(1, 1, 2, 2, 5, 0);
        assert!(Locations::decode(&data, &strings()).is_err());
    }

    #[test]
    fn insert_grows_slots() {
        let mut locations = Locations::default();
        locations.insert(
            4,
            Location {
                left: 1,
                top: 1,
                right: 2,
                bottom: 2,
                name: StrIndex::NONE,
                elevation_flags: 0,
            },
        );
        assert_eq!(locations.slots(), 5);
        assert_eq!(locations.encode().len(), 100);
    }
}
