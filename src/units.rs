use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChkError;
use crate::players::{Player, PLAYER_COUNT};
use crate::sections::tag;
use crate::strings::{StrIndex, StringTable};

pub const UNIT_KIND_COUNT: usize = 228;
pub const WEAPON_KIND_COUNT: usize = 130;
/// Reserved placement marker; occupies a slot but never takes a serial.
pub const START_LOCATION: u16 = 214;

const UNIT_RECORD_SIZE: usize = 36;
const PROPERTY_RECORD_SIZE: usize = 20;
const UNIT_SETTINGS_SIZE: usize =
    UNIT_KIND_COUNT * (1 + 4 + 2 + 1 + 2 + 2 + 2 + 2) + WEAPON_KIND_COUNT * 4;
const UNIT_RESTRICTIONS_SIZE: usize =
    UNIT_KIND_COUNT * PLAYER_COUNT + UNIT_KIND_COUNT + UNIT_KIND_COUNT * PLAYER_COUNT;

pub mod relation_flags {
    pub const NYDUS_LINK: u16 = 0x100;
    pub const ADDON_LINK: u16 = 0x200;
}

pub mod special_flags {
    pub const CLOAKED: u16 = 0x1;
    pub const BURROWED: u16 = 0x2;
    pub const IN_TRANSIT: u16 = 0x4;
    pub const HALLUCINATED: u16 = 0x8;
    pub const INVINCIBLE: u16 = 0x10;
}

pub mod valid_flags {
    pub const OWNER: u16 = 0x1;
    pub const HIT_POINTS: u16 = 0x2;
    pub const SHIELDS: u16 = 0x4;
    pub const ENERGY: u16 = 0x8;
    pub const RESOURCES: u16 = 0x10;
    pub const HANGAR: u16 = 0x20;
}

/// Raw UNIT record. Current hit/shield/energy are stored as 0-100
/// percentages of the unit kind's maximum, not as absolute values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// `None` for start location markers.
    pub serial: Option<u32>,
    pub x: u16,
    pub y: u16,
    pub unit_id: u16,
    pub relation_flags: u16,
    pub special_flags: u16,
    pub valid_flags: u16,
    pub owner: u8,
    pub hp_percent: u8,
    pub shield_percent: u8,
    pub energy_percent: u8,
    pub resource_amount: u32,
    pub hangar_count: u16,
    pub state_flags: u16,
    pub unused: u32,
    pub related_unit: u32,
}

pub fn decode_placements(
    data: &[u8],
    players: &[Player; PLAYER_COUNT],
) -> Result<Vec<UnitPlacement>, ChkError> {
    if data.len() % UNIT_RECORD_SIZE != 0 {
        return Err(ChkError::RecordAlign {
            tag: tag::UNIT,
            record: UNIT_RECORD_SIZE,
            len: data.len(),
        });
    }
    let mut out = Vec::with_capacity(data.len() / UNIT_RECORD_SIZE);
    for record in data.chunks_exact(UNIT_RECORD_SIZE) {
        let owner = record[16];
        if owner as usize >= players.len() {
            return Err(ChkError::BadReference {
                tag: tag::UNIT,
                table: "player",
                index: owner as u32,
                limit: players.len() as u32,
            });
        }
        let serial = LittleEndian::read_u32(record);
        let unit_id = LittleEndian::read_u16(&record[8..]);
        out.push(UnitPlacement {
            serial: if unit_id == START_LOCATION {
                None
            } else {
                Some(serial)
            },
            x: LittleEndian::read_u16(&record[4..]),
            y: LittleEndian::read_u16(&record[6..]),
            unit_id,
            relation_flags: LittleEndian::read_u16(&record[10..]),
            special_flags: LittleEndian::read_u16(&record[12..]),
            valid_flags: LittleEndian::read_u16(&record[14..]),
            owner,
            hp_percent: record[17],
            shield_percent: record[18],
            energy_percent: record[19],
            resource_amount: LittleEndian::read_u32(&record[20..]),
            hangar_count: LittleEndian::read_u16(&record[24..]),
            state_flags: LittleEndian::read_u16(&record[26..]),
            unused: LittleEndian::read_u32(&record[28..]),
            related_unit: LittleEndian::read_u32(&record[32..]),
        });
    }
    debug!("UNIT: {} placements", out.len());
    Ok(out)
}

pub fn encode_placements(placements: &[UnitPlacement]) -> Vec<u8> {
    let mut out = vec![0; placements.len() * UNIT_RECORD_SIZE];
    for (record, unit) in out.chunks_exact_mut(UNIT_RECORD_SIZE).zip(placements) {
        LittleEndian::write_u32(record, unit.serial.unwrap_or(0));
        LittleEndian::write_u16(&mut record[4..], unit.x);
        LittleEndian::write_u16(&mut record[6..], unit.y);
        LittleEndian::write_u16(&mut record[8..], unit.unit_id);
        LittleEndian::write_u16(&mut record[10..], unit.relation_flags);
        LittleEndian::write_u16(&mut record[12..], unit.special_flags);
        LittleEndian::write_u16(&mut record[14..], unit.valid_flags);
        record[16] = unit.owner;
        record[17] = unit.hp_percent;
        record[18] = unit.shield_percent;
        record[19] = unit.energy_percent;
        LittleEndian::write_u32(&mut record[20..], unit.resource_amount);
        LittleEndian::write_u16(&mut record[24..], unit.hangar_count);
        LittleEndian::write_u16(&mut record[26..], unit.state_flags);
        LittleEndian::write_u32(&mut record[28..], unit.unused);
        LittleEndian::write_u32(&mut record[32..], unit.related_unit);
    }
    out
}

/// Per-map override row in UNIx for one unit kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitSettingEntry {
    pub use_default: bool,
    pub hit_points: u32,
    pub shield_points: u16,
    pub armor: u8,
    pub build_time: u16,
    pub mineral_cost: u16,
    pub gas_cost: u16,
    /// Custom name; 0 falls back to the default name table.
    pub name: StrIndex,
}

/// Per-map weapon damage overrides at the tail of UNIx.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WeaponSettingEntry {
    pub damage: u16,
    pub bonus: u16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UnitSettings {
    pub units: Vec<UnitSettingEntry>,
    pub weapons: Vec<WeaponSettingEntry>,
}

pub fn decode_unit_settings(
    data: &[u8],
    strings: &StringTable,
) -> Result<UnitSettings, ChkError> {
    if data.len() != UNIT_SETTINGS_SIZE {
        return Err(ChkError::SectionSize {
            tag: tag::UNIX,
            expected: UNIT_SETTINGS_SIZE,
            actual: data.len(),
        });
    }
    // Columnar: each field is a full 228-entry array before the next starts.
    let n = UNIT_KIND_COUNT;
    let hp = n;
    let shields = hp + n * 4;
    let armor = shields + n * 2;
    let build_time = armor + n;
    let mineral = build_time + n * 2;
    let gas = mineral + n * 2;
    let names = gas + n * 2;
    let weapon_damage = names + n * 2;
    let weapon_bonus = weapon_damage + WEAPON_KIND_COUNT * 2;

    let mut units = Vec::with_capacity(n);
    for i in 0..n {
        let name = StrIndex(LittleEndian::read_u16(&data[names + i * 2..]));
        strings.resolve(tag::UNIX, name)?;
        units.push(UnitSettingEntry {
            use_default: data[i] != 0,
            hit_points: LittleEndian::read_u32(&data[hp + i * 4..]),
            shield_points: LittleEndian::read_u16(&data[shields + i * 2..]),
            armor: data[armor + i],
            build_time: LittleEndian::read_u16(&data[build_time + i * 2..]),
            mineral_cost: LittleEndian::read_u16(&data[mineral + i * 2..]),
            gas_cost: LittleEndian::read_u16(&data[gas + i * 2..]),
            name,
        });
    }
    let mut weapons = Vec::with_capacity(WEAPON_KIND_COUNT);
    for i in 0..WEAPON_KIND_COUNT {
        weapons.push(WeaponSettingEntry {
            damage: LittleEndian::read_u16(&data[weapon_damage + i * 2..]),
            bonus: LittleEndian::read_u16(&data[weapon_bonus + i * 2..]),
        });
    }
    debug!("UNIx: {} unit rows, {} weapon rows", units.len(), weapons.len());
    Ok(UnitSettings { units, weapons })
}

pub fn encode_unit_settings(settings: &UnitSettings) -> Result<Vec<u8>, ChkError> {
    if settings.units.len() != UNIT_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::UNIX,
            what: "unit setting",
            expected: UNIT_KIND_COUNT,
            actual: settings.units.len(),
        });
    }
    if settings.weapons.len() != WEAPON_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::UNIX,
            what: "weapon setting",
            expected: WEAPON_KIND_COUNT,
            actual: settings.weapons.len(),
        });
    }
    let mut out = Vec::with_capacity(UNIT_SETTINGS_SIZE);
    for entry in settings.units.iter() {
        out.push(entry.use_default as u8);
    }
    for entry in settings.units.iter() {
        out.extend_from_slice(&entry.hit_points.to_le_bytes());
    }
    for entry in settings.units.iter() {
        out.extend_from_slice(&entry.shield_points.to_le_bytes());
    }
    for entry in settings.units.iter() {
        out.push(entry.armor);
    }
    for entry in settings.units.iter() {
        out.extend_from_slice(&entry.build_time.to_le_bytes());
    }
    for entry in settings.units.iter() {
        out.extend_from_slice(&entry.mineral_cost.to_le_bytes());
    }
    for entry in settings.units.iter() {
        out.extend_from_slice(&entry.gas_cost.to_le_bytes());
    }
    for entry in settings.units.iter() {
        out.extend_from_slice(&entry.name.0.to_le_bytes());
    }
    for entry in settings.weapons.iter() {
        out.extend_from_slice(&entry.damage.to_le_bytes());
    }
    for entry in settings.weapons.iter() {
        out.extend_from_slice(&entry.bonus.to_le_bytes());
    }
    Ok(out)
}

/// UPRP slot, referenced by trigger actions that create units with
/// properties. Owner is written as 0; percents use the same 0-100
/// convention as placements.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitPropertySlot {
    pub special_flags: u16,
    pub valid_flags: u16,
    pub owner: u8,
    pub hp_percent: u8,
    pub shield_percent: u8,
    pub energy_percent: u8,
    pub resource_amount: u32,
    pub hangar_count: u16,
    pub state_flags: u16,
    pub unused: u32,
}

pub fn decode_properties(data: &[u8]) -> Result<Vec<UnitPropertySlot>, ChkError> {
    if data.len() % PROPERTY_RECORD_SIZE != 0 {
        return Err(ChkError::RecordAlign {
            tag: tag::UPRP,
            record: PROPERTY_RECORD_SIZE,
            len: data.len(),
        });
    }
    let out = data
        .chunks_exact(PROPERTY_RECORD_SIZE)
        .map(|record| UnitPropertySlot {
            special_flags: LittleEndian::read_u16(record),
            valid_flags: LittleEndian::read_u16(&record[2..]),
            owner: record[4],
            hp_percent: record[5],
            shield_percent: record[6],
            energy_percent: record[7],
            resource_amount: LittleEndian::read_u32(&record[8..]),
            hangar_count: LittleEndian::read_u16(&record[12..]),
            state_flags: LittleEndian::read_u16(&record[14..]),
            unused: LittleEndian::read_u32(&record[16..]),
        })
        .collect::<Vec<_>>();
    debug!("UPRP: {} property slots", out.len());
    Ok(out)
}

pub fn encode_properties(slots: &[UnitPropertySlot]) -> Vec<u8> {
    let mut out = vec![0; slots.len() * PROPERTY_RECORD_SIZE];
    for (record, slot) in out.chunks_exact_mut(PROPERTY_RECORD_SIZE).zip(slots) {
        LittleEndian::write_u16(record, slot.special_flags);
        LittleEndian::write_u16(&mut record[2..], slot.valid_flags);
        record[4] = slot.owner;
        record[5] = slot.hp_percent;
        record[6] = slot.shield_percent;
        record[7] = slot.energy_percent;
        LittleEndian::write_u32(&mut record[8..], slot.resource_amount);
        LittleEndian::write_u16(&mut record[12..], slot.hangar_count);
        LittleEndian::write_u16(&mut record[14..], slot.state_flags);
        LittleEndian::write_u32(&mut record[16..], slot.unused);
    }
    out
}

/// PUNI row for one unit kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitRestriction {
    pub availability: [bool; PLAYER_COUNT],
    pub global_availability: bool,
    pub uses_defaults: [bool; PLAYER_COUNT],
}

pub fn decode_restrictions(data: &[u8]) -> Result<Vec<UnitRestriction>, ChkError> {
    if data.len() != UNIT_RESTRICTIONS_SIZE {
        return Err(ChkError::SectionSize {
            tag: tag::PUNI,
            expected: UNIT_RESTRICTIONS_SIZE,
            actual: data.len(),
        });
    }
    let global = UNIT_KIND_COUNT * PLAYER_COUNT;
    let defaults = global + UNIT_KIND_COUNT;
    let mut out = Vec::with_capacity(UNIT_KIND_COUNT);
    for i in 0..UNIT_KIND_COUNT {
        let mut availability = [false; PLAYER_COUNT];
        let mut uses_defaults = [false; PLAYER_COUNT];
        for player in 0..PLAYER_COUNT {
            availability[player] = data[i * PLAYER_COUNT + player] != 0;
            uses_defaults[player] = data[defaults + i * PLAYER_COUNT + player] != 0;
        }
        out.push(UnitRestriction {
            availability,
            global_availability: data[global + i] != 0,
            uses_defaults,
        });
    }
    Ok(out)
}

pub fn encode_restrictions(restrictions: &[UnitRestriction]) -> Result<Vec<u8>, ChkError> {
    if restrictions.len() != UNIT_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::PUNI,
            what: "unit restriction",
            expected: UNIT_KIND_COUNT,
            actual: restrictions.len(),
        });
    }
    let mut out = Vec::with_capacity(UNIT_RESTRICTIONS_SIZE);
    for entry in restrictions.iter() {
        out.extend(entry.availability.iter().map(|&x| x as u8));
    }
    for entry in restrictions.iter() {
        out.push(entry.global_availability as u8);
    }
    for entry in restrictions.iter() {
        out.extend(entry.uses_defaults.iter().map(|&x| x as u8));
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::players;
    use crate::sections::SectionMap;

    fn test_players() -> [Player; PLAYER_COUNT] {
        let mut sections = SectionMap::new();
        sections.insert(tag::OWNR, vec![5; 12]);
        sections.insert(tag::SIDE, vec![1; 12]);
        sections.insert(tag::COLR, (0..8u8).collect());
        let mut forc = vec![0u8; 8];
        forc.extend_from_slice(&[0; 8]);
        forc.extend_from_slice(&[0; 4]);
        sections.insert(tag::FORC, forc);
        players::decode(&sections).unwrap().0
    }

    fn placement_record(serial: u32, unit_id: u16, owner: u8, hp: u8) -> Vec<u8> {
        let mut record = vec![0u8; UNIT_RECORD_SIZE];
        LittleEndian::write_u32(&mut record, serial);
        LittleEndian::write_u16(&mut record[4..], 64);
        LittleEndian::write_u16(&mut record[6..], 96);
        LittleEndian::write_u16(&mut record[8..], unit_id);
        record[16] = owner;
        record[17] = hp;
        record[18] = 100;
        record[19] = 100;
        record
    }

    #[test]
    fn placement_roundtrip() {
        let players = test_players();
        let mut data = placement_record(1, 0, 3, 50);
        data.extend_from_slice(&placement_record(2, 7, 0, 100));
        let placements = decode_placements(&data, &players).unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].serial, Some(1));
        assert_eq!(placements[0].owner, 3);
        assert_eq!(placements[0].hp_percent, 50);
        assert_eq!(encode_placements(&placements), data);
    }

    #[test]
    fn start_location_has_no_serial() {
        let players = test_players();
        let data = placement_record(9, START_LOCATION, 0, 100);
        let placements = decode_placements(&data, &players).unwrap();
        assert_eq!(placements[0].serial, None);
        // Serial re-encodes as 0 for start locations.
        let reencoded = encode_placements(&placements);
        assert_eq!(LittleEndian::read_u32(&reencoded), 0);
    }

    #[test]
    fn bad_owner() {
        let players = test_players();
        let data = placement_record(1, 0, 12, 100);
        assert!(decode_placements(&data, &players).is_err());
    }

    #[test]
    fn settings_roundtrip() {
        let mut strings = StringTable::default();
        strings.push("Grunty".into());
        let mut units = Vec::new();
        for i in 0..UNIT_KIND_COUNT {
            units.push(UnitSettingEntry {
                use_default: i % 2 == 0,
                hit_points: 100 + i as u32,
                shield_points: i as u16,
                armor: (i % 256) as u8,
                build_time: 24 * 15,
                mineral_cost: 50,
                gas_cost: 25,
                name: if i == 0 { StrIndex(1) } else { StrIndex::NONE },
            });
        }
        let weapons = (0..WEAPON_KIND_COUNT)
            .map(|i| WeaponSettingEntry {
                damage: 6 + i as u16,
                bonus: 1,
            })
            .collect();
        let settings = UnitSettings { units, weapons };
        let encoded = encode_unit_settings(&settings).unwrap();
        assert_eq!(encoded.len(), UNIT_SETTINGS_SIZE);
        let back = decode_unit_settings(&encoded, &strings).unwrap();
        assert_eq!(back.units, settings.units);
        assert_eq!(back.weapons, settings.weapons);
    }

    #[test]
    fn settings_cardinality() {
        let settings = UnitSettings {
            units: Vec::new(),
            weapons: Vec::new(),
        };
        assert!(encode_unit_settings(&settings).is_err());
    }

    #[test]
    fn restrictions_roundtrip() {
        let mut restrictions = Vec::new();
        for i in 0..UNIT_KIND_COUNT {
            let mut availability = [true; PLAYER_COUNT];
            availability[i % PLAYER_COUNT] = false;
            restrictions.push(UnitRestriction {
                availability,
                global_availability: i % 3 == 0,
                uses_defaults: [i % 2 == 0; PLAYER_COUNT],
            });
        }
        let encoded = encode_restrictions(&restrictions).unwrap();
        assert_eq!(encoded.len(), UNIT_RESTRICTIONS_SIZE);
        let back = decode_restrictions(&encoded).unwrap();
        assert_eq!(back, restrictions);
        assert_eq!(back.len(), UNIT_KIND_COUNT);
        assert!(back.iter().all(|x| x.availability.len() == PLAYER_COUNT));
    }

    #[test]
    fn properties_roundtrip() {
        let slots = vec![UnitPropertySlot {
            special_flags: special_flags::CLOAKED,
            valid_flags: valid_flags::HIT_POINTS | valid_flags::ENERGY,
            owner: 0,
            hp_percent: 75,
            shield_percent: 100,
            energy_percent: 50,
            resource_amount: 0,
            hangar_count: 4,
            state_flags: 0,
            unused: 0,
        }];
        let encoded = encode_properties(&slots);
        assert_eq!(encoded.len(), PROPERTY_RECORD_SIZE);
        assert_eq!(decode_properties(&encoded).unwrap(), slots);
    }
}
