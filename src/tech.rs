use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChkError;
use crate::players::PLAYER_COUNT;
use crate::sections::tag;

pub const UPGRADE_KIND_COUNT: usize = 61;
pub const TECH_KIND_COUNT: usize = 44;

const UPGRADE_SETTINGS_SIZE: usize = UPGRADE_KIND_COUNT + 1 + UPGRADE_KIND_COUNT * 2 * 6;
const TECH_SETTINGS_SIZE: usize = TECH_KIND_COUNT + TECH_KIND_COUNT * 2 * 4;
const UPGRADE_RESTRICTIONS_SIZE: usize =
    UPGRADE_KIND_COUNT * PLAYER_COUNT * 2 + UPGRADE_KIND_COUNT * 2 + UPGRADE_KIND_COUNT * PLAYER_COUNT;
const TECH_RESTRICTIONS_SIZE: usize =
    TECH_KIND_COUNT * PLAYER_COUNT * 2 + TECH_KIND_COUNT * 2 + TECH_KIND_COUNT * PLAYER_COUNT;

/// Mineral/gas/time cost triple shared by unit, upgrade and weapon data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Cost {
    pub minerals: u16,
    pub gas: u16,
    pub time: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct TechCost {
    pub minerals: u16,
    pub gas: u16,
    pub time: u16,
    pub energy: u16,
}

/// UPGx row: base cost plus the per-level factor cost.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpgradeSetting {
    pub use_default: bool,
    pub base: Cost,
    pub factor: Cost,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UpgradeSettings {
    pub upgrades: Vec<UpgradeSetting>,
    /// Single alignment byte between the flag and cost arrays, preserved.
    pub pad: u8,
}

pub fn decode_upgrade_settings(data: &[u8]) -> Result<UpgradeSettings, ChkError> {
    if data.len() != UPGRADE_SETTINGS_SIZE {
        return Err(ChkError::SectionSize {
            tag: tag::UPGX,
            expected: UPGRADE_SETTINGS_SIZE,
            actual: data.len(),
        });
    }
    let n = UPGRADE_KIND_COUNT;
    let base_mineral = n + 1;
    let factor_mineral = base_mineral + n * 2;
    let base_gas = factor_mineral + n * 2;
    let factor_gas = base_gas + n * 2;
    let base_time = factor_gas + n * 2;
    let factor_time = base_time + n * 2;
    let mut upgrades = Vec::with_capacity(n);
    for i in 0..n {
        upgrades.push(UpgradeSetting {
            use_default: data[i] != 0,
            base: Cost {
                minerals: LittleEndian::read_u16(&data[base_mineral + i * 2..]),
                gas: LittleEndian::read_u16(&data[base_gas + i * 2..]),
                time: LittleEndian::read_u16(&data[base_time + i * 2..]),
            },
            factor: Cost {
                minerals: LittleEndian::read_u16(&data[factor_mineral + i * 2..]),
                gas: LittleEndian::read_u16(&data[factor_gas + i * 2..]),
                time: LittleEndian::read_u16(&data[factor_time + i * 2..]),
            },
        });
    }
    Ok(UpgradeSettings {
        upgrades,
        pad: data[n],
    })
}

pub fn encode_upgrade_settings(settings: &UpgradeSettings) -> Result<Vec<u8>, ChkError> {
    if settings.upgrades.len() != UPGRADE_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::UPGX,
            what: "upgrade setting",
            expected: UPGRADE_KIND_COUNT,
            actual: settings.upgrades.len(),
        });
    }
    let mut out = Vec::with_capacity(UPGRADE_SETTINGS_SIZE);
    for entry in settings.upgrades.iter() {
        out.push(entry.use_default as u8);
    }
    out.push(settings.pad);
    let columns: [fn(&UpgradeSetting) -> u16; 6] = [
        |x| x.base.minerals,
        |x| x.factor.minerals,
        |x| x.base.gas,
        |x| x.factor.gas,
        |x| x.base.time,
        |x| x.factor.time,
    ];
    for get in columns.iter() {
        for entry in settings.upgrades.iter() {
            out.extend_from_slice(&get(entry).to_le_bytes());
        }
    }
    Ok(out)
}

/// TECx row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TechSetting {
    pub use_default: bool,
    pub cost: TechCost,
}

pub fn decode_tech_settings(data: &[u8]) -> Result<Vec<TechSetting>, ChkError> {
    if data.len() != TECH_SETTINGS_SIZE {
        return Err(ChkError::SectionSize {
            tag: tag::TECX,
            expected: TECH_SETTINGS_SIZE,
            actual: data.len(),
        });
    }
    let n = TECH_KIND_COUNT;
    let minerals = n;
    let gas = minerals + n * 2;
    let time = gas + n * 2;
    let energy = time + n * 2;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(TechSetting {
            use_default: data[i] != 0,
            cost: TechCost {
                minerals: LittleEndian::read_u16(&data[minerals + i * 2..]),
                gas: LittleEndian::read_u16(&data[gas + i * 2..]),
                time: LittleEndian::read_u16(&data[time + i * 2..]),
                energy: LittleEndian::read_u16(&data[energy + i * 2..]),
            },
        });
    }
    Ok(out)
}

pub fn encode_tech_settings(settings: &[TechSetting]) -> Result<Vec<u8>, ChkError> {
    if settings.len() != TECH_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::TECX,
            what: "tech setting",
            expected: TECH_KIND_COUNT,
            actual: settings.len(),
        });
    }
    let mut out = Vec::with_capacity(TECH_SETTINGS_SIZE);
    for entry in settings.iter() {
        out.push(entry.use_default as u8);
    }
    let columns: [fn(&TechSetting) -> u16; 4] = [
        |x| x.cost.minerals,
        |x| x.cost.gas,
        |x| x.cost.time,
        |x| x.cost.energy,
    ];
    for get in columns.iter() {
        for entry in settings.iter() {
            out.extend_from_slice(&get(entry).to_le_bytes());
        }
    }
    Ok(out)
}

/// PUPx row for one upgrade kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRestriction {
    pub player_max_level: [u8; PLAYER_COUNT],
    pub player_start_level: [u8; PLAYER_COUNT],
    pub default_max_level: u8,
    pub default_start_level: u8,
    pub uses_defaults: [bool; PLAYER_COUNT],
}

pub fn decode_upgrade_restrictions(data: &[u8]) -> Result<Vec<UpgradeRestriction>, ChkError> {
    if data.len() != UPGRADE_RESTRICTIONS_SIZE {
        return Err(ChkError::SectionSize {
            tag: tag::PUPX,
            expected: UPGRADE_RESTRICTIONS_SIZE,
            actual: data.len(),
        });
    }
    let n = UPGRADE_KIND_COUNT;
    let start_levels = n * PLAYER_COUNT;
    let default_max = start_levels + n * PLAYER_COUNT;
    let default_start = default_max + n;
    let defaults = default_start + n;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut player_max_level = [0; PLAYER_COUNT];
        let mut player_start_level = [0; PLAYER_COUNT];
        let mut uses_defaults = [false; PLAYER_COUNT];
        for player in 0..PLAYER_COUNT {
            player_max_level[player] = data[i * PLAYER_COUNT + player];
            player_start_level[player] = data[start_levels + i * PLAYER_COUNT + player];
            uses_defaults[player] = data[defaults + i * PLAYER_COUNT + player] != 0;
        }
        out.push(UpgradeRestriction {
            player_max_level,
            player_start_level,
            default_max_level: data[default_max + i],
            default_start_level: data[default_start + i],
            uses_defaults,
        });
    }
    Ok(out)
}

pub fn encode_upgrade_restrictions(
    restrictions: &[UpgradeRestriction],
) -> Result<Vec<u8>, ChkError> {
    if restrictions.len() != UPGRADE_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::PUPX,
            what: "upgrade restriction",
            expected: UPGRADE_KIND_COUNT,
            actual: restrictions.len(),
        });
    }
    let mut out = Vec::with_capacity(UPGRADE_RESTRICTIONS_SIZE);
    for entry in restrictions.iter() {
        out.extend_from_slice(&entry.player_max_level);
    }
    for entry in restrictions.iter() {
        out.extend_from_slice(&entry.player_start_level);
    }
    for entry in restrictions.iter() {
        out.push(entry.default_max_level);
    }
    for entry in restrictions.iter() {
        out.push(entry.default_start_level);
    }
    for entry in restrictions.iter() {
        out.extend(entry.uses_defaults.iter().map(|&x| x as u8));
    }
    Ok(out)
}

/// PTEx row for one tech kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TechRestriction {
    pub availability: [bool; PLAYER_COUNT],
    pub researched: [bool; PLAYER_COUNT],
    pub default_availability: bool,
    pub default_researched: bool,
    pub uses_defaults: [bool; PLAYER_COUNT],
}

pub fn decode_tech_restrictions(data: &[u8]) -> Result<Vec<TechRestriction>, ChkError> {
    if data.len() != TECH_RESTRICTIONS_SIZE {
        return Err(ChkError::SectionSize {
            tag: tag::PTEX,
            expected: TECH_RESTRICTIONS_SIZE,
            actual: data.len(),
        });
    }
    let n = TECH_KIND_COUNT;
    let researched = n * PLAYER_COUNT;
    let default_availability = researched + n * PLAYER_COUNT;
    let default_researched = default_availability + n;
    let defaults = default_researched + n;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = TechRestriction {
            availability: [false; PLAYER_COUNT],
            researched: [false; PLAYER_COUNT],
            default_availability: data[default_availability + i] != 0,
            default_researched: data[default_researched + i] != 0,
            uses_defaults: [false; PLAYER_COUNT],
        };
        for player in 0..PLAYER_COUNT {
            row.availability[player] = data[i * PLAYER_COUNT + player] != 0;
            row.researched[player] = data[researched + i * PLAYER_COUNT + player] != 0;
            row.uses_defaults[player] = data[defaults + i * PLAYER_COUNT + player] != 0;
        }
        out.push(row);
    }
    Ok(out)
}

pub fn encode_tech_restrictions(restrictions: &[TechRestriction]) -> Result<Vec<u8>, ChkError> {
    if restrictions.len() != TECH_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::PTEX,
            what: "tech restriction",
            expected: TECH_KIND_COUNT,
            actual: restrictions.len(),
        });
    }
    let mut out = Vec::with_capacity(TECH_RESTRICTIONS_SIZE);
    for entry in restrictions.iter() {
        out.extend(entry.availability.iter().map(|&x| x as u8));
    }
    for entry in restrictions.iter() {
        out.extend(entry.researched.iter().map(|&x| x as u8));
    }
    for entry in restrictions.iter() {
        out.push(entry.default_availability as u8);
    }
    for entry in restrictions.iter() {
        out.push(entry.default_researched as u8);
    }
    for entry in restrictions.iter() {
        out.extend(entry.uses_defaults.iter().map(|&x| x as u8));
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn upgrade_settings_roundtrip() {
        let upgrades = (0..UPGRADE_KIND_COUNT)
            .map(|i| UpgradeSetting {
                use_default: i % 4 == 0,
                base: Cost {
                    minerals: 100 + i as u16,
                    gas: 100,
                    time: 24 * 60,
                },
                factor: Cost {
                    minerals: 75,
                    gas: 75,
                    time: 480,
                },
            })
            .collect();
        let settings = UpgradeSettings { upgrades, pad: 0 };
        let encoded = encode_upgrade_settings(&settings).unwrap();
        assert_eq!(encoded.len(), 794);
        let back = decode_upgrade_settings(&encoded).unwrap();
        assert_eq!(back.upgrades, settings.upgrades);
        assert_eq!(back.pad, 0);
    }

    #[test]
    fn tech_settings_roundtrip() {
        let settings = (0..TECH_KIND_COUNT)
            .map(|i| TechSetting {
                use_default: i == 0,
                cost: TechCost {
                    minerals: 100,
                    gas: 150,
                    time: 1200,
                    energy: 50 + i as u16,
                },
            })
            .collect::<Vec<_>>();
        let encoded = encode_tech_settings(&settings).unwrap();
        assert_eq!(encoded.len(), 396);
        assert_eq!(decode_tech_settings(&encoded).unwrap(), settings);
    }

    #[test]
    fn upgrade_restrictions_roundtrip() {
        let restrictions = (0..UPGRADE_KIND_COUNT)
            .map(|i| UpgradeRestriction {
                player_max_level: [3; PLAYER_COUNT],
                player_start_level: [(i % 4) as u8; PLAYER_COUNT],
                default_max_level: 3,
                default_start_level: 0,
                uses_defaults: [true; PLAYER_COUNT],
            })
            .collect::<Vec<_>>();
        let encoded = encode_upgrade_restrictions(&restrictions).unwrap();
        assert_eq!(encoded.len(), 2318);
        let back = decode_upgrade_restrictions(&encoded).unwrap();
        assert_eq!(back, restrictions);
        assert_eq!(back.len(), UPGRADE_KIND_COUNT);
    }

    #[test]
    fn tech_restrictions_roundtrip() {
        let restrictions = (0..TECH_KIND_COUNT)
            .map(|i| TechRestriction {
                availability: [i % 2 == 0; PLAYER_COUNT],
                researched: [false; PLAYER_COUNT],
                default_availability: true,
                default_researched: i == 3,
                uses_defaults: [true; PLAYER_COUNT],
            })
            .collect::<Vec<_>>();
        let encoded = encode_tech_restrictions(&restrictions).unwrap();
        assert_eq!(encoded.len(), 1672);
        let back = decode_tech_restrictions(&encoded).unwrap();
        assert_eq!(back, restrictions);
    }

    #[test]
    fn cardinality_is_strict() {
        assert!(encode_tech_settings(&[]).is_err());
        assert!(encode_upgrade_restrictions(&[]).is_err());
        assert!(encode_tech_restrictions(&[]).is_err());
    }
}
