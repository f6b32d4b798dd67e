use std::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChkError;
use crate::sections::{tag, SectionMap};
use crate::strings::StrIndex;

pub const PLAYER_COUNT: usize = 12;
pub const FORCE_COUNT: usize = 4;
/// Slots 8-11 have no color or force assignment.
pub const COLORED_PLAYERS: usize = 8;

/// OWNR controller byte.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Controller {
    Inactive,
    ComputerGame,
    OccupiedHuman,
    Rescue,
    Unused,
    Computer,
    Open,
    Neutral,
    Closed,
}

static CONTROLLERS: &[Controller] = &[
    Controller::Inactive,
    Controller::ComputerGame,
    Controller::OccupiedHuman,
    Controller::Rescue,
    Controller::Unused,
    Controller::Computer,
    Controller::Open,
    Controller::Neutral,
    Controller::Closed,
];

impl Controller {
    pub fn from_raw(raw: u8) -> Option<Controller> {
        CONTROLLERS.get(raw as usize).copied()
    }

    pub fn raw(self) -> u8 {
        self as u8
    }
}

/// SIDE race byte.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Race {
    Zerg,
    Terran,
    Protoss,
    Independent,
    Neutral,
    UserSelectable,
    Random,
    Inactive,
}

static RACES: &[Race] = &[
    Race::Zerg,
    Race::Terran,
    Race::Protoss,
    Race::Independent,
    Race::Neutral,
    Race::UserSelectable,
    Race::Random,
    Race::Inactive,
];

impl Race {
    pub fn from_raw(raw: u8) -> Option<Race> {
        RACES.get(raw as usize).copied()
    }

    pub fn raw(self) -> u8 {
        self as u8
    }
}

/// Default in-game palette the COLR color index selects from.
pub static DEFAULT_PLAYER_COLORS: [(u8, u8, u8); 13] = [
    (244, 4, 4),
    (12, 72, 204),
    (44, 180, 148),
    (136, 4, 156),
    (248, 140, 20),
    (112, 48, 20),
    (204, 224, 208),
    (252, 252, 56),
    (8, 128, 8),
    (252, 252, 124),
    (252, 252, 124),
    (236, 196, 176),
    (64, 104, 212),
];

#[derive(Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u8,
    pub controller: Controller,
    pub race: Race,
    /// Palette index; `None` for slots 8-11.
    pub color: Option<u8>,
    /// Force 0-3; slots 8-11 keep 0.
    pub force: u8,
}

impl Player {
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let color = self.color? as usize;
        DEFAULT_PLAYER_COLORS.get(color).copied()
    }
}

pub mod force_flags {
    pub const RANDOM_START_LOCATION: u8 = 0x1;
    pub const ALLIES: u8 = 0x2;
    pub const ALLIED_VICTORY: u8 = 0x4;
    pub const SHARED_VISION: u8 = 0x8;
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Force {
    pub name: StrIndex,
    pub flags: u8,
}

pub fn decode(sections: &SectionMap) -> Result<([Player; PLAYER_COUNT], [Force; FORCE_COUNT]), ChkError> {
    let ownr = sections.require(tag::OWNR)?;
    if ownr.len() != PLAYER_COUNT {
        return Err(ChkError::SectionSize {
            tag: tag::OWNR,
            expected: PLAYER_COUNT,
            actual: ownr.len(),
        });
    }
    let side = sections.require(tag::SIDE)?;
    if side.len() != PLAYER_COUNT {
        return Err(ChkError::SectionSize {
            tag: tag::SIDE,
            expected: PLAYER_COUNT,
            actual: side.len(),
        });
    }
    let colr = sections.require(tag::COLR)?;
    if colr.len() != COLORED_PLAYERS {
        return Err(ChkError::SectionSize {
            tag: tag::COLR,
            expected: COLORED_PLAYERS,
            actual: colr.len(),
        });
    }
    let forc = sections.require(tag::FORC)?;
    if forc.len() != 20 {
        return Err(ChkError::SectionSize {
            tag: tag::FORC,
            expected: 20,
            actual: forc.len(),
        });
    }

    let mut players = Vec::with_capacity(PLAYER_COUNT);
    for i in 0..PLAYER_COUNT {
        let controller = Controller::from_raw(ownr[i]).ok_or(ChkError::BadReference {
            tag: tag::OWNR,
            table: "controller",
            index: ownr[i] as u32,
            limit: CONTROLLERS.len() as u32,
        })?;
        let race = Race::from_raw(side[i]).ok_or(ChkError::BadReference {
            tag: tag::SIDE,
            table: "race",
            index: side[i] as u32,
            limit: RACES.len() as u32,
        })?;
        let force = if i < COLORED_PLAYERS { forc[i] } else { 0 };
        if force as usize >= FORCE_COUNT && i < COLORED_PLAYERS {
            return Err(ChkError::BadReference {
                tag: tag::FORC,
                table: "force",
                index: force as u32,
                limit: FORCE_COUNT as u32,
            });
        }
        players.push(Player {
            id: i as u8,
            controller,
            race,
            color: if i < COLORED_PLAYERS { Some(colr[i]) } else { None },
            force,
        });
    }

    let mut forces = Vec::with_capacity(FORCE_COUNT);
    for i in 0..FORCE_COUNT {
        // Name is stored 1-based, 0 = unnamed force.
        let name = StrIndex(LittleEndian::read_u16(&forc[8 + i * 2..]));
        forces.push(Force {
            name,
            flags: forc[16 + i],
        });
    }

    debug!("Players decoded, {} forces", FORCE_COUNT);
    let players = match <[Player; PLAYER_COUNT]>::try_from(players) {
        Ok(o) => o,
        Err(_) => unreachable!(),
    };
    let forces = match <[Force; FORCE_COUNT]>::try_from(forces) {
        Ok(o) => o,
        Err(_) => unreachable!(),
    };
    Ok((players, forces))
}

pub fn encode_ownr(players: &[Player; PLAYER_COUNT]) -> Vec<u8> {
    players.iter().map(|x| x.controller.raw()).collect()
}

pub fn encode_side(players: &[Player; PLAYER_COUNT]) -> Vec<u8> {
    players.iter().map(|x| x.race.raw()).collect()
}

pub fn encode_colr(players: &[Player; PLAYER_COUNT]) -> Vec<u8> {
    players[..COLORED_PLAYERS]
        .iter()
        .map(|x| x.color.unwrap_or(0))
        .collect()
}

pub fn encode_forc(
    players: &[Player; PLAYER_COUNT],
    forces: &[Force; FORCE_COUNT],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(20);
    for player in players[..COLORED_PLAYERS].iter() {
        out.push(player.force);
    }
    for force in forces.iter() {
        out.extend_from_slice(&force.name.0.to_le_bytes());
    }
    for force in forces.iter() {
        out.push(force.flags);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn player_sections() -> SectionMap {
        let mut sections = SectionMap::new();
        let mut ownr = vec![6u8; 8];
        ownr.extend_from_slice(&[0, 0, 0, 7]);
        sections.insert(tag::OWNR, ownr);
        let mut side = vec![5u8; 8];
        side.extend_from_slice(&[7, 7, 7, 4]);
        sections.insert(tag::SIDE, side);
        sections.insert(tag::COLR, (0..8u8).collect());
        let mut forc = vec![0u8, 0, 1, 1, 2, 2, 3, 3];
        for name in [1u16, 2, 0, 0].iter() {
            forc.extend_from_slice(&name.to_le_bytes());
        }
        forc.extend_from_slice(&[
            force_flags::ALLIES | force_flags::ALLIED_VICTORY,
            force_flags::SHARED_VISION,
            0,
            0,
        ]);
        sections.insert(tag::FORC, forc);
        sections
    }

    #[test]
    fn decode_roundtrip() {
        let sections = player_sections();
        let (players, forces) = decode(&sections).unwrap();
        assert_eq!(players[0].controller, Controller::Open);
        assert_eq!(players[11].controller, Controller::Neutral);
        assert_eq!(players[3].race, Race::UserSelectable);
        assert_eq!(players[2].color, Some(2));
        assert_eq!(players[2].rgb(), Some((44, 180, 148)));
        assert_eq!(players[9].color, None);
        assert_eq!(players[9].rgb(), None);
        assert_eq!(players[4].force, 2);
        assert_eq!(forces[0].name, StrIndex(1));
        assert_eq!(forces[2].name, StrIndex::NONE);
        assert_eq!(forces[1].flags, force_flags::SHARED_VISION);

        assert_eq!(encode_ownr(&players), sections.get(tag::OWNR).unwrap());
        assert_eq!(encode_side(&players), sections.get(tag::SIDE).unwrap());
        assert_eq!(encode_colr(&players), sections.get(tag::COLR).unwrap());
        assert_eq!(encode_forc(&players, &forces), sections.get(tag::FORC).unwrap());
    }

    #[test]
    fn bad_controller() {
        let mut sections = player_sections();
        sections.insert(tag::OWNR, vec![9; 12]);
        assert!(decode(&sections).is_err());
    }
}
