use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChkError;
use crate::players::{Player, PLAYER_COUNT};
use crate::sections::tag;

pub const SPRITE_KIND_COUNT: usize = 517;

const RECORD_SIZE: usize = 10;

pub mod sprite_flags {
    /// Set for pure sprites; clear means the sprite is drawn as a unit.
    pub const DRAW_AS_SPRITE: u16 = 0x1000;
    pub const DISABLED: u16 = 0x8000;
}

/// Raw THG2 record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub sprite_id: u16,
    pub x: u16,
    pub y: u16,
    pub owner: u8,
    pub unused: u8,
    pub flags: u16,
}

pub fn decode_placements(
    data: &[u8],
    players: &[Player; PLAYER_COUNT],
) -> Result<Vec<SpritePlacement>, ChkError> {
    if data.len() % RECORD_SIZE != 0 {
        return Err(ChkError::RecordAlign {
            tag: tag::THG2,
            record: RECORD_SIZE,
            len: data.len(),
        });
    }
    let mut out = Vec::with_capacity(data.len() / RECORD_SIZE);
    for record in data.chunks_exact(RECORD_SIZE) {
        let owner = record[6];
        if owner as usize >= players.len() {
            return Err(ChkError::BadReference {
                tag: tag::THG2,
                table: "player",
                index: owner as u32,
                limit: players.len() as u32,
            });
        }
        out.push(SpritePlacement {
            sprite_id: LittleEndian::read_u16(record),
            x: LittleEndian::read_u16(&record[2..]),
            y: LittleEndian::read_u16(&record[4..]),
            owner,
            unused: record[7],
            flags: LittleEndian::read_u16(&record[8..]),
        });
    }
    debug!("THG2: {} sprites", out.len());
    Ok(out)
}

pub fn encode_placements(placements: &[SpritePlacement]) -> Vec<u8> {
    let mut out = vec![0; placements.len() * RECORD_SIZE];
    for (record, sprite) in out.chunks_exact_mut(RECORD_SIZE).zip(placements) {
        LittleEndian::write_u16(record, sprite.sprite_id);
        LittleEndian::write_u16(&mut record[2..], sprite.x);
        LittleEndian::write_u16(&mut record[4..], sprite.y);
        record[6] = sprite.owner;
        record[7] = sprite.unused;
        LittleEndian::write_u16(&mut record[8..], sprite.flags);
    }
    out
}
