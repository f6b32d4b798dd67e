use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChkError;
use crate::sections::{tag, SectionMap};

/// Tileset ids as stored in ERA.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Tileset {
    Ashworld,
    Badlands,
    Desert,
    Ice,
    Installation,
    Jungle,
    Platform,
    Twilight,
}

static TILESETS: &[Tileset] = &[
    Tileset::Ashworld,
    Tileset::Badlands,
    Tileset::Desert,
    Tileset::Ice,
    Tileset::Installation,
    Tileset::Jungle,
    Tileset::Platform,
    Tileset::Twilight,
];

impl Tileset {
    pub fn from_raw(raw: u16) -> Option<Tileset> {
        TILESETS.get(raw as usize).copied()
    }

    pub fn raw(self) -> u16 {
        self as u16
    }
}

/// One terrain cell; packs into a 16-bit MTXM value as `(group << 4) | id`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub group: u16,
    pub id: u8,
}

impl Tile {
    pub fn from_raw(raw: u16) -> Tile {
        Tile {
            group: raw >> 4,
            id: (raw & 0xf) as u8,
        }
    }

    pub fn raw(self) -> u16 {
        (self.group << 4) | (self.id as u16 & 0xf)
    }
}

/// DIM/ERA/MTXM/MASK combined: dimensions, tileset, the tile grid and the
/// per-tile fog-of-war bits. Both grids are row-major, width * height cells.
#[derive(Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub width: u16,
    pub height: u16,
    pub tileset: Tileset,
    pub tiles: Vec<Tile>,
    pub fog: Vec<u8>,
}

impl Terrain {
    pub fn decode(sections: &SectionMap) -> Result<Terrain, ChkError> {
        let dim = sections.require(tag::DIM)?;
        if dim.len() != 4 {
            return Err(ChkError::SectionSize {
                tag: tag::DIM,
                expected: 4,
                actual: dim.len(),
            });
        }
        let width = LittleEndian::read_u16(dim);
        let height = LittleEndian::read_u16(&dim[2..]);

        let era = sections.require(tag::ERA)?;
        if era.len() != 2 {
            return Err(ChkError::SectionSize {
                tag: tag::ERA,
                expected: 2,
                actual: era.len(),
            });
        }
        let raw_tileset = LittleEndian::read_u16(era);
        let tileset = Tileset::from_raw(raw_tileset).ok_or(ChkError::BadReference {
            tag: tag::ERA,
            table: "tileset",
            index: raw_tileset as u32,
            limit: TILESETS.len() as u32,
        })?;

        let cells = width as usize * height as usize;
        let mtxm = sections.require(tag::MTXM)?;
        if mtxm.len() != cells * 2 {
            return Err(ChkError::SectionSize {
                tag: tag::MTXM,
                expected: cells * 2,
                actual: mtxm.len(),
            });
        }
        let tiles = mtxm
            .chunks_exact(2)
            .map(|x| Tile::from_raw(LittleEndian::read_u16(x)))
            .collect::<Vec<_>>();

        let mask = sections.require(tag::MASK)?;
        if mask.len() != cells {
            return Err(ChkError::SectionSize {
                tag: tag::MASK,
                expected: cells,
                actual: mask.len(),
            });
        }
        debug!("Terrain: {}x{} {:?}", width, height, tileset);
        Ok(Terrain {
            width,
            height,
            tileset,
            tiles,
            fog: mask.into(),
        })
    }

    pub fn encode_dim(&self) -> Vec<u8> {
        let mut out = vec![0; 4];
        LittleEndian::write_u16(&mut out, self.width);
        LittleEndian::write_u16(&mut out[2..], self.height);
        out
    }

    pub fn encode_era(&self) -> Vec<u8> {
        let mut out = vec![0; 2];
        LittleEndian::write_u16(&mut out, self.tileset.raw());
        out
    }

    pub fn encode_mtxm(&self) -> Result<Vec<u8>, ChkError> {
        let cells = self.width as usize * self.height as usize;
        if self.tiles.len() != cells {
            return Err(ChkError::Cardinality {
                tag: tag::MTXM,
                what: "tile",
                expected: cells,
                actual: self.tiles.len(),
            });
        }
        let mut out = vec![0; cells * 2];
        for (i, tile) in self.tiles.iter().enumerate() {
            LittleEndian::write_u16(&mut out[i * 2..], tile.raw());
        }
        Ok(out)
    }

    pub fn encode_mask(&self) -> Result<Vec<u8>, ChkError> {
        let cells = self.width as usize * self.height as usize;
        if self.fog.len() != cells {
            return Err(ChkError::Cardinality {
                tag: tag::MASK,
                what: "fog cell",
                expected: cells,
                actual: self.fog.len(),
            });
        }
        Ok(self.fog.clone())
    }

    pub fn tile(&self, x: u16, y: u16) -> Option<Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn terrain_sections(width: u16, height: u16, era: u16) -> SectionMap {
        let cells = width as usize * height as usize;
        let mut dim = Vec::new();
        dim.extend_from_slice(&width.to_le_bytes());
        dim.extend_from_slice(&height.to_le_bytes());
        let mut sections = SectionMap::new();
        sections.insert(tag::DIM, dim);
        sections.insert(tag::ERA, era.to_le_bytes().to_vec());
        let mut mtxm = Vec::new();
        for i in 0..cells {
            mtxm.extend_from_slice(&(i as u16).to_le_bytes());
        }
        sections.insert(tag::MTXM, mtxm);
        sections.insert(tag::MASK, vec![0xff; cells]);
        sections
    }

    #[test]
    fn decode_roundtrip() {
        let sections = terrain_sections(4, 3, 5);
        let terrain = Terrain::decode(&sections).unwrap();
        assert_eq!(terrain.tileset, Tileset::Jungle);
        assert_eq!(terrain.tiles.len(), 12);
        assert_eq!(terrain.tile(1, 0), Some(Tile { group: 0, id: 1 }));
        assert_eq!(terrain.tile(1, 2), Some(Tile { group: 0, id: 9 }));
        assert_eq!(terrain.tile(4, 0), None);
        assert_eq!(terrain.encode_mtxm().unwrap(), sections.get(tag::MTXM).unwrap());
        assert_eq!(terrain.encode_mask().unwrap(), sections.get(tag::MASK).unwrap());
        assert_eq!(terrain.encode_dim(), sections.get(tag::DIM).unwrap());
        assert_eq!(terrain.encode_era(), sections.get(tag::ERA).unwrap());
    }

    #[test]
    fn tile_packing() {
        let tile = Tile::from_raw(0x1234);
        assert_eq!(tile.group, 0x123);
        assert_eq!(tile.id, 4);
        assert_eq!(tile.raw(), 0x1234);
    }

    #[test]
    fn bad_tileset() {
        let sections = terrain_sections(2, 2, 8);
        assert!(Terrain::decode(&sections).is_err());
    }

    #[test]
    fn short_mtxm() {
        let mut sections = terrain_sections(2, 2, 0);
        sections.insert(tag::MTXM, vec![0; 6]);
        assert!(Terrain::decode(&sections).is_err());
    }
}
