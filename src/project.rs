use anyhow::{Context, Error};

use crate::merge::Map;

/// Snapshots an edit session so the editor can restore it later without
/// re-running the section decode and merge.
pub fn save_session(map: &Map) -> Result<Vec<u8>, Error> {
    bincode::serialize(map).context("Couldn't serialize session")
}

pub fn load_session(data: &[u8]) -> Result<Map, Error> {
    bincode::deserialize(data).context("Couldn't deserialize session")
}
