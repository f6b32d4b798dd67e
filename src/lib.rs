//! Codec and merge engine for the scenario file format: decodes the named
//! binary sections into a typed model, merges them with the static
//! definition tables, and re-encodes an edited model into byte-compatible
//! sections. Container extraction and trigger compilation live elsewhere;
//! this crate only ever sees section payloads and table files.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod ini;

pub mod chk;
pub mod config;
pub mod dat;
pub mod error;
pub mod locations;
pub mod merge;
pub mod names;
pub mod players;
pub mod project;
pub mod scenario;
pub mod sections;
pub mod sprites;
pub mod strings;
pub mod tech;
pub mod terrain;
pub mod units;

use std::path::Path;

use anyhow::{Context, Error};

pub use crate::chk::ChkData;
pub use crate::config::CodecConfig;
pub use crate::dat::StaticTables;
pub use crate::error::{ChkError, DatError};
pub use crate::merge::Map;
pub use crate::sections::{tag, SectionList, SectionMap, SectionTag};

/// Decodes a full scenario out of its sections and merges it with the
/// static tables into the unified model.
pub fn decode_map(
    sections: &SectionMap,
    tables: &StaticTables,
    config: &CodecConfig,
) -> Result<Map, Error> {
    let chk = if config.lossy_strings {
        ChkData::decode_lossy_strings(sections)
    } else {
        ChkData::decode(sections)
    };
    let chk = chk.context("Couldn't decode map sections")?;
    let map = merge::build(&chk, tables).context("Couldn't merge definitions")?;
    Ok(map)
}

/// Flattens the unified model and encodes it back into the ordered
/// section list the container writer consumes.
pub fn encode_map(map: &Map) -> Result<SectionList, Error> {
    let chk = merge::flatten(map).context("Couldn't flatten map model")?;
    let sections = chk.encode().context("Couldn't encode map sections")?;
    Ok(sections)
}

/// Sets up the fern logging dispatch. Call once at startup; errors other
/// than opening the log file are ignored since logging is best effort.
pub fn init_logging(log_file: Option<&Path>) -> Result<(), Error> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.file().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.level(),
                message,
            ))
        })
        .level(log::LevelFilter::Debug);
    dispatch = match log_file {
        Some(path) => {
            let file = fern::log_file(path)
                .with_context(|| format!("Couldn't open log file {}", path.display()))?;
            dispatch.chain(file)
        }
        None => dispatch.chain(std::io::stderr()),
    };
    let _ = dispatch.apply();
    Ok(())
}
