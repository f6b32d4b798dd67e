use std::path::PathBuf;

use anyhow::{anyhow, Context, Error};

use crate::ini::Ini;

/// Codec settings, usually read from `scmap.ini`.
pub struct CodecConfig {
    /// Directory holding the static definition tables (`units.dat` etc).
    pub table_dir: PathBuf,
    /// Replace undecodable scenario string bytes instead of failing.
    pub lossy_strings: bool,
    /// Optional log file for the fern dispatch set up by `init_logging`.
    pub log_file: Option<PathBuf>,
}

impl Default for CodecConfig {
    fn default() -> CodecConfig {
        CodecConfig {
            table_dir: "arr".into(),
            lossy_strings: false,
            log_file: None,
        }
    }
}

fn bool_field(out: &mut bool, value: &str, field: &'static str) -> Result<(), Error> {
    match value {
        "true" | "True" | "1" | "y" | "Y" => *out = true,
        "false" | "False" | "0" | "n" | "N" => *out = false,
        _ => {
            return Err(anyhow!("Invalid value `{}` for bool {}", value, field));
        }
    }
    Ok(())
}

pub fn read_config(data: &[u8]) -> Result<CodecConfig, Error> {
    let ini = Ini::open(data).context("Couldn't parse config")?;
    let mut config = CodecConfig::default();
    for section in &ini.sections {
        match &*section.name {
            "tables" => {
                for (key, value) in &section.values {
                    match &**key {
                        "dir" => config.table_dir = value.into(),
                        x => return Err(anyhow!("unknown key tables.{}", x)),
                    }
                }
            }
            "strings" => {
                for (key, value) in &section.values {
                    match &**key {
                        "lossy" => bool_field(&mut config.lossy_strings, value, "strings.lossy")?,
                        x => return Err(anyhow!("unknown key strings.{}", x)),
                    }
                }
            }
            "log" => {
                for (key, value) in &section.values {
                    match &**key {
                        "file" => config.log_file = Some(value.into()),
                        x => return Err(anyhow!("unknown key log.{}", x)),
                    }
                }
            }
            x => return Err(anyhow!("unknown section {}", x)),
        }
    }
    Ok(config)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = read_config(b"").unwrap();
        assert_eq!(config.table_dir, PathBuf::from("arr"));
        assert_eq!(config.lossy_strings, false);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn full_config() {
        let text = b"\
            [tables]\n\
            dir = data/arr\n\
            [strings]\n\
            lossy = true\n\
            [log]\n\
            file = codec.log\n";
        let config = read_config(text).unwrap();
        assert_eq!(config.table_dir, PathBuf::from("data/arr"));
        assert_eq!(config.lossy_strings, true);
        assert_eq!(config.log_file, Some(PathBuf::from("codec.log")));
    }

    #[test]
    fn unknown_key() {
        assert!(read_config(b"[tables]\npath = arr\n").is_err());
        assert!(read_config(b"[nope]\nx = 1\n").is_err());
    }
}
