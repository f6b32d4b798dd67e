use std::io::{BufRead, BufReader, Read};
use std::mem;

use anyhow::{anyhow, Error};

pub struct Ini {
    pub sections: Vec<Section>,
}

pub struct Section {
    pub name: String,
    pub values: Vec<(String, String)>,
}

impl Ini {
    pub fn open<R: Read>(file: R) -> Result<Ini, Error> {
        let reader = BufReader::new(file);
        let mut sections = Vec::new();
        let mut current_section = Vec::new();
        let mut current_section_name = String::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("[") && line.ends_with("]") {
                let new_name = (&line[1..line.len() - 1]).trim().into();
                let old_name = mem::replace(&mut current_section_name, new_name);
                if !current_section.is_empty() || !old_name.is_empty() {
                    sections.push(Section {
                        name: old_name,
                        values: mem::replace(&mut current_section, Vec::new()),
                    });
                }
            } else {
                if line.starts_with(";") || line.starts_with("#") || line.starts_with("//") {
                    // Comment
                } else {
                    let eq = match line.find("=") {
                        Some(s) => s,
                        None => return Err(anyhow!("Invalid line \"{}\"", line)),
                    };
                    let key = (&line[..eq]).trim().into();
                    let value = (&line[eq + 1..]).trim().into();
                    current_section.push((key, value));
                }
            }
        }
        if !current_section.is_empty() || !current_section_name.is_empty() {
            sections.push(Section {
                name: current_section_name,
                values: current_section,
            });
        }
        Ok(Ini { sections })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|x| x.name == name)
    }
}

impl Section {
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.iter().find(|x| x.0 == key).map(|x| &*x.1)
    }
}

#[test]
fn test() {
    const TEXT: &str = r###"
[tables]
; Extracted from the game archive
dir = data/arr

[strings]
// Tolerate maps with mixed encodings
lossy = true

[log]
file = codec.log
"###;
    let read = TEXT.as_bytes();
    let ini = Ini::open(read).unwrap();
    assert_eq!(ini.sections[0].name, "tables");
    assert_eq!(ini.sections[1].name, "strings");
    assert_eq!(ini.sections[2].name, "log");
    assert_eq!(ini.sections[0].values[0], ("dir".to_string(), "data/arr".to_string()));
    assert_eq!(ini.section("strings").unwrap().value("lossy"), Some("true"));
    assert_eq!(ini.section("log").unwrap().value("missing"), None);
    assert!(ini.section("nope").is_none());
}

#[test]
fn invalid_line() {
    assert!(Ini::open("[a]\nno equals sign".as_bytes()).is_err());
}
