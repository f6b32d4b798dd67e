use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChkError;
use crate::sections::{tag, SectionMap};
use crate::strings::{StrIndex, StringTable};

/// SPRP: scenario name and description, stored 1-based (0 = none).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProperties {
    pub name: StrIndex,
    pub description: StrIndex,
}

impl ScenarioProperties {
    pub fn decode(data: &[u8], strings: &StringTable) -> Result<ScenarioProperties, ChkError> {
        if data.len() != 4 {
            return Err(ChkError::SectionSize {
                tag: tag::SPRP,
                expected: 4,
                actual: data.len(),
            });
        }
        let name = StrIndex(LittleEndian::read_u16(data));
        let description = StrIndex(LittleEndian::read_u16(&data[2..]));
        strings.resolve(tag::SPRP, name)?;
        strings.resolve(tag::SPRP, description)?;
        Ok(ScenarioProperties { name, description })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0; 4];
        LittleEndian::write_u16(&mut out, self.name.0);
        LittleEndian::write_u16(&mut out[2..], self.description.0);
        out
    }
}

/// VER/VCOD carried through opaquely. The VCOD checksum is never
/// recomputed; an edited map keeps the template's blob.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub version: Vec<u8>,
    pub code: Vec<u8>,
}

impl Validation {
    pub fn decode(sections: &SectionMap) -> Result<Validation, ChkError> {
        Ok(Validation {
            version: sections.require(tag::VER)?.into(),
            code: sections.require(tag::VCOD)?.into(),
        })
    }
}

/// TRIG and MBRF bytecode blobs; trigger semantics are out of scope, so
/// these only round-trip.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawTriggers {
    pub triggers: Vec<u8>,
    pub briefing: Vec<u8>,
}

impl RawTriggers {
    pub fn decode(sections: &SectionMap) -> Result<RawTriggers, ChkError> {
        Ok(RawTriggers {
            triggers: sections.require(tag::TRIG)?.into(),
            briefing: sections.require(tag::MBRF)?.into(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scenario_roundtrip() {
        let mut strings = StringTable::default();
        strings.push("Big Game Hunters".into());
        strings.push("A map".into());
        let properties = ScenarioProperties {
            name: StrIndex(1),
            description: StrIndex(2),
        };
        let encoded = properties.encode();
        assert_eq!(ScenarioProperties::decode(&encoded, &strings).unwrap(), properties);
    }

    #[test]
    fn unnamed_scenario() {
        let strings = StringTable::default();
        let decoded = ScenarioProperties::decode(&[0, 0, 0, 0], &strings).unwrap();
        assert!(decoded.name.is_none());
        assert!(decoded.description.is_none());
    }

    #[test]
    fn bad_name_index() {
        let strings = StringTable::default();
        assert!(ScenarioProperties::decode(&[1, 0, 0, 0], &strings).is_err());
    }
}
