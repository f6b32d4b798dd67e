use crate::error::ChkError;
use crate::locations::Locations;
use crate::players::{self, Force, Player, FORCE_COUNT, PLAYER_COUNT};
use crate::scenario::{RawTriggers, ScenarioProperties, Validation};
use crate::sections::{tag, SectionList, SectionMap};
use crate::sprites::{self, SpritePlacement};
use crate::strings::StringTable;
use crate::tech::{
    self, TechRestriction, TechSetting, UpgradeRestriction, UpgradeSettings,
};
use crate::terrain::Terrain;
use crate::units::{
    self, UnitPlacement, UnitPropertySlot, UnitRestriction, UnitSettings,
};

/// Every decoded section of a scenario file.
///
/// This is the codec-level view: values are kept the way the format stores
/// them (percentages, string indices, restriction stacks). The merge layer
/// builds the editor-facing model on top of this.
#[derive(Clone, Serialize, Deserialize)]
pub struct ChkData {
    pub terrain: Terrain,
    pub players: [Player; PLAYER_COUNT],
    pub forces: [Force; FORCE_COUNT],
    pub strings: StringTable,
    pub locations: Locations,
    pub unit_settings: UnitSettings,
    pub placements: Vec<UnitPlacement>,
    pub sprite_placements: Vec<SpritePlacement>,
    pub unit_properties: Vec<UnitPropertySlot>,
    pub unit_restrictions: Vec<UnitRestriction>,
    pub upgrade_settings: UpgradeSettings,
    pub tech_settings: Vec<TechSetting>,
    pub upgrade_restrictions: Vec<UpgradeRestriction>,
    pub tech_restrictions: Vec<TechRestriction>,
    pub scenario: ScenarioProperties,
    pub validation: Validation,
    pub triggers: RawTriggers,
}

impl ChkData {
    /// Decodes every used section.
    ///
    /// Sections are independent except for two ordering edges: the string
    /// table is needed by everything holding string indices, and the player
    /// table by everything holding owner indices. Those two decode first;
    /// the rest could in principle run in any order.
    pub fn decode(sections: &SectionMap) -> Result<ChkData, ChkError> {
        let strings = StringTable::decode(sections.require(tag::STRX)?, false)?;
        let (players, forces) = players::decode(sections)?;
        Self::decode_with(sections, strings, players, forces)
    }

    /// `decode`, but with lossy handling of undecodable string bytes.
    pub fn decode_lossy_strings(sections: &SectionMap) -> Result<ChkData, ChkError> {
        let strings = StringTable::decode(sections.require(tag::STRX)?, true)?;
        let (players, forces) = players::decode(sections)?;
        Self::decode_with(sections, strings, players, forces)
    }

    fn decode_with(
        sections: &SectionMap,
        strings: StringTable,
        players: [Player; PLAYER_COUNT],
        forces: [Force; FORCE_COUNT],
    ) -> Result<ChkData, ChkError> {
        for force in forces.iter() {
            strings.resolve(tag::FORC, force.name)?;
        }
        let terrain = Terrain::decode(sections)?;
        let locations = Locations::decode(sections.require(tag::MRGN)?, &strings)?;
        let unit_settings =
            units::decode_unit_settings(sections.require(tag::UNIX)?, &strings)?;
        let placements = units::decode_placements(sections.require(tag::UNIT)?, &players)?;
        let sprite_placements =
            sprites::decode_placements(sections.require(tag::THG2)?, &players)?;
        let unit_properties = units::decode_properties(sections.require(tag::UPRP)?)?;
        let unit_restrictions = units::decode_restrictions(sections.require(tag::PUNI)?)?;
        let upgrade_settings = tech::decode_upgrade_settings(sections.require(tag::UPGX)?)?;
        let tech_settings = tech::decode_tech_settings(sections.require(tag::TECX)?)?;
        let upgrade_restrictions =
            tech::decode_upgrade_restrictions(sections.require(tag::PUPX)?)?;
        let tech_restrictions = tech::decode_tech_restrictions(sections.require(tag::PTEX)?)?;
        let scenario = ScenarioProperties::decode(sections.require(tag::SPRP)?, &strings)?;
        let validation = Validation::decode(sections)?;
        let triggers = RawTriggers::decode(sections)?;
        Ok(ChkData {
            terrain,
            players,
            forces,
            strings,
            locations,
            unit_settings,
            placements,
            sprite_placements,
            unit_properties,
            unit_restrictions,
            upgrade_settings,
            tech_settings,
            upgrade_restrictions,
            tech_restrictions,
            scenario,
            validation,
            triggers,
        })
    }

    /// Encodes back to sections, in the order the build pipeline writes
    /// them out.
    pub fn encode(&self) -> Result<SectionList, ChkError> {
        let mut out = SectionList::with_capacity(24);
        out.push((tag::VER, self.validation.version.clone()));
        out.push((tag::VCOD, self.validation.code.clone()));
        out.push((tag::OWNR, players::encode_ownr(&self.players)));
        out.push((tag::SIDE, players::encode_side(&self.players)));
        out.push((tag::COLR, players::encode_colr(&self.players)));
        out.push((tag::ERA, self.terrain.encode_era()));
        out.push((tag::DIM, self.terrain.encode_dim()));
        out.push((tag::MTXM, self.terrain.encode_mtxm()?));
        out.push((tag::UNIT, units::encode_placements(&self.placements)));
        out.push((tag::PUNI, units::encode_restrictions(&self.unit_restrictions)?));
        out.push((tag::UNIX, units::encode_unit_settings(&self.unit_settings)?));
        out.push((
            tag::PUPX,
            tech::encode_upgrade_restrictions(&self.upgrade_restrictions)?,
        ));
        out.push((tag::UPGX, tech::encode_upgrade_settings(&self.upgrade_settings)?));
        out.push((tag::THG2, sprites::encode_placements(&self.sprite_placements)));
        out.push((tag::MASK, self.terrain.encode_mask()?));
        out.push((tag::MRGN, self.locations.encode()));
        out.push((tag::STRX, self.strings.encode()));
        out.push((tag::SPRP, self.scenario.encode()));
        out.push((tag::FORC, players::encode_forc(&self.players, &self.forces)));
        out.push((tag::PTEX, tech::encode_tech_restrictions(&self.tech_restrictions)?));
        out.push((tag::TECX, tech::encode_tech_settings(&self.tech_settings)?));
        out.push((tag::MBRF, self.triggers.briefing.clone()));
        out.push((tag::TRIG, self.triggers.triggers.clone()));
        out.push((tag::UPRP, units::encode_properties(&self.unit_properties)));
        debug!("Encoded {} sections", out.len());
        Ok(out)
    }
}
