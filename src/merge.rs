use crate::chk::ChkData;
use crate::dat::{SpriteData, StaticTables, UnitData, WeaponData};
use crate::error::ChkError;
use crate::locations::Locations;
use crate::names;
use crate::players::{Force, Player, FORCE_COUNT, PLAYER_COUNT};
use crate::scenario::{RawTriggers, ScenarioProperties, Validation};
use crate::sections::tag;
use crate::sprites::{SpritePlacement, SPRITE_KIND_COUNT};
use crate::strings::{StrIndex, StringTable};
use crate::tech::{
    Cost, TechCost, TechRestriction, TechSetting, UpgradeRestriction, UpgradeSetting,
    UpgradeSettings,
};
use crate::terrain::Terrain;
use crate::units::{
    UnitPlacement, UnitPropertySlot, UnitRestriction, UnitSettingEntry, UnitSettings,
    WeaponSettingEntry, UNIT_KIND_COUNT, WEAPON_KIND_COUNT,
};

/// Default energy maximum; placements store energy as a percentage and the
/// per-map settings carry no energy maximum to scale by.
pub const DEFAULT_ENERGY_MAX: u32 = 200;

/// Current/maximum pair. The format stores current values as 0-100
/// percentages of the maximum.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Vital {
    pub max: u32,
    pub current: u32,
}

impl Vital {
    pub fn full(max: u32) -> Vital {
        Vital { max, current: max }
    }

    pub fn from_percent(max: u32, percent: u8) -> Vital {
        Vital {
            max,
            current: (max as u64 * percent as u64 / 100) as u32,
        }
    }

    /// 100 when the maximum is 0, by convention, so a zero-max unit
    /// round-trips without dividing by zero.
    pub fn percent(&self) -> u8 {
        if self.max == 0 {
            100
        } else {
            (self.current as u64 * 100 / self.max as u64) as u8
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub required: u8,
    pub provided: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub amount: u16,
    pub bonus: u16,
    pub factor: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub behavior: u8,
    pub remove_after: u8,
    pub attack_angle: u8,
    pub launch_spin: u8,
    pub x_offset: u8,
    pub y_offset: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Splash {
    pub inner: u16,
    pub medium: u16,
    pub outer: u16,
}

/// Static weapon specification with the per-map damage overrides merged in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: u16,
    pub name: String,
    pub damage: Damage,
    pub bullet: Bullet,
    pub splash: Splash,
    pub cooldown: u8,
    pub upgrade: u8,
    pub weapon_type: u8,
    pub explosion_type: u8,
    pub target_flags: u16,
    pub error_message: u16,
    pub icon: u16,
    pub graphics: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub hit_points: Vital,
    pub shield_enable: bool,
    pub shield_points: Vital,
    pub energy_points: Vital,
    pub armor: u8,
    pub armor_upgrade: u8,
    pub rank: u8,
    pub elevation_level: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitAi {
    pub computer_idle: u8,
    pub human_idle: u8,
    pub return_to_idle: u8,
    pub attack_unit: u8,
    pub attack_move: u8,
    pub internal: u8,
    pub right_click: u8,
}

/// Sound references; the ranged ones only exist for unit ids 0-105.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitSounds {
    pub ready: Option<u16>,
    pub what_start: u16,
    pub what_end: u16,
    pub annoyed_start: Option<u16>,
    pub annoyed_end: Option<u16>,
    pub yes_start: Option<u16>,
    pub yes_end: Option<u16>,
}

/// Spatial data; the addon slot offset only exists for unit ids 106-201.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitSize {
    pub size_type: u8,
    pub placement_box: Size,
    pub bounds: Bounds,
    pub addon_position: Option<Position>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    pub cost: Cost,
    pub build_score: u16,
    pub destroy_score: u16,
    pub broodwar: bool,
    pub supply: Exchange,
    pub space: Exchange,
}

/// Weapon loadout, embedded by value so the model is self-contained.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitArsenal {
    pub ground_weapon: Option<WeaponDefinition>,
    pub max_ground_hits: u8,
    pub air_weapon: Option<WeaponDefinition>,
    pub max_air_hits: u8,
    pub target_acquisition_range: u8,
    pub sight_range: u8,
    pub ability_flags: u32,
}

/// Full unit specification: static table baseline with the per-map
/// overrides (stats, costs, name) merged over it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: u16,
    pub name: String,
    /// Raw name override index; `NONE` means the default name table entry.
    pub name_string: StrIndex,
    pub use_default: bool,
    pub graphics: u8,
    pub subunit1: u16,
    pub subunit2: u16,
    /// Ids 106-201 only.
    pub infestation: Option<u16>,
    pub construction_animation: u32,
    pub unit_direction: u8,
    pub portrait: u16,
    pub stats: UnitStats,
    pub ai: UnitAi,
    pub sounds: UnitSounds,
    pub size: UnitSize,
    pub cost: UnitCost,
    pub arsenal: UnitArsenal,
}

/// sprites.dat specification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpriteDefinition {
    pub id: u16,
    pub image: u16,
    pub health_bar: Option<u8>,
    pub visible: bool,
    pub selection_circle: Option<u8>,
    pub selection_circle_offset: Option<u8>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub id: u16,
    pub name: String,
    pub use_default: bool,
    pub cost: TechCost,
    pub energy_required: bool,
    pub icon: u16,
    pub label: u16,
    pub race: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: u16,
    pub name: String,
    pub use_default: bool,
    pub base_cost: Cost,
    pub factor_cost: Cost,
    pub icon: u16,
    pub label: u16,
    pub race: u8,
    pub max_repeats: u8,
}

/// A unit on the map: its own copy of the definition plus instance state.
///
/// The copy is deliberate; two placements of the same kind must never
/// alias, or editing one would edit the other.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacedUnit {
    pub definition: UnitDefinition,
    /// `None` for start location markers.
    pub serial: Option<u32>,
    pub position: Position,
    pub owner: u8,
    pub relation_flags: u16,
    pub special_flags: u16,
    pub valid_flags: u16,
    pub state_flags: u16,
    pub resource_amount: u32,
    pub hangar_count: u16,
    pub related_unit: u32,
    unused: u32,
}

impl PlacedUnit {
    /// Binds a fresh placement to a copy of `definition` with full vitals.
    pub fn new(definition: UnitDefinition, position: Position, owner: u8) -> PlacedUnit {
        let serial = if definition.id == crate::units::START_LOCATION {
            None
        } else {
            Some(0)
        };
        PlacedUnit {
            definition,
            serial,
            position,
            owner,
            relation_flags: 0,
            special_flags: 0,
            valid_flags: 0,
            state_flags: 0,
            resource_amount: 0,
            hangar_count: 0,
            related_unit: 0,
            unused: 0,
        }
    }

    pub fn kind(&self) -> u16 {
        self.definition.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacedSprite {
    pub definition: SpriteDefinition,
    pub position: Position,
    pub owner: u8,
    pub flags: u16,
    unused: u8,
}

impl PlacedSprite {
    pub fn new(definition: SpriteDefinition, position: Position, owner: u8) -> PlacedSprite {
        PlacedSprite {
            definition,
            position,
            owner,
            flags: 0,
            unused: 0,
        }
    }

    pub fn kind(&self) -> u16 {
        self.definition.id
    }
}

/// The unified, editor-facing map model.
#[derive(Clone, Serialize, Deserialize)]
pub struct Map {
    pub terrain: Terrain,
    pub players: [Player; PLAYER_COUNT],
    pub forces: [Force; FORCE_COUNT],
    pub strings: StringTable,
    pub locations: Locations,
    pub unit_definitions: Vec<UnitDefinition>,
    pub weapon_definitions: Vec<WeaponDefinition>,
    pub sprite_definitions: Vec<SpriteDefinition>,
    pub technologies: Vec<Technology>,
    pub upgrades: Vec<Upgrade>,
    pub unit_restrictions: Vec<UnitRestriction>,
    pub upgrade_restrictions: Vec<UpgradeRestriction>,
    pub tech_restrictions: Vec<TechRestriction>,
    pub units: Vec<PlacedUnit>,
    pub sprites: Vec<PlacedSprite>,
    pub unit_properties: Vec<UnitPropertySlot>,
    pub scenario: ScenarioProperties,
    pub validation: Validation,
    pub triggers: RawTriggers,
    upgrade_settings_pad: u8,
}

fn merge_weapon(id: usize, data: &WeaponData, setting: &WeaponSettingEntry) -> WeaponDefinition {
    WeaponDefinition {
        id: id as u16,
        name: names::weapon_name(id as u16).unwrap_or("").into(),
        damage: Damage {
            amount: setting.damage,
            bonus: setting.bonus,
            factor: data.damage_factor,
        },
        bullet: Bullet {
            behavior: data.weapon_behavior,
            remove_after: data.remove_after,
            attack_angle: data.attack_angle,
            launch_spin: data.launch_spin,
            x_offset: data.forward_offset,
            y_offset: data.upward_offset,
        },
        splash: Splash {
            inner: data.inner_splash,
            medium: data.medium_splash,
            outer: data.outer_splash,
        },
        cooldown: data.cooldown,
        upgrade: data.damage_upgrade,
        weapon_type: data.weapon_type,
        explosion_type: data.explosion_type,
        target_flags: data.target_flags,
        error_message: data.target_error_message,
        icon: data.icon,
        graphics: data.graphics,
    }
}

fn merge_unit(
    id: usize,
    data: &UnitData,
    setting: &UnitSettingEntry,
    name: String,
    weapons: &[WeaponDefinition],
) -> UnitDefinition {
    let weapon = |id: u8| weapons.get(id as usize).cloned();
    UnitDefinition {
        id: id as u16,
        name,
        name_string: setting.name,
        use_default: setting.use_default,
        graphics: data.graphics,
        subunit1: data.subunit1,
        subunit2: data.subunit2,
        infestation: data.infestation,
        construction_animation: data.construction_animation,
        unit_direction: data.unit_direction,
        portrait: data.portrait,
        stats: UnitStats {
            hit_points: Vital::full(setting.hit_points),
            shield_enable: data.shield_enable,
            shield_points: Vital::full(setting.shield_points as u32),
            energy_points: Vital::full(DEFAULT_ENERGY_MAX),
            armor: setting.armor,
            armor_upgrade: data.armor_upgrade,
            rank: data.rank,
            elevation_level: data.elevation_level,
        },
        ai: UnitAi {
            computer_idle: data.ai_computer_idle,
            human_idle: data.ai_human_idle,
            return_to_idle: data.ai_return_to_idle,
            attack_unit: data.ai_attack_unit,
            attack_move: data.ai_attack_move,
            internal: data.ai_internal,
            right_click: data.right_click_action,
        },
        sounds: UnitSounds {
            ready: data.ready_sound,
            what_start: data.what_sound_start,
            what_end: data.what_sound_end,
            annoyed_start: data.annoyed_sound_start,
            annoyed_end: data.annoyed_sound_end,
            yes_start: data.yes_sound_start,
            yes_end: data.yes_sound_end,
        },
        size: UnitSize {
            size_type: data.unit_size,
            placement_box: Size {
                width: data.placement_box.0,
                height: data.placement_box.1,
            },
            bounds: Bounds {
                left: data.dimension_box.0,
                top: data.dimension_box.1,
                right: data.dimension_box.2,
                bottom: data.dimension_box.3,
            },
            addon_position: match (data.addon_horizontal, data.addon_vertical) {
                (Some(x), Some(y)) => Some(Position { x, y }),
                _ => None,
            },
        },
        cost: UnitCost {
            cost: Cost {
                minerals: setting.mineral_cost,
                gas: setting.gas_cost,
                time: setting.build_time,
            },
            build_score: data.build_score,
            destroy_score: data.destroy_score,
            broodwar: data.broodwar,
            supply: Exchange {
                required: data.supply_required,
                provided: data.supply_provided,
            },
            space: Exchange {
                required: data.space_required,
                provided: data.space_provided,
            },
        },
        arsenal: UnitArsenal {
            ground_weapon: weapon(data.ground_weapon),
            max_ground_hits: data.max_ground_hits,
            air_weapon: weapon(data.air_weapon),
            max_air_hits: data.max_air_hits,
            target_acquisition_range: data.target_acquisition_range,
            sight_range: data.sight_range,
            ability_flags: data.flags,
        },
    }
}

fn sprite_definition(id: usize, data: &SpriteData) -> SpriteDefinition {
    SpriteDefinition {
        id: id as u16,
        image: data.image,
        health_bar: data.health_bar,
        visible: data.visible,
        selection_circle: data.selection_circle,
        selection_circle_offset: data.selection_circle_offset,
    }
}

/// Builds the unified model from decoded sections and the static tables.
pub fn build(chk: &ChkData, tables: &StaticTables) -> Result<Map, ChkError> {
    let weapon_definitions = tables
        .weapons
        .iter()
        .zip(chk.unit_settings.weapons.iter())
        .enumerate()
        .map(|(id, (data, setting))| merge_weapon(id, data, setting))
        .collect::<Vec<_>>();

    let mut unit_definitions = Vec::with_capacity(UNIT_KIND_COUNT);
    for (id, (data, setting)) in tables
        .units
        .iter()
        .zip(chk.unit_settings.units.iter())
        .enumerate()
    {
        let name = match chk.strings.get(setting.name) {
            Some(s) if !setting.use_default => s.into(),
            _ => names::unit_name(id as u16).unwrap_or("").into(),
        };
        unit_definitions.push(merge_unit(id, data, setting, name, &weapon_definitions));
    }

    let sprite_definitions = tables
        .sprites
        .iter()
        .enumerate()
        .map(|(id, data)| sprite_definition(id, data))
        .collect::<Vec<_>>();

    let technologies = tables
        .techdata
        .iter()
        .zip(chk.tech_settings.iter())
        .enumerate()
        .map(|(id, (data, setting))| Technology {
            id: id as u16,
            name: names::tech_name(id as u16).unwrap_or("").into(),
            use_default: setting.use_default,
            cost: setting.cost,
            energy_required: data.energy_cost != 0,
            icon: data.icon,
            label: data.label,
            race: data.race,
        })
        .collect::<Vec<_>>();

    let upgrades = tables
        .upgrades
        .iter()
        .zip(chk.upgrade_settings.upgrades.iter())
        .enumerate()
        .map(|(id, (data, setting))| Upgrade {
            id: id as u16,
            name: names::upgrade_name(id as u16).unwrap_or("").into(),
            use_default: setting.use_default,
            base_cost: setting.base,
            factor_cost: setting.factor,
            icon: data.icon,
            label: data.label,
            race: data.race,
            max_repeats: data.max_repeats,
        })
        .collect::<Vec<_>>();

    let mut units = Vec::with_capacity(chk.placements.len());
    for placement in chk.placements.iter() {
        // Resolved against the merged definition array, then copied, so
        // instance edits never touch the shared template.
        let definition =
            unit_definitions
                .get(placement.unit_id as usize)
                .ok_or(ChkError::BadReference {
                    tag: tag::UNIT,
                    table: "unit kind",
                    index: placement.unit_id as u32,
                    limit: UNIT_KIND_COUNT as u32,
                })?;
        let mut definition = definition.clone();
        let stats = &mut definition.stats;
        stats.hit_points = Vital::from_percent(stats.hit_points.max, placement.hp_percent);
        stats.shield_points = Vital::from_percent(stats.shield_points.max, placement.shield_percent);
        stats.energy_points = Vital::from_percent(stats.energy_points.max, placement.energy_percent);
        units.push(PlacedUnit {
            definition,
            serial: placement.serial,
            position: Position {
                x: placement.x,
                y: placement.y,
            },
            owner: placement.owner,
            relation_flags: placement.relation_flags,
            special_flags: placement.special_flags,
            valid_flags: placement.valid_flags,
            state_flags: placement.state_flags,
            resource_amount: placement.resource_amount,
            hangar_count: placement.hangar_count,
            related_unit: placement.related_unit,
            unused: placement.unused,
        });
    }

    let mut sprites = Vec::with_capacity(chk.sprite_placements.len());
    for placement in chk.sprite_placements.iter() {
        let definition =
            sprite_definitions
                .get(placement.sprite_id as usize)
                .ok_or(ChkError::BadReference {
                    tag: tag::THG2,
                    table: "sprite kind",
                    index: placement.sprite_id as u32,
                    limit: SPRITE_KIND_COUNT as u32,
                })?;
        sprites.push(PlacedSprite {
            definition: definition.clone(),
            position: Position {
                x: placement.x,
                y: placement.y,
            },
            owner: placement.owner,
            flags: placement.flags,
            unused: placement.unused,
        });
    }

    debug!(
        "Merged model: {} units, {} sprites, {} locations",
        units.len(),
        sprites.len(),
        chk.locations.len(),
    );
    Ok(Map {
        terrain: chk.terrain.clone(),
        players: chk.players.clone(),
        forces: chk.forces.clone(),
        strings: chk.strings.clone(),
        locations: chk.locations.clone(),
        unit_definitions,
        weapon_definitions,
        sprite_definitions,
        technologies,
        upgrades,
        unit_restrictions: chk.unit_restrictions.clone(),
        upgrade_restrictions: chk.upgrade_restrictions.clone(),
        tech_restrictions: chk.tech_restrictions.clone(),
        units,
        sprites,
        unit_properties: chk.unit_properties.clone(),
        scenario: chk.scenario.clone(),
        validation: chk.validation.clone(),
        triggers: chk.triggers.clone(),
        upgrade_settings_pad: chk.upgrade_settings.pad,
    })
}

/// Flattens the unified model back into section-shaped data. Definition
/// edits end up in the override sections; the static tables are never
/// rewritten.
pub fn flatten(map: &Map) -> Result<ChkData, ChkError> {
    if map.unit_definitions.len() != UNIT_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::UNIX,
            what: "unit definition",
            expected: UNIT_KIND_COUNT,
            actual: map.unit_definitions.len(),
        });
    }
    if map.weapon_definitions.len() != WEAPON_KIND_COUNT {
        return Err(ChkError::Cardinality {
            tag: tag::UNIX,
            what: "weapon definition",
            expected: WEAPON_KIND_COUNT,
            actual: map.weapon_definitions.len(),
        });
    }
    let units = map
        .unit_definitions
        .iter()
        .map(|def| UnitSettingEntry {
            use_default: def.use_default,
            hit_points: def.stats.hit_points.max,
            shield_points: def.stats.shield_points.max as u16,
            armor: def.stats.armor,
            build_time: def.cost.cost.time,
            mineral_cost: def.cost.cost.minerals,
            gas_cost: def.cost.cost.gas,
            // Written back even for use-default rows; the decoder ignores
            // it there, and keeping it preserves the original bytes.
            name: def.name_string,
        })
        .collect();
    let weapons = map
        .weapon_definitions
        .iter()
        .map(|def| WeaponSettingEntry {
            damage: def.damage.amount,
            bonus: def.damage.bonus,
        })
        .collect();
    let unit_settings = UnitSettings { units, weapons };

    let tech_settings = map
        .technologies
        .iter()
        .map(|tech| TechSetting {
            use_default: tech.use_default,
            cost: tech.cost,
        })
        .collect();
    let upgrade_settings = UpgradeSettings {
        upgrades: map
            .upgrades
            .iter()
            .map(|upgrade| UpgradeSetting {
                use_default: upgrade.use_default,
                base: upgrade.base_cost,
                factor: upgrade.factor_cost,
            })
            .collect(),
        pad: map.upgrade_settings_pad,
    };

    let placements = map
        .units
        .iter()
        .map(|unit| UnitPlacement {
            serial: unit.serial,
            x: unit.position.x,
            y: unit.position.y,
            unit_id: unit.definition.id,
            relation_flags: unit.relation_flags,
            special_flags: unit.special_flags,
            valid_flags: unit.valid_flags,
            owner: unit.owner,
            hp_percent: unit.definition.stats.hit_points.percent(),
            shield_percent: unit.definition.stats.shield_points.percent(),
            energy_percent: unit.definition.stats.energy_points.percent(),
            resource_amount: unit.resource_amount,
            hangar_count: unit.hangar_count,
            state_flags: unit.state_flags,
            unused: unit.unused,
            related_unit: unit.related_unit,
        })
        .collect();

    let sprite_placements = map
        .sprites
        .iter()
        .map(|sprite| SpritePlacement {
            sprite_id: sprite.definition.id,
            x: sprite.position.x,
            y: sprite.position.y,
            owner: sprite.owner,
            unused: sprite.unused,
            flags: sprite.flags,
        })
        .collect();

    Ok(ChkData {
        terrain: map.terrain.clone(),
        players: map.players.clone(),
        forces: map.forces.clone(),
        strings: map.strings.clone(),
        locations: map.locations.clone(),
        unit_settings,
        placements,
        sprite_placements,
        unit_properties: map.unit_properties.clone(),
        unit_restrictions: map.unit_restrictions.clone(),
        upgrade_settings,
        tech_settings,
        upgrade_restrictions: map.upgrade_restrictions.clone(),
        tech_restrictions: map.tech_restrictions.clone(),
        scenario: map.scenario.clone(),
        validation: map.validation.clone(),
        triggers: map.triggers.clone(),
    })
}
