use std::fs;
use std::path::Path;

use anyhow::Context;
use byteorder::{ByteOrder, LittleEndian};

use crate::error::DatError;

pub const UNIT_ENTRIES: usize = 228;
pub const WEAPON_ENTRIES: usize = 130;
pub const FLINGY_ENTRIES: usize = 209;
pub const SPRITE_ENTRIES: usize = 517;
pub const ORDER_ENTRIES: usize = 180;
pub const PORTRAIT_ENTRIES: usize = 220;
pub const TECH_ENTRIES: usize = 44;
pub const UPGRADE_ENTRIES: usize = 61;

/// Columnar table walker: the file is a concatenation of one array per
/// field, so each read advances a running offset by `entries * width`.
struct Reader<'a> {
    kind: &'static str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(kind: &'static str, data: &'a [u8]) -> Reader<'a> {
        Reader { kind, data, pos: 0 }
    }

    fn take(&mut self, bytes: usize) -> Result<&'a [u8], DatError> {
        let end = self.pos + bytes;
        if end > self.data.len() {
            return Err(DatError::Truncated {
                kind: self.kind,
                needed: end,
                len: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array_u8(&mut self, entries: usize) -> Result<Vec<u8>, DatError> {
        Ok(self.take(entries)?.to_vec())
    }

    fn array_u16(&mut self, entries: usize) -> Result<Vec<u16>, DatError> {
        let slice = self.take(entries * 2)?;
        Ok(slice.chunks_exact(2).map(LittleEndian::read_u16).collect())
    }

    fn array_u32(&mut self, entries: usize) -> Result<Vec<u32>, DatError> {
        let slice = self.take(entries * 4)?;
        Ok(slice.chunks_exact(4).map(LittleEndian::read_u32).collect())
    }

    fn skip(&mut self, entries: usize, width: usize) -> Result<(), DatError> {
        self.take(entries * width)?;
        Ok(())
    }

    /// Tables are exactly their field sum; trailing bytes mean the layout
    /// assumption is wrong, which is as fatal as a short read.
    fn finish(self) -> Result<(), DatError> {
        if self.pos != self.data.len() {
            return Err(DatError::Size {
                kind: self.kind,
                expected: self.pos,
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

/// Value of a column that only exists for entries 0-105.
fn low_half<T: Copy>(values: &[T], i: usize) -> Option<T> {
    values.get(i).copied()
}

/// Value of a column that only exists for entries 106-201.
fn high_half<T: Copy>(values: &[T], i: usize) -> Option<T> {
    values.get(i.checked_sub(106)?).copied()
}

/// units.dat record. Fields that exist only for a sub-range of ids are
/// `None` outside it; 0 in such a field is a real value, not absence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitData {
    pub graphics: u8,
    pub subunit1: u16,
    pub subunit2: u16,
    /// Ids 106-201 only.
    pub infestation: Option<u16>,
    pub construction_animation: u32,
    pub unit_direction: u8,
    pub shield_enable: bool,
    pub shield_amount: u16,
    pub hit_points: u32,
    pub elevation_level: u8,
    pub movement_flags: u8,
    pub rank: u8,
    pub ai_computer_idle: u8,
    pub ai_human_idle: u8,
    pub ai_return_to_idle: u8,
    pub ai_attack_unit: u8,
    pub ai_attack_move: u8,
    pub ground_weapon: u8,
    pub max_ground_hits: u8,
    pub air_weapon: u8,
    pub max_air_hits: u8,
    pub ai_internal: u8,
    pub flags: u32,
    pub target_acquisition_range: u8,
    pub sight_range: u8,
    pub armor_upgrade: u8,
    pub unit_size: u8,
    pub armor: u8,
    pub right_click_action: u8,
    /// Ids 0-105 only.
    pub ready_sound: Option<u16>,
    pub what_sound_start: u16,
    pub what_sound_end: u16,
    /// Ids 0-105 only.
    pub annoyed_sound_start: Option<u16>,
    /// Ids 0-105 only.
    pub annoyed_sound_end: Option<u16>,
    /// Ids 0-105 only.
    pub yes_sound_start: Option<u16>,
    /// Ids 0-105 only.
    pub yes_sound_end: Option<u16>,
    pub placement_box: (u16, u16),
    /// Ids 106-201 only.
    pub addon_horizontal: Option<u16>,
    /// Ids 106-201 only.
    pub addon_vertical: Option<u16>,
    pub dimension_box: (u16, u16, u16, u16),
    pub portrait: u16,
    pub mineral_cost: u16,
    pub gas_cost: u16,
    pub build_time: u16,
    pub requirement_index: u16,
    pub group_flags: u8,
    pub supply_provided: u8,
    pub supply_required: u8,
    pub space_required: u8,
    pub space_provided: u8,
    pub build_score: u16,
    pub destroy_score: u16,
    pub map_string: u16,
    pub broodwar: bool,
    pub availability_flags: u16,
}

pub fn read_units(data: &[u8]) -> Result<Vec<UnitData>, DatError> {
    let n = UNIT_ENTRIES;
    let mut r = Reader::new("units", data);
    let graphics = r.array_u8(n)?;
    let subunit1 = r.array_u16(n)?;
    let subunit2 = r.array_u16(n)?;
    let infestation = r.array_u16(96)?;
    let construction_animation = r.array_u32(n)?;
    let unit_direction = r.array_u8(n)?;
    let shield_enable = r.array_u8(n)?;
    let shield_amount = r.array_u16(n)?;
    let hit_points = r.array_u32(n)?;
    let elevation_level = r.array_u8(n)?;
    let movement_flags = r.array_u8(n)?;
    let rank = r.array_u8(n)?;
    let ai_computer_idle = r.array_u8(n)?;
    let ai_human_idle = r.array_u8(n)?;
    let ai_return_to_idle = r.array_u8(n)?;
    let ai_attack_unit = r.array_u8(n)?;
    let ai_attack_move = r.array_u8(n)?;
    let ground_weapon = r.array_u8(n)?;
    let max_ground_hits = r.array_u8(n)?;
    let air_weapon = r.array_u8(n)?;
    let max_air_hits = r.array_u8(n)?;
    let ai_internal = r.array_u8(n)?;
    let flags = r.array_u32(n)?;
    let target_acquisition_range = r.array_u8(n)?;
    let sight_range = r.array_u8(n)?;
    let armor_upgrade = r.array_u8(n)?;
    let unit_size = r.array_u8(n)?;
    let armor = r.array_u8(n)?;
    let right_click_action = r.array_u8(n)?;
    let ready_sound = r.array_u16(106)?;
    let what_sound_start = r.array_u16(n)?;
    let what_sound_end = r.array_u16(n)?;
    let annoyed_sound_start = r.array_u16(106)?;
    let annoyed_sound_end = r.array_u16(106)?;
    let yes_sound_start = r.array_u16(106)?;
    let yes_sound_end = r.array_u16(106)?;
    let placement_box = r.array_u16(n * 2)?;
    let addon_horizontal = r.array_u16(96)?;
    let addon_vertical = r.array_u16(96)?;
    let dimension_box = r.array_u16(n * 4)?;
    let portrait = r.array_u16(n)?;
    let mineral_cost = r.array_u16(n)?;
    let gas_cost = r.array_u16(n)?;
    let build_time = r.array_u16(n)?;
    let requirement_index = r.array_u16(n)?;
    let group_flags = r.array_u8(n)?;
    let supply_provided = r.array_u8(n)?;
    let supply_required = r.array_u8(n)?;
    let space_required = r.array_u8(n)?;
    let space_provided = r.array_u8(n)?;
    let build_score = r.array_u16(n)?;
    let destroy_score = r.array_u16(n)?;
    let map_string = r.array_u16(n)?;
    let broodwar = r.array_u8(n)?;
    let availability_flags = r.array_u16(n)?;
    r.finish()?;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(UnitData {
            graphics: graphics[i],
            subunit1: subunit1[i],
            subunit2: subunit2[i],
            infestation: high_half(&infestation, i),
            construction_animation: construction_animation[i],
            unit_direction: unit_direction[i],
            shield_enable: shield_enable[i] != 0,
            shield_amount: shield_amount[i],
            hit_points: hit_points[i],
            elevation_level: elevation_level[i],
            movement_flags: movement_flags[i],
            rank: rank[i],
            ai_computer_idle: ai_computer_idle[i],
            ai_human_idle: ai_human_idle[i],
            ai_return_to_idle: ai_return_to_idle[i],
            ai_attack_unit: ai_attack_unit[i],
            ai_attack_move: ai_attack_move[i],
            ground_weapon: ground_weapon[i],
            max_ground_hits: max_ground_hits[i],
            air_weapon: air_weapon[i],
            max_air_hits: max_air_hits[i],
            ai_internal: ai_internal[i],
            flags: flags[i],
            target_acquisition_range: target_acquisition_range[i],
            sight_range: sight_range[i],
            armor_upgrade: armor_upgrade[i],
            unit_size: unit_size[i],
            armor: armor[i],
            right_click_action: right_click_action[i],
            ready_sound: low_half(&ready_sound, i),
            what_sound_start: what_sound_start[i],
            what_sound_end: what_sound_end[i],
            annoyed_sound_start: low_half(&annoyed_sound_start, i),
            annoyed_sound_end: low_half(&annoyed_sound_end, i),
            yes_sound_start: low_half(&yes_sound_start, i),
            yes_sound_end: low_half(&yes_sound_end, i),
            placement_box: (placement_box[i * 2], placement_box[i * 2 + 1]),
            addon_horizontal: high_half(&addon_horizontal, i),
            addon_vertical: high_half(&addon_vertical, i),
            dimension_box: (
                dimension_box[i * 4],
                dimension_box[i * 4 + 1],
                dimension_box[i * 4 + 2],
                dimension_box[i * 4 + 3],
            ),
            portrait: portrait[i],
            mineral_cost: mineral_cost[i],
            gas_cost: gas_cost[i],
            build_time: build_time[i],
            requirement_index: requirement_index[i],
            group_flags: group_flags[i],
            supply_provided: supply_provided[i],
            supply_required: supply_required[i],
            space_required: space_required[i],
            space_provided: space_provided[i],
            build_score: build_score[i],
            destroy_score: destroy_score[i],
            map_string: map_string[i],
            broodwar: broodwar[i] != 0,
            availability_flags: availability_flags[i],
        });
    }
    debug!("units.dat: {} entries", out.len());
    Ok(out)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeaponData {
    pub label: u16,
    pub graphics: u32,
    pub unused: u8,
    pub target_flags: u16,
    pub min_range: u32,
    pub max_range: u32,
    pub damage_upgrade: u8,
    pub weapon_type: u8,
    pub weapon_behavior: u8,
    pub remove_after: u8,
    pub explosion_type: u8,
    pub inner_splash: u16,
    pub medium_splash: u16,
    pub outer_splash: u16,
    pub damage_amount: u16,
    pub damage_bonus: u16,
    pub cooldown: u8,
    pub damage_factor: u8,
    pub attack_angle: u8,
    pub launch_spin: u8,
    pub forward_offset: u8,
    pub upward_offset: u8,
    pub target_error_message: u16,
    pub icon: u16,
}

pub fn read_weapons(data: &[u8]) -> Result<Vec<WeaponData>, DatError> {
    let n = WEAPON_ENTRIES;
    let mut r = Reader::new("weapons", data);
    let label = r.array_u16(n)?;
    let graphics = r.array_u32(n)?;
    let unused = r.array_u8(n)?;
    let target_flags = r.array_u16(n)?;
    let min_range = r.array_u32(n)?;
    let max_range = r.array_u32(n)?;
    let damage_upgrade = r.array_u8(n)?;
    let weapon_type = r.array_u8(n)?;
    let weapon_behavior = r.array_u8(n)?;
    let remove_after = r.array_u8(n)?;
    let explosion_type = r.array_u8(n)?;
    let inner_splash = r.array_u16(n)?;
    let medium_splash = r.array_u16(n)?;
    let outer_splash = r.array_u16(n)?;
    let damage_amount = r.array_u16(n)?;
    let damage_bonus = r.array_u16(n)?;
    let cooldown = r.array_u8(n)?;
    let damage_factor = r.array_u8(n)?;
    let attack_angle = r.array_u8(n)?;
    let launch_spin = r.array_u8(n)?;
    let forward_offset = r.array_u8(n)?;
    let upward_offset = r.array_u8(n)?;
    let target_error_message = r.array_u16(n)?;
    let icon = r.array_u16(n)?;
    r.finish()?;

    let out = (0..n)
        .map(|i| WeaponData {
            label: label[i],
            graphics: graphics[i],
            unused: unused[i],
            target_flags: target_flags[i],
            min_range: min_range[i],
            max_range: max_range[i],
            damage_upgrade: damage_upgrade[i],
            weapon_type: weapon_type[i],
            weapon_behavior: weapon_behavior[i],
            remove_after: remove_after[i],
            explosion_type: explosion_type[i],
            inner_splash: inner_splash[i],
            medium_splash: medium_splash[i],
            outer_splash: outer_splash[i],
            damage_amount: damage_amount[i],
            damage_bonus: damage_bonus[i],
            cooldown: cooldown[i],
            damage_factor: damage_factor[i],
            attack_angle: attack_angle[i],
            launch_spin: launch_spin[i],
            forward_offset: forward_offset[i],
            upward_offset: upward_offset[i],
            target_error_message: target_error_message[i],
            icon: icon[i],
        })
        .collect();
    Ok(out)
}

/// sprites.dat record. Health bar and selection circle columns exist only
/// for ids 130-516.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpriteData {
    pub image: u16,
    pub health_bar: Option<u8>,
    pub unused: u8,
    pub visible: bool,
    pub selection_circle: Option<u8>,
    pub selection_circle_offset: Option<u8>,
}

pub fn read_sprites(data: &[u8]) -> Result<Vec<SpriteData>, DatError> {
    let n = SPRITE_ENTRIES;
    let selectable = n - 130;
    let mut r = Reader::new("sprites", data);
    let image = r.array_u16(n)?;
    let health_bar = r.array_u8(selectable)?;
    let unused = r.array_u8(n)?;
    let visible = r.array_u8(n)?;
    let selection_circle = r.array_u8(selectable)?;
    let selection_circle_offset = r.array_u8(selectable)?;
    r.finish()?;

    let half = |values: &[u8], i: usize| i.checked_sub(130).and_then(|x| values.get(x)).copied();
    let out = (0..n)
        .map(|i| SpriteData {
            image: image[i],
            health_bar: half(&health_bar, i),
            unused: unused[i],
            visible: visible[i] != 0,
            selection_circle: half(&selection_circle, i),
            selection_circle_offset: half(&selection_circle_offset, i),
        })
        .collect();
    Ok(out)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlingyData {
    pub sprite: u16,
    pub top_speed: u32,
    pub acceleration: u16,
    pub halt_distance: u32,
    pub turn_radius: u8,
    pub unused: u8,
    pub move_control: u8,
}

pub fn read_flingy(data: &[u8]) -> Result<Vec<FlingyData>, DatError> {
    let n = FLINGY_ENTRIES;
    let mut r = Reader::new("flingy", data);
    let sprite = r.array_u16(n)?;
    let top_speed = r.array_u32(n)?;
    let acceleration = r.array_u16(n)?;
    let halt_distance = r.array_u32(n)?;
    let turn_radius = r.array_u8(n)?;
    let unused = r.array_u8(n)?;
    let move_control = r.array_u8(n)?;
    r.finish()?;

    let out = (0..n)
        .map(|i| FlingyData {
            sprite: sprite[i],
            top_speed: top_speed[i],
            acceleration: acceleration[i],
            halt_distance: halt_distance[i],
            turn_radius: turn_radius[i],
            unused: unused[i],
            move_control: move_control[i],
        })
        .collect();
    Ok(out)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderData {
    pub label: u16,
    pub use_weapon_targeting: bool,
    pub can_be_interrupted: bool,
    pub can_be_queued: bool,
    pub targeting: u8,
    pub energy: u8,
    pub animation: u8,
    pub highlight: u16,
    pub obscured_order: u8,
}

pub fn read_orders(data: &[u8]) -> Result<Vec<OrderData>, DatError> {
    let n = ORDER_ENTRIES;
    let mut r = Reader::new("orders", data);
    let label = r.array_u16(n)?;
    let use_weapon_targeting = r.array_u8(n)?;
    // Internal AI columns nobody reads; still part of the layout.
    r.skip(n, 1)?;
    r.skip(n, 1)?;
    r.skip(n, 1)?;
    r.skip(n, 1)?;
    let can_be_interrupted = r.array_u8(n)?;
    r.skip(n, 1)?;
    let can_be_queued = r.array_u8(n)?;
    r.skip(n, 1)?;
    r.skip(n, 1)?;
    r.skip(n, 1)?;
    r.skip(n, 1)?;
    let targeting = r.array_u8(n)?;
    let energy = r.array_u8(n)?;
    let animation = r.array_u8(n)?;
    let highlight = r.array_u16(n)?;
    r.skip(n, 2)?;
    let obscured_order = r.array_u8(n)?;
    r.finish()?;

    let out = (0..n)
        .map(|i| OrderData {
            label: label[i],
            use_weapon_targeting: use_weapon_targeting[i] != 0,
            can_be_interrupted: can_be_interrupted[i] != 0,
            can_be_queued: can_be_queued[i] != 0,
            targeting: targeting[i],
            energy: energy[i],
            animation: animation[i],
            highlight: highlight[i],
            obscured_order: obscured_order[i],
        })
        .collect();
    Ok(out)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PortraitData {
    pub portrait_file: u32,
    pub smk_change: u8,
    pub unknown: u8,
}

pub fn read_portraits(data: &[u8]) -> Result<Vec<PortraitData>, DatError> {
    let n = PORTRAIT_ENTRIES;
    let mut r = Reader::new("portdata", data);
    let portrait_file = r.array_u32(n)?;
    let smk_change = r.array_u8(n)?;
    let unknown = r.array_u8(n)?;
    r.finish()?;

    let out = (0..n)
        .map(|i| PortraitData {
            portrait_file: portrait_file[i],
            smk_change: smk_change[i],
            unknown: unknown[i],
        })
        .collect();
    Ok(out)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TechData {
    pub mineral_cost: u16,
    pub gas_cost: u16,
    pub research_time: u16,
    pub energy_cost: u16,
    pub research_requirements: u32,
    pub icon: u16,
    pub label: u16,
    pub race: u8,
    pub unused: u8,
    pub broodwar: bool,
}

pub fn read_techdata(data: &[u8]) -> Result<Vec<TechData>, DatError> {
    let n = TECH_ENTRIES;
    let mut r = Reader::new("techdata", data);
    let mineral_cost = r.array_u16(n)?;
    let gas_cost = r.array_u16(n)?;
    let research_time = r.array_u16(n)?;
    let energy_cost = r.array_u16(n)?;
    let research_requirements = r.array_u32(n)?;
    let icon = r.array_u16(n)?;
    let label = r.array_u16(n)?;
    let race = r.array_u8(n)?;
    let unused = r.array_u8(n)?;
    let broodwar = r.array_u8(n)?;
    r.finish()?;

    let out = (0..n)
        .map(|i| TechData {
            mineral_cost: mineral_cost[i],
            gas_cost: gas_cost[i],
            research_time: research_time[i],
            energy_cost: energy_cost[i],
            research_requirements: research_requirements[i],
            icon: icon[i],
            label: label[i],
            race: race[i],
            unused: unused[i],
            broodwar: broodwar[i] != 0,
        })
        .collect();
    Ok(out)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpgradeData {
    pub mineral_base: u16,
    pub mineral_factor: u16,
    pub gas_base: u16,
    pub gas_factor: u16,
    pub time_base: u16,
    pub time_factor: u16,
    pub requirement_index: u16,
    pub icon: u16,
    pub label: u16,
    pub race: u8,
    pub max_repeats: u8,
    pub broodwar: bool,
}

pub fn read_upgrades(data: &[u8]) -> Result<Vec<UpgradeData>, DatError> {
    let n = UPGRADE_ENTRIES;
    let mut r = Reader::new("upgrades", data);
    let mineral_base = r.array_u16(n)?;
    let mineral_factor = r.array_u16(n)?;
    let gas_base = r.array_u16(n)?;
    let gas_factor = r.array_u16(n)?;
    let time_base = r.array_u16(n)?;
    let time_factor = r.array_u16(n)?;
    let requirement_index = r.array_u16(n)?;
    let icon = r.array_u16(n)?;
    let label = r.array_u16(n)?;
    let race = r.array_u8(n)?;
    let max_repeats = r.array_u8(n)?;
    let broodwar = r.array_u8(n)?;
    r.finish()?;

    let out = (0..n)
        .map(|i| UpgradeData {
            mineral_base: mineral_base[i],
            mineral_factor: mineral_factor[i],
            gas_base: gas_base[i],
            gas_factor: gas_factor[i],
            time_base: time_base[i],
            time_factor: time_factor[i],
            requirement_index: requirement_index[i],
            icon: icon[i],
            label: label[i],
            race: race[i],
            max_repeats: max_repeats[i],
            broodwar: broodwar[i] != 0,
        })
        .collect();
    Ok(out)
}

/// Every static definition table, read once at startup and shared
/// read-only from then on; map decoding never mutates these.
pub struct StaticTables {
    pub units: Vec<UnitData>,
    pub weapons: Vec<WeaponData>,
    pub flingy: Vec<FlingyData>,
    pub sprites: Vec<SpriteData>,
    pub orders: Vec<OrderData>,
    pub portraits: Vec<PortraitData>,
    pub techdata: Vec<TechData>,
    pub upgrades: Vec<UpgradeData>,
}

impl StaticTables {
    /// Reads `units.dat` and friends from a directory (usually an
    /// extracted `arr\` tree).
    pub fn load(dir: &Path) -> Result<StaticTables, anyhow::Error> {
        fn read(dir: &Path, file: &str) -> Result<Vec<u8>, anyhow::Error> {
            let path = dir.join(file);
            fs::read(&path).with_context(|| format!("Couldn't read {}", path.display()))
        }
        let tables = StaticTables {
            units: read_units(&read(dir, "units.dat")?)?,
            weapons: read_weapons(&read(dir, "weapons.dat")?)?,
            flingy: read_flingy(&read(dir, "flingy.dat")?)?,
            sprites: read_sprites(&read(dir, "sprites.dat")?)?,
            orders: read_orders(&read(dir, "orders.dat")?)?,
            portraits: read_portraits(&read(dir, "portdata.dat")?)?,
            techdata: read_techdata(&read(dir, "techdata.dat")?)?,
            upgrades: read_upgrades(&read(dir, "upgrades.dat")?)?,
        };
        info!("Static tables loaded from {}", dir.display());
        Ok(tables)
    }
}
