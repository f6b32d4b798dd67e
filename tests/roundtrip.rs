//! Full decode -> merge -> flatten -> encode round trip over a synthetic
//! scenario, plus the conversion laws the codec guarantees.

use byteorder::{ByteOrder, LittleEndian};

use scmap::chk::ChkData;
use scmap::dat::{self, StaticTables};
use scmap::merge;
use scmap::sections::{tag, SectionMap};
use scmap::strings::StrIndex;
use scmap::units::START_LOCATION;

fn push_u8s(out: &mut Vec<u8>, count: usize, value: impl Fn(usize) -> u8) {
    for i in 0..count {
        out.push(value(i));
    }
}

fn push_u16s(out: &mut Vec<u8>, count: usize, value: impl Fn(usize) -> u16) {
    for i in 0..count {
        out.extend_from_slice(&value(i).to_le_bytes());
    }
}

fn push_u32s(out: &mut Vec<u8>, count: usize, value: impl Fn(usize) -> u32) {
    for i in 0..count {
        out.extend_from_slice(&value(i).to_le_bytes());
    }
}

fn units_dat() -> Vec<u8> {
    let n = dat::UNIT_ENTRIES;
    let mut out = Vec::new();
    push_u8s(&mut out, n, |i| i as u8); // graphics
    push_u16s(&mut out, n, |i| i as u16); // subunit 1
    push_u16s(&mut out, n, |_| 228); // subunit 2
    push_u16s(&mut out, 96, |i| 400 + i as u16); // infestation
    push_u32s(&mut out, n, |_| 0); // construction animation
    push_u8s(&mut out, n, |_| 0); // direction
    push_u8s(&mut out, n, |i| (i % 2) as u8); // shield enable
    push_u16s(&mut out, n, |_| 60); // shield amount
    push_u32s(&mut out, n, |_| 100 * 256); // hit points
    for _ in 0..13 {
        // elevation, movement flags, rank, the five ai orders, weapons
        // and hit counts, internal ai
        push_u8s(&mut out, n, |i| (i % 100) as u8);
    }
    push_u32s(&mut out, n, |_| 0x400); // flags
    for _ in 0..6 {
        // acquisition, sight, armor upgrade, size class, armor, right click
        push_u8s(&mut out, n, |_| 3);
    }
    push_u16s(&mut out, 106, |i| 100 + i as u16); // ready sound
    push_u16s(&mut out, n, |_| 200); // what start
    push_u16s(&mut out, n, |_| 201); // what end
    push_u16s(&mut out, 106, |_| 300); // annoyed start
    push_u16s(&mut out, 106, |_| 301); // annoyed end
    push_u16s(&mut out, 106, |_| 302); // yes start
    push_u16s(&mut out, 106, |_| 303); // yes end
    push_u16s(&mut out, n * 2, |_| 32); // placement box
    push_u16s(&mut out, 96, |i| 64 + i as u16); // addon x
    push_u16s(&mut out, 96, |i| 96 + i as u16); // addon y
    push_u16s(&mut out, n * 4, |_| 8); // dimension box
    push_u16s(&mut out, n, |_| 0); // portrait
    push_u16s(&mut out, n, |_| 50); // minerals
    push_u16s(&mut out, n, |_| 25); // gas
    push_u16s(&mut out, n, |_| 24 * 15); // build time
    push_u16s(&mut out, n, |_| 0); // requirements
    for _ in 0..5 {
        // group flags, supply, space
        push_u8s(&mut out, n, |_| 1);
    }
    push_u16s(&mut out, n, |_| 50); // build score
    push_u16s(&mut out, n, |_| 100); // destroy score
    push_u16s(&mut out, n, |_| 0); // map string
    push_u8s(&mut out, n, |_| 0); // broodwar
    push_u16s(&mut out, n, |_| 3); // availability
    out
}

fn weapons_dat() -> Vec<u8> {
    let n = dat::WEAPON_ENTRIES;
    let mut out = Vec::new();
    push_u16s(&mut out, n, |i| i as u16); // label
    push_u32s(&mut out, n, |_| 100); // graphics
    push_u8s(&mut out, n, |_| 0); // unused
    push_u16s(&mut out, n, |_| 1); // target flags
    push_u32s(&mut out, n, |_| 0); // min range
    push_u32s(&mut out, n, |_| 128); // max range
    push_u8s(&mut out, n, |i| (i % 61) as u8); // upgrade
    push_u8s(&mut out, n, |_| 0); // type
    push_u8s(&mut out, n, |_| 2); // behavior
    push_u8s(&mut out, n, |_| 1); // remove after
    push_u8s(&mut out, n, |_| 1); // explosion
    push_u16s(&mut out, n, |_| 10); // splash
    push_u16s(&mut out, n, |_| 20);
    push_u16s(&mut out, n, |_| 30);
    push_u16s(&mut out, n, |_| 6); // damage
    push_u16s(&mut out, n, |_| 1); // bonus
    push_u8s(&mut out, n, |_| 22); // cooldown
    push_u8s(&mut out, n, |_| 1); // factor
    push_u8s(&mut out, n, |_| 0); // angle
    push_u8s(&mut out, n, |_| 0); // spin
    push_u8s(&mut out, n, |_| 0); // x offset
    push_u8s(&mut out, n, |_| 0); // y offset
    push_u16s(&mut out, n, |_| 0); // error message
    push_u16s(&mut out, n, |i| i as u16); // icon
    out
}

fn sprites_dat() -> Vec<u8> {
    let n = dat::SPRITE_ENTRIES;
    let mut out = Vec::new();
    push_u16s(&mut out, n, |i| i as u16);
    push_u8s(&mut out, n - 130, |_| 8);
    push_u8s(&mut out, n, |_| 0);
    push_u8s(&mut out, n, |_| 1);
    push_u8s(&mut out, n - 130, |_| 5);
    push_u8s(&mut out, n - 130, |_| 2);
    out
}

fn flingy_dat() -> Vec<u8> {
    let n = dat::FLINGY_ENTRIES;
    let mut out = Vec::new();
    push_u16s(&mut out, n, |_| 0);
    push_u32s(&mut out, n, |_| 1024);
    push_u16s(&mut out, n, |_| 17);
    push_u32s(&mut out, n, |_| 2);
    push_u8s(&mut out, n, |_| 40);
    push_u8s(&mut out, n, |_| 0);
    push_u8s(&mut out, n, |_| 0);
    out
}

fn orders_dat() -> Vec<u8> {
    let n = dat::ORDER_ENTRIES;
    let mut out = Vec::new();
    push_u16s(&mut out, n, |i| i as u16);
    for _ in 0..15 {
        push_u8s(&mut out, n, |_| 0);
    }
    push_u16s(&mut out, n, |_| 0xffff);
    push_u16s(&mut out, n, |_| 0);
    push_u8s(&mut out, n, |_| 0);
    out
}

fn portdata_dat() -> Vec<u8> {
    let n = dat::PORTRAIT_ENTRIES;
    let mut out = Vec::new();
    push_u32s(&mut out, n, |i| i as u32);
    push_u8s(&mut out, n, |_| 0);
    push_u8s(&mut out, n, |_| 0);
    out
}

fn techdata_dat() -> Vec<u8> {
    let n = dat::TECH_ENTRIES;
    let mut out = Vec::new();
    push_u16s(&mut out, n, |_| 100);
    push_u16s(&mut out, n, |_| 100);
    push_u16s(&mut out, n, |_| 1200);
    push_u16s(&mut out, n, |i| (i % 2) as u16 * 50);
    push_u32s(&mut out, n, |_| 0);
    push_u16s(&mut out, n, |i| i as u16);
    push_u16s(&mut out, n, |i| i as u16);
    push_u8s(&mut out, n, |i| (i % 3) as u8);
    push_u8s(&mut out, n, |_| 0);
    push_u8s(&mut out, n, |_| 0);
    out
}

fn upgrades_dat() -> Vec<u8> {
    let n = dat::UPGRADE_ENTRIES;
    let mut out = Vec::new();
    push_u16s(&mut out, n, |_| 100);
    push_u16s(&mut out, n, |_| 75);
    push_u16s(&mut out, n, |_| 100);
    push_u16s(&mut out, n, |_| 75);
    push_u16s(&mut out, n, |_| 4000);
    push_u16s(&mut out, n, |_| 480);
    push_u16s(&mut out, n, |_| 0);
    push_u16s(&mut out, n, |i| i as u16);
    push_u16s(&mut out, n, |i| i as u16);
    push_u8s(&mut out, n, |i| (i % 3) as u8);
    push_u8s(&mut out, n, |_| 3);
    push_u8s(&mut out, n, |_| 0);
    out
}

fn static_tables() -> StaticTables {
    StaticTables {
        units: dat::read_units(&units_dat()).unwrap(),
        weapons: dat::read_weapons(&weapons_dat()).unwrap(),
        flingy: dat::read_flingy(&flingy_dat()).unwrap(),
        sprites: dat::read_sprites(&sprites_dat()).unwrap(),
        orders: dat::read_orders(&orders_dat()).unwrap(),
        portraits: dat::read_portraits(&portdata_dat()).unwrap(),
        techdata: dat::read_techdata(&techdata_dat()).unwrap(),
        upgrades: dat::read_upgrades(&upgrades_dat()).unwrap(),
    }
}

fn strx() -> Vec<u8> {
    // 6 strings; the last duplicates "Red Zone" and shares its byte run.
    let strings: [&str; 6] = [
        "Grunty",
        "Red Zone",
        "Test Scenario",
        "A little codec workout",
        "Force one",
        "Red Zone",
    ];
    let mut offsets = Vec::new();
    let mut blob = Vec::new();
    let base = 4 + strings.len() * 4;
    for (i, s) in strings.iter().enumerate() {
        if i == 5 {
            offsets.push(offsets[1]);
            continue;
        }
        offsets.push((base + blob.len()) as u32);
        blob.extend_from_slice(s.as_bytes());
        blob.push(0);
    }
    let mut out = Vec::new();
    out.extend_from_slice(&(strings.len() as u32).to_le_bytes());
    for offset in offsets {
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out.extend_from_slice(&blob);
    out
}

fn unit_record(serial: u32, id: u16, owner: u8, hp: u8, resources: u32) -> Vec<u8> {
    let mut record = vec![0u8; 36];
    LittleEndian::write_u32(&mut record, serial);
    LittleEndian::write_u16(&mut record[4..], 64);
    LittleEndian::write_u16(&mut record[6..], 96);
    LittleEndian::write_u16(&mut record[8..], id);
    LittleEndian::write_u16(&mut record[14..], 0x1f);
    record[16] = owner;
    record[17] = hp;
    record[18] = 100;
    record[19] = 100;
    LittleEndian::write_u32(&mut record[20..], resources);
    record
}

fn location_record(l: u32, t: u32, r: u32, b: u32, name: u16, flags: u16) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [l, t, r, b].iter() {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&name.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out
}

fn scenario_sections() -> SectionMap {
    let mut sections = SectionMap::new();
    sections.insert(tag::VER, vec![0xcd, 0]);
    let mut vcod = Vec::new();
    push_u32s(&mut vcod, 256, |i| i as u32 * 7);
    push_u8s(&mut vcod, 16, |i| i as u8);
    sections.insert(tag::VCOD, vcod);

    let mut ownr = vec![6u8; 8];
    ownr.extend_from_slice(&[0, 0, 0, 7]);
    sections.insert(tag::OWNR, ownr);
    let mut side = vec![0u8, 1, 2, 1, 0, 2, 5, 6];
    side.extend_from_slice(&[7, 7, 7, 4]);
    sections.insert(tag::SIDE, side);
    sections.insert(tag::COLR, (0..8u8).collect());
    sections.insert(tag::ERA, 5u16.to_le_bytes().to_vec());

    let (width, height) = (8u16, 4u16);
    let mut dim = Vec::new();
    dim.extend_from_slice(&width.to_le_bytes());
    dim.extend_from_slice(&height.to_le_bytes());
    sections.insert(tag::DIM, dim);
    let cells = width as usize * height as usize;
    let mut mtxm = Vec::new();
    push_u16s(&mut mtxm, cells, |i| ((i as u16) << 4) | (i as u16 & 0xf));
    sections.insert(tag::MTXM, mtxm);
    sections.insert(tag::MASK, vec![0xff; cells]);

    let mut unit = unit_record(1, 0, 0, 50, 0);
    unit.extend_from_slice(&unit_record(0, START_LOCATION, 1, 100, 0));
    unit.extend_from_slice(&unit_record(2, 176, 11, 100, 1500));
    sections.insert(tag::UNIT, unit);

    let mut puni = Vec::new();
    push_u8s(&mut puni, 228 * 12, |i| (i % 2) as u8);
    push_u8s(&mut puni, 228, |_| 1);
    push_u8s(&mut puni, 228 * 12, |_| 1);
    sections.insert(tag::PUNI, puni);

    let mut unix = Vec::new();
    push_u8s(&mut unix, 228, |i| (i != 0) as u8); // use defaults, 0 customized
    push_u32s(&mut unix, 228, |i| if i == 0 { 200 } else { 400 }); // hp
    push_u16s(&mut unix, 228, |_| 60); // shields
    push_u8s(&mut unix, 228, |_| 1); // armor
    push_u16s(&mut unix, 228, |_| 24 * 15); // build time
    push_u16s(&mut unix, 228, |_| 50); // minerals
    push_u16s(&mut unix, 228, |_| 25); // gas
    push_u16s(&mut unix, 228, |i| (i == 0) as u16); // name, unit 0 -> "Grunty"
    push_u16s(&mut unix, 130, |i| 6 + i as u16); // weapon damage
    push_u16s(&mut unix, 130, |_| 1); // weapon bonus
    sections.insert(tag::UNIX, unix);

    let mut pupx = Vec::new();
    push_u8s(&mut pupx, 61 * 12, |_| 3);
    push_u8s(&mut pupx, 61 * 12, |_| 0);
    push_u8s(&mut pupx, 61, |_| 3);
    push_u8s(&mut pupx, 61, |_| 0);
    push_u8s(&mut pupx, 61 * 12, |_| 1);
    sections.insert(tag::PUPX, pupx);

    let mut upgx = Vec::new();
    push_u8s(&mut upgx, 61, |_| 1);
    upgx.push(0);
    for _ in 0..6 {
        push_u16s(&mut upgx, 61, |i| 100 + i as u16);
    }
    sections.insert(tag::UPGX, upgx);

    let mut thg2 = Vec::new();
    for (id, owner) in [(130u16, 11u8), (275, 0)].iter() {
        push_u16s(&mut thg2, 1, |_| *id);
        push_u16s(&mut thg2, 1, |_| 320);
        push_u16s(&mut thg2, 1, |_| 96);
        thg2.push(*owner);
        thg2.push(0);
        push_u16s(&mut thg2, 1, |_| 0x1000);
    }
    sections.insert(tag::THG2, thg2);

    let mut mrgn = location_record(32, 32, 128, 160, 2, 0x3);
    mrgn.extend_from_slice(&location_record(0, 0, 0, 0, 0, 0));
    mrgn.extend_from_slice(&location_record(0, 0, 320, 128, 0, 0xffff));
    sections.insert(tag::MRGN, mrgn);

    sections.insert(tag::STRX, strx());

    let mut sprp = Vec::new();
    sprp.extend_from_slice(&3u16.to_le_bytes());
    sprp.extend_from_slice(&4u16.to_le_bytes());
    sections.insert(tag::SPRP, sprp);

    let mut forc = vec![0u8, 0, 1, 1, 2, 2, 3, 3];
    for name in [5u16, 0, 0, 0].iter() {
        forc.extend_from_slice(&name.to_le_bytes());
    }
    forc.extend_from_slice(&[0xf, 0x8, 0, 0]);
    sections.insert(tag::FORC, forc);

    let mut ptex = Vec::new();
    push_u8s(&mut ptex, 44 * 12, |_| 1);
    push_u8s(&mut ptex, 44 * 12, |i| (i % 3 == 0) as u8);
    push_u8s(&mut ptex, 44, |_| 1);
    push_u8s(&mut ptex, 44, |_| 0);
    push_u8s(&mut ptex, 44 * 12, |_| 1);
    sections.insert(tag::PTEX, ptex);

    let mut tecx = Vec::new();
    push_u8s(&mut tecx, 44, |_| 1);
    for _ in 0..4 {
        push_u16s(&mut tecx, 44, |i| 100 + i as u16);
    }
    sections.insert(tag::TECX, tecx);

    sections.insert(tag::MBRF, b"briefing bytecode".to_vec());
    sections.insert(tag::TRIG, b"trigger bytecode that stays opaque".to_vec());

    let mut uprp = vec![0u8; 20];
    uprp[0] = 0x1;
    uprp[2] = 0x2;
    uprp[5] = 75;
    uprp[6] = 100;
    uprp[7] = 50;
    sections.insert(tag::UPRP, uprp);
    sections
}

#[test]
fn full_roundtrip_is_byte_identical() {
    let sections = scenario_sections();
    let tables = static_tables();
    let chk = ChkData::decode(&sections).unwrap();
    let map = merge::build(&chk, &tables).unwrap();
    let flattened = merge::flatten(&map).unwrap();
    let encoded = flattened.encode().unwrap();

    assert_eq!(encoded.len(), 24);
    assert_eq!(encoded[0].0, tag::VER);
    assert_eq!(encoded[23].0, tag::UPRP);
    for (section_tag, bytes) in encoded.iter() {
        let original = sections.get(*section_tag).unwrap();
        assert_eq!(
            &bytes[..],
            original,
            "section {} did not round-trip",
            section_tag,
        );
    }
}

#[test]
fn decode_twice_is_stable() {
    let sections = scenario_sections();
    let tables = static_tables();
    let map = merge::build(&ChkData::decode(&sections).unwrap(), &tables).unwrap();
    let encoded = merge::flatten(&map).unwrap().encode().unwrap();
    let reassembled: SectionMap = encoded.into_iter().collect();
    let map2 = merge::build(&ChkData::decode(&reassembled).unwrap(), &tables).unwrap();
    assert_eq!(map.units, map2.units);
    assert_eq!(map.sprites, map2.sprites);
    assert_eq!(map.unit_definitions, map2.unit_definitions);
    assert_eq!(map.locations.len(), map2.locations.len());
}

#[test]
fn merged_model_contents() {
    let sections = scenario_sections();
    let tables = static_tables();
    let map = merge::build(&ChkData::decode(&sections).unwrap(), &tables).unwrap();

    // Custom name comes from the string table, defaults from the name table.
    assert_eq!(map.unit_definitions[0].name, "Grunty");
    assert_eq!(map.unit_definitions[7].name, "Terran SCV");
    assert_eq!(map.unit_definitions[214].name, "Start Location");

    // Percentage-derived current stats: 50% of 200 max.
    assert_eq!(map.units[0].definition.stats.hit_points.max, 200);
    assert_eq!(map.units[0].definition.stats.hit_points.current, 100);

    // The start location marker has no serial but keeps its slot.
    assert_eq!(map.units[1].serial, None);
    assert_eq!(map.units[1].kind(), START_LOCATION);
    assert_eq!(map.units.len(), 3);
    assert_eq!(map.units[2].resource_amount, 1500);

    // Weapons are embedded by value with the map's damage override.
    let weapon = map.units[0].definition.arsenal.ground_weapon.as_ref().unwrap();
    assert_eq!(weapon.name, "Gauss Rifle (Normal)");
    assert_eq!(weapon.damage.amount, 6);
    assert!(map.unit_definitions[0].arsenal.air_weapon.is_some());

    // Addon offsets exist only in the building id range.
    assert!(map.unit_definitions[120].size.addon_position.is_some());
    assert!(map.unit_definitions[50].size.addon_position.is_none());

    // Restriction cardinality survives the merge untouched.
    assert_eq!(map.unit_restrictions.len(), 228);
    assert_eq!(map.upgrade_restrictions.len(), 61);
    assert_eq!(map.tech_restrictions.len(), 44);

    // The zero-rect location slot is gone, the others kept their slots.
    assert_eq!(map.locations.len(), 2);
    assert!(map.locations.get(0).is_some());
    assert!(map.locations.get(1).is_none());
    assert!(map.locations.get(2).is_some());
    assert_eq!(map.strings.get(map.locations.get(0).unwrap().name), Some("Red Zone"));
}

#[test]
fn placement_copies_do_not_alias() {
    let sections = scenario_sections();
    let tables = static_tables();
    let map = merge::build(&ChkData::decode(&sections).unwrap(), &tables).unwrap();
    let template = map.unit_definitions[0].clone();
    let mut map = map;
    map.units[0].definition.stats.hit_points.current = 7;
    assert_eq!(map.unit_definitions[0], template);
    // Same kind placed twice would not alias either; the instance copy is
    // the one that changed.
    assert_ne!(
        map.units[0].definition.stats.hit_points.current,
        template.stats.hit_points.current,
    );
}

#[test]
fn string_dedup_in_full_encode() {
    let sections = scenario_sections();
    let tables = static_tables();
    let map = merge::build(&ChkData::decode(&sections).unwrap(), &tables).unwrap();
    let encoded = merge::flatten(&map).unwrap().encode().unwrap();
    let strx_bytes = encoded
        .iter()
        .find(|x| x.0 == tag::STRX)
        .map(|x| x.1.clone())
        .unwrap();
    // Strings 2 and 6 share content, so their offsets must match.
    let offset_2 = LittleEndian::read_u32(&strx_bytes[4 + 4..]);
    let offset_6 = LittleEndian::read_u32(&strx_bytes[4 + 5 * 4..]);
    assert_eq!(offset_2, offset_6);
}

#[test]
fn session_snapshot_roundtrip() {
    let sections = scenario_sections();
    let tables = static_tables();
    let map = merge::build(&ChkData::decode(&sections).unwrap(), &tables).unwrap();
    let snapshot = scmap::project::save_session(&map).unwrap();
    let restored = scmap::project::load_session(&snapshot).unwrap();
    assert_eq!(restored.units, map.units);
    assert_eq!(restored.unit_definitions, map.unit_definitions);
    let encoded_a = merge::flatten(&map).unwrap().encode().unwrap();
    let encoded_b = merge::flatten(&restored).unwrap().encode().unwrap();
    assert_eq!(encoded_a, encoded_b);
}

#[test]
fn edited_definition_flattens_into_overrides() {
    let sections = scenario_sections();
    let tables = static_tables();
    let mut map = merge::build(&ChkData::decode(&sections).unwrap(), &tables).unwrap();
    let name = map.strings.intern("Muscle Marine");
    map.unit_definitions[0].name = "Muscle Marine".into();
    map.unit_definitions[0].name_string = name;
    map.unit_definitions[0].stats.hit_points.max = 500;
    map.unit_definitions[0].stats.hit_points.current = 500;
    let flattened = merge::flatten(&map).unwrap();
    assert_eq!(flattened.unit_settings.units[0].hit_points, 500);
    assert_eq!(
        flattened.strings.get(flattened.unit_settings.units[0].name),
        Some("Muscle Marine"),
    );
    // Round-trips through sections with the edit intact.
    let encoded = flattened.encode().unwrap();
    let reassembled: SectionMap = encoded.into_iter().collect();
    let map2 = merge::build(&ChkData::decode(&reassembled).unwrap(), &tables).unwrap();
    assert_eq!(map2.unit_definitions[0].name, "Muscle Marine");
    assert_eq!(map2.unit_definitions[0].stats.hit_points.max, 500);
}

#[test]
fn missing_section_fails_decode() {
    let sections = scenario_sections();
    let mut encoded = ChkData::decode(&sections).unwrap().encode().unwrap();
    encoded.retain(|x| x.0 != tag::UNIX);
    let incomplete: SectionMap = encoded.into_iter().collect();
    assert!(ChkData::decode(&incomplete).is_err());
}

#[test]
fn truncated_section_fails_decode() {
    let sections = scenario_sections();
    let mut encoded = ChkData::decode(&sections).unwrap().encode().unwrap();
    for section in encoded.iter_mut() {
        if section.0 == tag::UNIT {
            section.1.truncate(20);
        }
    }
    let broken: SectionMap = encoded.into_iter().collect();
    assert!(ChkData::decode(&broken).is_err());
}

#[test]
fn force_names_resolve() {
    let sections = scenario_sections();
    let chk = ChkData::decode(&sections).unwrap();
    assert_eq!(chk.strings.get(chk.forces[0].name), Some("Force one"));
    assert_eq!(chk.forces[1].name, StrIndex::NONE);
}
