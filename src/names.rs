use fxhash::FxHashMap;
use once_cell::sync::Lazy;

/// Default display names, used when a map does not override an entry's
/// name string. Indexed by entry id, one table per kind.
pub static UNIT_NAMES: [&str; 228] = [
    "Terran Marine",
    "Terran Ghost",
    "Terran Vulture",
    "Terran Goliath",
    "Goliath Turret",
    "Terran Siege Tank (Tank Mode)",
    "Siege Tank Turret (Tank Mode)",
    "Terran SCV",
    "Terran Wraith",
    "Terran Science Vessel",
    "Gui Montag (Firebat)",
    "Terran Dropship",
    "Terran Battlecruiser",
    "Vulture Spider Mine",
    "Nuclear Missile",
    "Terran Civilian",
    "Sarah Kerrigan (Ghost)",
    "Alan Schezar (Goliath)",
    "Alan Schezar Turret",
    "Jim Raynor (Vulture)",
    "Jim Raynor (Marine)",
    "Tom Kazansky (Wraith)",
    "Magellan (Science Vessel)",
    "Edmund Duke (Tank Mode)",
    "Edmund Duke Turret (Tank Mode)",
    "Edmund Duke (Siege Mode)",
    "Edmund Duke Turret (Siege Mode)",
    "Arcturus Mengsk (Battlecruiser)",
    "Hyperion (Battlecruiser)",
    "Norad II (Battlecruiser)",
    "Terran Siege Tank (Siege Mode)",
    "Siege Tank Turret (Siege Mode)",
    "Terran Firebat",
    "Scanner Sweep",
    "Terran Medic",
    "Zerg Larva",
    "Zerg Egg",
    "Zerg Zergling",
    "Zerg Hydralisk",
    "Zerg Ultralisk",
    "Zerg Broodling",
    "Zerg Drone",
    "Zerg Overlord",
    "Zerg Mutalisk",
    "Zerg Guardian",
    "Zerg Queen",
    "Zerg Defiler",
    "Zerg Scourge",
    "Torrasque (Ultralisk)",
    "Matriarch (Queen)",
    "Infested Terran",
    "Infested Kerrigan (Infested Terran)",
    "Unclean One (Defiler)",
    "Hunter Killer (Hydralisk)",
    "Devouring One (Zergling)",
    "Kukulza (Mutalisk)",
    "Kukulza (Guardian)",
    "Yggdrasill (Overlord)",
    "Terran Valkyrie",
    "Mutalisk Cocoon",
    "Protoss Corsair",
    "Protoss Dark Templar (Unit)",
    "Zerg Devourer",
    "Protoss Dark Archon",
    "Protoss Probe",
    "Protoss Zealot",
    "Protoss Dragoon",
    "Protoss High Templar",
    "Protoss Archon",
    "Protoss Shuttle",
    "Protoss Scout",
    "Protoss Arbiter",
    "Protoss Carrier",
    "Protoss Interceptor",
    "Protoss Dark Templar (Hero)",
    "Zeratul (Dark Templar)",
    "Tassadar/Zeratul (Archon)",
    "Fenix (Zealot)",
    "Fenix (Dragoon)",
    "Tassadar (Templar)",
    "Mojo (Scout)",
    "Warbringer (Reaver)",
    "Gantrithor (Carrier)",
    "Protoss Reaver",
    "Protoss Observer",
    "Protoss Scarab",
    "Danimoth (Arbiter)",
    "Aldaris (Templar)",
    "Artanis (Scout)",
    "Rhynadon (Badlands Critter)",
    "Bengalaas (Jungle Critter)",
    "Cargo Ship (Unused)",
    "Mercenary Gunship (Unused)",
    "Scantid (Desert Critter)",
    "Kakaru (Twilight Critter)",
    "Ragnasaur (Ashworld Critter)",
    "Ursadon (Ice World Critter)",
    "Lurker Egg",
    "Raszagal (Corsair)",
    "Samir Duran (Ghost)",
    "Alexei Stukov (Ghost)",
    "Map Revealer",
    "Gerard DuGalle (BattleCruiser)",
    "Zerg Lurker",
    "Infested Duran (Infested Terran)",
    "Disruption Web",
    "Terran Command Center",
    "Terran Comsat Station",
    "Terran Nuclear Silo",
    "Terran Supply Depot",
    "Terran Refinery",
    "Terran Barracks",
    "Terran Academy",
    "Terran Factory",
    "Terran Starport",
    "Terran Control Tower",
    "Terran Science Facility",
    "Terran Covert Ops",
    "Terran Physics Lab",
    "Starbase (Unused)",
    "Terran Machine Shop",
    "Repair Bay (Unused)",
    "Terran Engineering Bay",
    "Terran Armory",
    "Terran Missile Turret",
    "Terran Bunker",
    "Norad II (Crashed)",
    "Ion Cannon",
    "Uraj Crystal",
    "Khalis Crystal",
    "Zerg Infested Command Center",
    "Zerg Hatchery",
    "Zerg Lair",
    "Zerg Hive",
    "Zerg Nydus Canal",
    "Zerg Hydralisk Den",
    "Zerg Defiler Mound",
    "Zerg Greater Spire",
    "Zerg Queen's Nest",
    "Zerg Evolution Chamber",
    "Zerg Ultralisk Cavern",
    "Zerg Spire",
    "Zerg Spawning Pool",
    "Zerg Creep Colony",
    "Zerg Spore Colony",
    "Unused Zerg Building 1",
    "Zerg Sunken Colony",
    "Zerg Overmind (With Shell)",
    "Zerg Overmind",
    "Zerg Extractor",
    "Mature Chrysalis",
    "Zerg Cerebrate",
    "Zerg Cerebrate Daggoth",
    "Unused Zerg Building 2",
    "Protoss Nexus",
    "Protoss Robotics Facility",
    "Protoss Pylon",
    "Protoss Assimilator",
    "Unused Protoss Building 1",
    "Protoss Observatory",
    "Protoss Gateway",
    "Unused Protoss Building 2",
    "Protoss Photon Cannon",
    "Protoss Citadel of Adun",
    "Protoss Cybernetics Core",
    "Protoss Templar Archives",
    "Protoss Forge",
    "Protoss Stargate",
    "Stasis Cell/Prison",
    "Protoss Fleet Beacon",
    "Protoss Arbiter Tribunal",
    "Protoss Robotics Support Bay",
    "Protoss Shield Battery",
    "Khaydarin Crystal Formation",
    "Protoss Temple",
    "Xel'Naga Temple",
    "Mineral Field (Type 1)",
    "Mineral Field (Type 2)",
    "Mineral Field (Type 3)",
    "Cave (Unused)",
    "Cave-in (Unused)",
    "Cantina (Unused)",
    "Mining Platform (Unused)",
    "Independent Command Center (Unused)",
    "Independent Starport (Unused)",
    "Independent Jump Gate (Unused)",
    "Ruins (Unused)",
    "Khaydarin Crystal Formation (Unused)",
    "Vespene Geyser",
    "Warp Gate",
    "Psi Disrupter",
    "Zerg Marker",
    "Terran Marker",
    "Protoss Marker",
    "Zerg Beacon",
    "Terran Beacon",
    "Protoss Beacon",
    "Zerg Flag Beacon",
    "Terran Flag Beacon",
    "Protoss Flag Beacon",
    "Power Generator",
    "Overmind Cocoon",
    "Dark Swarm",
    "Floor Missile Trap",
    "Floor Hatch (Unused)",
    "Left Upper Level Door",
    "Right Upper Level Door",
    "Left Pit Door",
    "Right Pit Door",
    "Floor Gun Trap",
    "Left Wall Missile Trap",
    "Left Wall Flame Trap",
    "Right Wall Missile Trap",
    "Right Wall Flame Trap",
    "Start Location",
    "Flag",
    "Young Chrysalis",
    "Psi Emitter",
    "Data Disc",
    "Khaydarin Crystal",
    "Mineral Cluster Type 1",
    "Mineral Cluster Type 2",
    "Protoss Vespene Gas Orb Type 1",
    "Protoss Vespene Gas Orb Type 2",
    "Zerg Vespene Gas Sac Type 1",
    "Zerg Vespene Gas Sac Type 2",
    "Terran Vespene Gas Tank Type 1",
    "Terran Vespene Gas Tank Type 2",
];

pub static WEAPON_NAMES: [&str; 130] = [
    "Gauss Rifle (Normal)",
    "Gauss Rifle (Jim Raynor (Marine))",
    "C-10 Canister Rifle (Normal)",
    "C-10 Canister Rifle (Sarah Kerrigan)",
    "Fragmentation Grenade (Normal)",
    "Fragmentation Grenade (Jim Raynor (Vulture))",
    "Spider Mines",
    "Twin Autocannons (Normal)",
    "Hellfire Missile Pack (Normal)",
    "Twin Autocannons (Alan Schezar)",
    "Hellfire Missile Pack (Alan Schezar)",
    "Arclite Cannon (Normal)",
    "Arclite Cannon (Edmund Duke)",
    "Fusion Cutter",
    "Fusion Cutter (Harvest)",
    "Gemini Missiles (Normal)",
    "Burst Lasers (Normal)",
    "Gemini Missiles (Tom Kazansky)",
    "Burst Lasers (Tom Kazansky)",
    "ATS Laser Battery (Normal)",
    "ATA Laser Battery (Normal)",
    "ATS Laser Battery (Hero)",
    "ATA Laser Battery (Hero)",
    "ATS Laser Battery (Hyperion)",
    "ATA Laser Battery (Hyperion)",
    "Flame Thrower (Normal)",
    "Flame Thrower (Gui Montag)",
    "Arclite Shock Cannon (Normal)",
    "Arclite Shock Cannon (Edmund Duke)",
    "Longbolt Missile",
    "Yamato Gun",
    "Nuclear Strike",
    "Lockdown",
    "EMP Shockwave",
    "Irradiate",
    "Claws (Normal)",
    "Claws (Devouring One)",
    "Claws (Infested Kerrigan)",
    "Needle Spines (Normal)",
    "Needle Spines (Hunter Killer)",
    "Kaiser Blades (Normal)",
    "Kaiser Blades (Torrasque)",
    "Toxic Spores (Broodling)",
    "Spines",
    "Spines (Harvest)",
    "Acid Spray (Unused)",
    "Acid Spore (Normal)",
    "Acid Spore (Kukulza (Guardian))",
    "Glave Wurm (Normal)",
    "Glave Wurm (Kukulza (Mutalisk))",
    "Venom (Unused)",
    "Venom (Unused Hero)",
    "Seeker Spores",
    "Subterranean Tentacle",
    "Suicide (Infested Terran)",
    "Suicide (Scourge)",
    "Parasite",
    "Spawn Broodlings",
    "Ensnare",
    "Dark Swarm",
    "Plague",
    "Consume",
    "Particle Beam",
    "Particle Beam (Harvest)",
    "Psi Blades (Normal)",
    "Psi Blades (Fenix (Zealot))",
    "Phase Disruptor (Normal)",
    "Phase Disruptor (Fenix (Dragoon))",
    "Psi Assault (Normal (Unused))",
    "Psi Assault (Tassadar/Aldaris)",
    "Psionic Shockwave (Normal)",
    "Psionic Shockwave (Tassadar/Zeratul (Archon))",
    "Unknown72",
    "Dual Photon Blasters (Normal)",
    "Anti-Matter Missiles (Normal)",
    "Dual Photon Blasters (Mojo)",
    "Anti-Matter Missiles (Mojo)",
    "Dual Photon Blasters (Artanis)",
    "Anti-Matter Missiles (Artanis)",
    "Phase Disruptor Cannon (Normal)",
    "Phase Disruptor Cannon (Danimoth)",
    "Pulse Cannon",
    "STS Photon Cannon",
    "STA Photon Cannon",
    "Scarab",
    "Stasis Field",
    "Psionic Storm",
    "Warp Blades (Zeratul)",
    "Warp Blades (Dark Templar Hero)",
    "Missiles (Unused)",
    "Laser Battery1 (Unused)",
    "Tormentor Missiles (Unused)",
    "Bombs (Unused)",
    "Raider Gun (Unused)",
    "Laser Battery2 (Unused)",
    "Laser Battery3 (Unused)",
    "Dual Photon Blasters (Unused)",
    "Flechette Grenade (Unused)",
    "Twin Autocannons (Floor Trap)",
    "Hellfire Missile Pack (Wall Trap)",
    "Flame Thrower (Wall Trap)",
    "Hellfire Missile Pack (Floor Trap)",
    "Neutron Flare",
    "Disruption Web",
    "Restoration",
    "Halo Rockets",
    "Corrosive Acid",
    "Mind Control",
    "Feedback",
    "Optical Flare",
    "Maelstrom",
    "Subterranean Spines",
    "Gauss Rifle0 (Unused)",
    "Warp Blades (Normal)",
    "C-10 Canister Rifle (Samir Duran)",
    "C-10 Canister Rifle (Infested Duran)",
    "Neutron Flare (Raszagal)",
    "C-10 Canister Rifle (Alexei Stukov)",
    "Unknown118",
    "Unknown119",
    "Unknown120",
    "Unknown121",
    "Unknown122",
    "Unknown123",
    "Unknown124",
    "Unknown125",
    "Unknown126",
    "Unknown127",
    "Unknown128",
    "Unknown129",
];

pub static UPGRADE_NAMES: [&str; 61] = [
    "Terran Infantry Armor",
    "Terran Vehicle Plating",
    "Terran Ship Plating",
    "Zerg Carapace",
    "Zerg Flyer Carapace",
    "Protoss Ground Armor",
    "Protoss Air Armor",
    "Terran Infantry Weapons",
    "Terran Vehicle Weapons",
    "Terran Ship Weapons",
    "Zerg Melee Attacks",
    "Zerg Missile Attacks",
    "Zerg Flyer Attacks",
    "Protoss Ground Weapons",
    "Protoss Air Weapons",
    "Protoss Plasma Shields",
    "U-238 Shells",
    "Ion Thrusters",
    "Burst Lasers (Unused)",
    "Titan Reactor",
    "Ocular Implants",
    "Moebius Reactor",
    "Apollo Reactor",
    "Colossus Reactor",
    "Ventral Sacs",
    "Antennae",
    "Pneumatized Carapace",
    "Metabolic Boost",
    "Adrenal Glands",
    "Muscular Augments",
    "Grooved Spines",
    "Gamete Meiosis",
    "Metasynaptic Node",
    "Singularity Charge",
    "Leg Enhancements",
    "Scarab Damage",
    "Reaver Capacity",
    "Gravitic Drive",
    "Sensor Array",
    "Gravitic Boosters",
    "Khaydarin Amulet",
    "Apial Sensors",
    "Gravitic Thrusters",
    "Carrier Capacity",
    "Khaydarin Core",
    "Unknown Upgrade45 (Unused)",
    "Unknown Upgrade46 (Unused)",
    "Argus Jewel",
    "Unknown Upgrade48 (Unused)",
    "Argus Talisman",
    "Unknown Upgrade50 (Unused)",
    "Caduceus Reactor",
    "Chitinous Plating",
    "Anabolic Synthesis",
    "Charon Boosters",
    "Unknown Upgrade55 (Unused)",
    "Unknown Upgrade56 (Unused)",
    "Unknown Upgrade57 (Unused)",
    "Unknown Upgrade58 (Unused)",
    "Unknown Upgrade59 (Unused)",
    "Unknown Upgrade60 (Unused)",
];

pub static TECH_NAMES: [&str; 44] = [
    "Stim Packs",
    "Lockdown",
    "EMP Shockwave",
    "Spider Mines",
    "Scanner Sweep",
    "Tank Siege Mode",
    "Defensive Matrix",
    "Irradiate",
    "Yamato Gun",
    "Cloaking Field",
    "Personnel Cloaking",
    "Burrowing",
    "Infestation",
    "Spawn Broodlings",
    "Dark Swarm",
    "Plague",
    "Consume",
    "Ensnare",
    "Parasite",
    "Psionic Storm",
    "Hallucination",
    "Recall",
    "Stasis Field",
    "Archon Warp",
    "Restoration",
    "Disruption Web",
    "Unused Tech26",
    "Mind Control",
    "Dark Archon Meld",
    "Feedback",
    "Optical Flare",
    "Maelstrom",
    "Lurker Aspect",
    "Unused Tech33",
    "Healing",
    "Unused Tech35",
    "Unused Tech36",
    "Unused Tech37",
    "Unused Tech38",
    "Unused Tech39",
    "Unused Tech40",
    "Unused Tech41",
    "Unused Tech42",
    "Unused Tech43",
];

fn reverse(names: &'static [&'static str]) -> FxHashMap<&'static str, u16> {
    names
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, i as u16))
        .collect()
}

static UNIT_IDS: Lazy<FxHashMap<&'static str, u16>> = Lazy::new(|| reverse(&UNIT_NAMES));
static WEAPON_IDS: Lazy<FxHashMap<&'static str, u16>> = Lazy::new(|| reverse(&WEAPON_NAMES));
static UPGRADE_IDS: Lazy<FxHashMap<&'static str, u16>> = Lazy::new(|| reverse(&UPGRADE_NAMES));
static TECH_IDS: Lazy<FxHashMap<&'static str, u16>> = Lazy::new(|| reverse(&TECH_NAMES));

pub fn unit_name(id: u16) -> Option<&'static str> {
    UNIT_NAMES.get(id as usize).copied()
}

pub fn unit_id(name: &str) -> Option<u16> {
    UNIT_IDS.get(name).copied()
}

pub fn weapon_name(id: u16) -> Option<&'static str> {
    WEAPON_NAMES.get(id as usize).copied()
}

pub fn weapon_id(name: &str) -> Option<u16> {
    WEAPON_IDS.get(name).copied()
}

pub fn upgrade_name(id: u16) -> Option<&'static str> {
    UPGRADE_NAMES.get(id as usize).copied()
}

pub fn upgrade_id(name: &str) -> Option<u16> {
    UPGRADE_IDS.get(name).copied()
}

pub fn tech_name(id: u16) -> Option<&'static str> {
    TECH_NAMES.get(id as usize).copied()
}

pub fn tech_id(name: &str) -> Option<u16> {
    TECH_IDS.get(name).copied()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookups() {
        assert_eq!(unit_name(0), Some("Terran Marine"));
        assert_eq!(unit_name(214), Some("Start Location"));
        assert_eq!(unit_name(228), None);
        assert_eq!(unit_id("Zerg Hydralisk"), Some(38));
        assert_eq!(unit_id("Protoss Pylon"), Some(156));
        assert_eq!(unit_id("Not A Unit"), None);
        assert_eq!(weapon_name(30), Some("Yamato Gun"));
        assert_eq!(weapon_name(84), Some("Scarab"));
        assert_eq!(weapon_id("Psionic Storm"), Some(86));
        assert_eq!(upgrade_id("U-238 Shells"), Some(16));
        assert_eq!(tech_id("Lurker Aspect"), Some(32));
        assert_eq!(tech_name(34), Some("Healing"));
    }
}
