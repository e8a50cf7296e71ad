// Progression
pub const MAX_LEVEL: u32 = 100;
pub const PASSIVE_POINTS_PER_MILESTONE: u32 = 2;
pub const LEVEL_UP_STAT_MIN: u32 = 1;
pub const LEVEL_UP_STAT_MAX: u32 = 5;
pub const DEFEAT_EXP_PENALTY_DIVISOR: u64 = 10;
pub const LOW_LEVEL_XP_MULTIPLIER: f64 = 2.0;
pub const XP_MULTIPLIER: f64 = 1.3;
pub const LOW_LEVEL_XP_CUTOFF: u32 = 20;

// Player defaults
pub const DEFAULT_CRIT_TARGET: u32 = 95;
pub const STARTING_ATTACK: u64 = 5;
pub const STARTING_DEFENCE: u64 = 5;
pub const STARTING_HP: u64 = 25;
pub const STARTING_POTIONS: u32 = 10;
pub const MAX_ACTIVE_COMPANIONS: usize = 3;
pub const MAX_COMPANION_ROSTER: usize = 20;
/// Gold charged to fuse two companions.
pub const FUSE_GOLD_COST: u64 = 50_000;

// Inventory
pub const SLOT_INVENTORY_CAP: usize = 60;
pub const SEND_LEVEL_WINDOW: u32 = 15;

// Monster generation
pub const TREASURE_BASE_CHANCE: f64 = 0.02;
pub const TREASURE_HP: u64 = 10;
pub const TREASURE_TEMPLATE_LEVEL: u32 = 999;
pub const TREASURE_TRACKER_STEP: f64 = 0.005;
pub const TEMPLATE_LEVEL_BAND: u32 = 20;
pub const MONSTER_HP_JITTER_MAX: u32 = 9;
pub const MONSTER_HP_EXPONENT: (f64, f64) = (1.25, 1.45);
pub const ASCENT_XP_STAGE_DIVISOR: f64 = 50.0;

/// Monster-level thresholds for modifier checks, paired with base chance in percent.
/// A threshold is passed when the monster level is strictly above it, except the
/// last which is inclusive.
pub const MODIFIER_CHECKS: [(u32, f64); 5] = [
    (20, 10.0),
    (40, 15.0),
    (60, 20.0),
    (80, 25.0),
    (100, 50.0),
];

// Combat
pub const CRIT_MULTIPLIER: f64 = 2.0;
pub const CRIT_MIN_FRACTION: f64 = 0.5;
pub const WEAPON_LINE_STEP: f64 = 0.08;
pub const PDR_CAP: f64 = 80.0;
pub const SLAYER_DEF_CAP: f64 = 50.0;
pub const AUTO_STOP_HP_FRACTION: f64 = 0.2;
pub const HEAL_BASE_FRACTION: f64 = 0.30;
pub const HEAL_CLERIC_STEP: f64 = 0.10;
pub const HEAL_APOTHECARY_FACTOR: f64 = 0.2;

/// Player hit chance in percent: base plus span scaled by the attack/defence balance.
pub const PLAYER_HIT_BASE_PERCENT: f64 = 60.0;
pub const PLAYER_HIT_SPAN_PERCENT: f64 = 30.0;
pub const MONSTER_HIT_BASE: f64 = 0.5;
pub const MONSTER_HIT_SPAN: f64 = 0.3;
pub const MONSTER_HIT_RANGE: (f64, f64) = (0.2, 0.8);
pub const MONSTER_DAMAGE_SPREAD: (f64, f64) = (0.5, 1.0);
pub const HEAL_JITTER: (u64, u64) = (1, 6);
pub const EMBLEM_COMBAT_STEP: f64 = 0.02;
pub const EMBLEM_BOSS_STEP: f64 = 0.05;
pub const EMBLEM_SLAYER_STEP: f64 = 0.02;
pub const EMBLEM_CRIT_STEP: f64 = 0.05;

// Monster modifier effect constants
pub const SUFFOCATOR_CHANCE: f64 = 0.2;
pub const SHIELDS_UP_CHANCE: f64 = 0.1;
pub const MIRROR_IMAGE_CHANCE: f64 = 0.2;
pub const EXECUTIONER_CHANCE: f64 = 0.01;
pub const EXECUTIONER_HP_FRACTION: f64 = 0.9;
pub const TIME_LORD_CHANCE: f64 = 0.8;
pub const VAMPIRIC_HEAL_FACTOR: u64 = 10;
pub const SOUL_EATER_HEAL_FACTOR: u64 = 20;
pub const REGENERATING_FRACTION: f64 = 0.02;

// Player passive chances
pub const INVULNERABLE_CHANCE: f64 = 0.2;
pub const OMNIPOTENT_CHANCE: f64 = 0.5;
pub const MYSTICAL_MIGHT_CHANCE: f64 = 0.2;
pub const MYSTICAL_MIGHT_MULTIPLIER: f64 = 10.0;
pub const UNLIMITED_WEALTH_CHANCE: f64 = 0.2;
pub const UNLIMITED_WEALTH_MULTIPLIER: f64 = 5.0;
pub const EVERLASTING_BLESSING_CHANCE: f64 = 0.1;
pub const TREASURE_HUNTER_BONUS: f64 = 0.05;

// Rewards
pub const GOLD_EXPONENT: (f64, f64) = (1.4, 1.6);
pub const GOLD_FLAT_BONUS: u64 = 20;
pub const ITEM_DROP_BASE_PERCENT: f64 = 10.0;
pub const ITEM_DROP_RARITY_PERCENT: f64 = 20.0;
pub const RUNE_INSTEAD_OF_GEAR_CHANCE: f64 = 0.05;
pub const SPECIAL_DROP_LEVEL_GATE: u32 = 20;
pub const TREASURE_DROP_BONUS: f64 = 0.05;
pub const ELEMENTAL_DROP_CHANCE: f64 = 0.05;
pub const BOSS_PET_CAPTURE_CHANCE: f64 = 0.03;
pub const PET_CAPTURE_CHANCE: f64 = 0.05;

/// Gear drop slot weights: weapon, accessory, armor, glove, boot, helmet.
pub const GEAR_SLOT_WEIGHTS: [u32; 6] = [35, 25, 10, 10, 10, 10];

// Crafting
pub const FORGE_BASE_SUCCESS: f64 = 0.8;
pub const FORGE_STEP_PENALTY: f64 = 0.05;
pub const VOIDFORGE_SLOT_CHANCE: f64 = 0.25;
pub const VOIDFORGE_OVERWRITE_CHANCE: f64 = 0.50;
pub const VOIDFORGE_MIN_REFINEMENT: u32 = 5;
pub const IMBUE_CHANCE: f64 = 0.5;
pub const REFINE_ATTACK_CHANCE: f64 = 0.8;
pub const REFINE_DEFENCE_CHANCE: f64 = 0.5;
pub const REFINE_RARITY_CHANCE: f64 = 0.2;
pub const POTENTIAL_BASE_PERCENT: f64 = 75.0;
pub const POTENTIAL_STEP_PERCENT: f64 = 5.0;
pub const POTENTIAL_RUNE_BONUS: f64 = 25.0;

// Session
pub const DEFAULT_INTERACTION_TIMEOUT_SECS: u64 = 120;
pub const MIN_INTERACTION_TIMEOUT_SECS: u64 = 60;
pub const MAX_INTERACTION_TIMEOUT_SECS: u64 = 300;
pub const AUTO_SNAPSHOT_EVERY: u32 = 1;
pub const GIGA_SNAPSHOT_EVERY: u32 = 10;
pub const COMBAT_LOG_CAPACITY: usize = 10;
pub const MAX_TURNS_PER_BATCH: u32 = 10_000;

// Snapshot file format
pub const SNAPSHOT_MAGIC: u64 = 0x4752_494E_4453_5431; // "GRINDST1"
