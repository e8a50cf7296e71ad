//! Passive effects carried by equipment.
//!
//! Passives are persisted by display name (`"none"` when empty), so every set
//! round-trips through [`NamedPassive::name`] and [`NamedPassive::from_name`].

use crate::core::constants::WEAPON_LINE_STEP;
use serde::{Deserialize, Serialize};

pub const NO_PASSIVE: &str = "none";

/// A closed set of passives identified by a stable display name.
pub trait NamedPassive: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Display name of an optional passive.
pub fn passive_label<P: NamedPassive>(passive: Option<P>) -> &'static str {
    passive.map_or(NO_PASSIVE, |p| p.name())
}

/// Parses an optional passive, treating `"none"` and empty strings as absent.
pub fn parse_passive<P: NamedPassive>(name: &str) -> Option<Option<P>> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_PASSIVE) {
        return Some(None);
    }
    P::from_name(trimmed).map(Some)
}

// =========================================================================
// Weapon lines
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponLine {
    Burning,
    Poisonous,
    Polished,
    Sparking,
    Sturdy,
    Piercing,
    Strengthened,
    Accurate,
    Echo,
}

impl WeaponLine {
    pub const ALL: [WeaponLine; 9] = [
        WeaponLine::Burning,
        WeaponLine::Poisonous,
        WeaponLine::Polished,
        WeaponLine::Sparking,
        WeaponLine::Sturdy,
        WeaponLine::Piercing,
        WeaponLine::Strengthened,
        WeaponLine::Accurate,
        WeaponLine::Echo,
    ];

    /// Names of the five tiers, weakest first.
    pub fn chain(&self) -> [&'static str; 5] {
        match self {
            WeaponLine::Burning => ["burning", "flaming", "scorching", "incinerating", "carbonising"],
            WeaponLine::Poisonous => ["poisonous", "noxious", "venomous", "toxic", "lethal"],
            WeaponLine::Polished => ["polished", "honed", "gleaming", "tempered", "flaring"],
            WeaponLine::Sparking => ["sparking", "shocking", "discharging", "electrocuting", "vapourising"],
            WeaponLine::Sturdy => ["sturdy", "reinforced", "thickened", "impregnable", "impenetrable"],
            WeaponLine::Piercing => ["piercing", "keen", "incisive", "puncturing", "penetrating"],
            WeaponLine::Strengthened => ["strengthened", "forceful", "overwhelming", "devastating", "catastrophic"],
            WeaponLine::Accurate => ["accurate", "precise", "sharpshooter", "deadeye", "bullseye"],
            WeaponLine::Echo => ["echo", "echoo", "echooo", "echoooo", "echoes"],
        }
    }
}

/// A weapon passive: a line plus its tier (0 = base name, 4 = final name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponPassive {
    pub line: WeaponLine,
    pub tier: u8,
}

impl WeaponPassive {
    pub const MAX_TIER: u8 = 4;

    pub fn base(line: WeaponLine) -> Self {
        Self { line, tier: 0 }
    }

    pub fn name(&self) -> &'static str {
        self.line.chain()[self.tier.min(Self::MAX_TIER) as usize]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        WeaponLine::ALL.iter().find_map(|line| {
            line.chain()
                .iter()
                .position(|n| n.eq_ignore_ascii_case(name))
                .map(|tier| Self {
                    line: *line,
                    tier: tier as u8,
                })
        })
    }

    /// The next tier along the chain, or None at the final tier.
    pub fn advanced(&self) -> Option<Self> {
        (self.tier < Self::MAX_TIER).then(|| Self {
            line: self.line,
            tier: self.tier + 1,
        })
    }

    /// Fractional strength of the passive: 8% per tier step, starting at 8%.
    pub fn strength(&self) -> f64 {
        WEAPON_LINE_STEP * (self.tier as f64 + 1.0)
    }
}

pub fn weapon_passive_label(passive: Option<WeaponPassive>) -> &'static str {
    passive.map_or(NO_PASSIVE, |p| p.name())
}

pub fn parse_weapon_passive(name: &str) -> Option<Option<WeaponPassive>> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_PASSIVE) {
        return Some(None);
    }
    WeaponPassive::from_name(trimmed).map(Some)
}

// =========================================================================
// Slot passive sets
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorPassive {
    Invulnerable,
    MysticalMight,
    Omnipotent,
    TreasureHunter,
    UnlimitedWealth,
    EverlastingBlessing,
}

impl NamedPassive for ArmorPassive {
    const ALL: &'static [Self] = &[
        ArmorPassive::Invulnerable,
        ArmorPassive::MysticalMight,
        ArmorPassive::Omnipotent,
        ArmorPassive::TreasureHunter,
        ArmorPassive::UnlimitedWealth,
        ArmorPassive::EverlastingBlessing,
    ];

    fn name(&self) -> &'static str {
        match self {
            ArmorPassive::Invulnerable => "Invulnerable",
            ArmorPassive::MysticalMight => "Mystical Might",
            ArmorPassive::Omnipotent => "Omnipotent",
            ArmorPassive::TreasureHunter => "Treasure Hunter",
            ArmorPassive::UnlimitedWealth => "Unlimited Wealth",
            ArmorPassive::EverlastingBlessing => "Everlasting Blessing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessoryPassive {
    Obliterate,
    Absorb,
    Prosper,
    InfiniteWisdom,
    LuckyStrikes,
}

impl NamedPassive for AccessoryPassive {
    const ALL: &'static [Self] = &[
        AccessoryPassive::Obliterate,
        AccessoryPassive::Absorb,
        AccessoryPassive::Prosper,
        AccessoryPassive::InfiniteWisdom,
        AccessoryPassive::LuckyStrikes,
    ];

    fn name(&self) -> &'static str {
        match self {
            AccessoryPassive::Obliterate => "Obliterate",
            AccessoryPassive::Absorb => "Absorb",
            AccessoryPassive::Prosper => "Prosper",
            AccessoryPassive::InfiniteWisdom => "Infinite Wisdom",
            AccessoryPassive::LuckyStrikes => "Lucky Strikes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlovePassive {
    Instability,
    Deftness,
    Adroit,
    WardTouched,
    WardFused,
    Equilibrium,
    Plundering,
}

impl NamedPassive for GlovePassive {
    const ALL: &'static [Self] = &[
        GlovePassive::Instability,
        GlovePassive::Deftness,
        GlovePassive::Adroit,
        GlovePassive::WardTouched,
        GlovePassive::WardFused,
        GlovePassive::Equilibrium,
        GlovePassive::Plundering,
    ];

    fn name(&self) -> &'static str {
        match self {
            GlovePassive::Instability => "instability",
            GlovePassive::Deftness => "deftness",
            GlovePassive::Adroit => "adroit",
            GlovePassive::WardTouched => "ward-touched",
            GlovePassive::WardFused => "ward-fused",
            GlovePassive::Equilibrium => "equilibrium",
            GlovePassive::Plundering => "plundering",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BootPassive {
    Cleric,
    ThrillSeeker,
    TreasureTracker,
    Hearty,
}

impl NamedPassive for BootPassive {
    const ALL: &'static [Self] = &[
        BootPassive::Cleric,
        BootPassive::ThrillSeeker,
        BootPassive::TreasureTracker,
        BootPassive::Hearty,
    ];

    fn name(&self) -> &'static str {
        match self {
            BootPassive::Cleric => "cleric",
            BootPassive::ThrillSeeker => "thrill-seeker",
            BootPassive::TreasureTracker => "treasure-tracker",
            BootPassive::Hearty => "hearty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelmetPassive {
    Juggernaut,
    Frenzy,
    Insight,
    Leeching,
    Thorns,
    Ghosted,
    Volatile,
    Divine,
}

impl NamedPassive for HelmetPassive {
    const ALL: &'static [Self] = &[
        HelmetPassive::Juggernaut,
        HelmetPassive::Frenzy,
        HelmetPassive::Insight,
        HelmetPassive::Leeching,
        HelmetPassive::Thorns,
        HelmetPassive::Ghosted,
        HelmetPassive::Volatile,
        HelmetPassive::Divine,
    ];

    fn name(&self) -> &'static str {
        match self {
            HelmetPassive::Juggernaut => "juggernaut",
            HelmetPassive::Frenzy => "frenzy",
            HelmetPassive::Insight => "insight",
            HelmetPassive::Leeching => "leeching",
            HelmetPassive::Thorns => "thorns",
            HelmetPassive::Ghosted => "ghosted",
            HelmetPassive::Volatile => "volatile",
            HelmetPassive::Divine => "divine",
        }
    }
}
