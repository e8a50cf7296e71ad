//! Monster modifiers and their descriptor table.
//!
//! Each modifier carries a static descriptor naming its pool, the pipeline
//! point it fires at and the modifiers it cannot appear alongside. Conflicts
//! are treated symmetrically: listing one side is enough.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    // Normal pool
    SteelBorn,
    Mighty,
    Glutton,
    BuiltDifferent,
    Ascended,
    ShieldBreaker,
    Impenetrable,
    Enfeeble,
    Suffocator,
    Dodgy,
    Titanium,
    Multistrike,
    Summoner,
    Executioner,
    TimeLord,
    Vampiric,
    Unblockable,
    Unavoidable,
    Prescient,
    AllSeeing,
    Venomous,
    Hellborn,
    HellsFury,
    MirrorImage,
    Penetrator,
    Clobberer,
    Smothering,
    ShieldsUp,
    LuciferTouched,
    Regenerating,
    Savage,
    Blighted,
    // Boss pool
    Absolute,
    CelestialWatcher,
    UnlimitedBladeWorks,
    InfernalLegion,
    VoidAura,
    Unbreakable,
    Omniscient,
    SoulEater,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pool {
    Normal,
    Boss,
}

/// Pipeline point where a modifier's effect is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Generation,
    StartOfCombat,
    PlayerTurn,
    MonsterTurn,
    Mitigation,
    PlayerHeal,
}

#[derive(Debug, Clone, Copy)]
pub struct ModifierDescriptor {
    pub modifier: Modifier,
    pub name: &'static str,
    pub pool: Pool,
    pub phase: Phase,
    pub conflicts_with: &'static [Modifier],
    pub description: &'static str,
}

use Modifier as M;

macro_rules! descriptor {
    ($m:ident, $name:literal, $pool:ident, $phase:ident, [$($c:ident),*], $desc:literal) => {
        ModifierDescriptor {
            modifier: M::$m,
            name: $name,
            pool: Pool::$pool,
            phase: Phase::$phase,
            conflicts_with: &[$(M::$c),*],
            description: $desc,
        }
    };
}

pub static DESCRIPTORS: [ModifierDescriptor; 40] = [
    descriptor!(SteelBorn, "Steel-born", Normal, Generation, [], "Defence increased by 10%."),
    descriptor!(Mighty, "Mighty", Normal, Generation, [], "Attack increased by 10%."),
    descriptor!(Glutton, "Glutton", Normal, Generation, [], "Double HP."),
    descriptor!(BuiltDifferent, "Built-different", Normal, Generation, [], "Two levels higher than it looks."),
    descriptor!(Ascended, "Ascended", Normal, Generation, [Absolute], "+10 attack and defence."),
    descriptor!(ShieldBreaker, "Shield-breaker", Normal, StartOfCombat, [], "Your ward is shattered at the start of combat."),
    descriptor!(Impenetrable, "Impenetrable", Normal, StartOfCombat, [], "Cannot be critically hit."),
    descriptor!(Enfeeble, "Enfeeble", Normal, StartOfCombat, [], "Your attack is reduced by 10%."),
    descriptor!(Suffocator, "Suffocator", Normal, PlayerTurn, [], "20% chance your hit roll is unlucky."),
    descriptor!(Dodgy, "Dodgy", Normal, PlayerTurn, [], "Your accuracy is reduced by 10."),
    descriptor!(Titanium, "Titanium", Normal, PlayerTurn, [], "Takes 10% less damage."),
    descriptor!(Multistrike, "Multistrike", Normal, MonsterTurn, [], "May strike a second time for half damage."),
    descriptor!(Summoner, "Summoner", Normal, MonsterTurn, [InfernalLegion], "Minions add a third of its damage."),
    descriptor!(Executioner, "Executioner", Normal, MonsterTurn, [], "1% chance to deal 90% of your current HP."),
    descriptor!(TimeLord, "Time Lord", Normal, PlayerTurn, [], "80% chance to survive a lethal hit at 1 HP."),
    descriptor!(Vampiric, "Vampiric", Normal, MonsterTurn, [SoulEater], "Heals ten times the damage it deals."),
    descriptor!(Unblockable, "Unblockable", Normal, MonsterTurn, [], "Attacks cannot be blocked."),
    descriptor!(Unavoidable, "Unavoidable", Normal, MonsterTurn, [], "Attacks cannot be dodged."),
    descriptor!(Prescient, "Prescient", Normal, PlayerTurn, [Omniscient], "Accuracy -5; its hit chance is raised by 10%."),
    descriptor!(AllSeeing, "All-seeing", Normal, PlayerTurn, [CelestialWatcher, Omniscient], "Accuracy -10; its hit chance +0.1."),
    descriptor!(Venomous, "Venomous", Normal, MonsterTurn, [CelestialWatcher], "Misses still deal 1 damage."),
    descriptor!(Hellborn, "Hellborn", Normal, MonsterTurn, [], "+2 damage per hit."),
    descriptor!(HellsFury, "Hell's Fury", Normal, MonsterTurn, [], "+5 damage per hit."),
    descriptor!(MirrorImage, "Mirror Image", Normal, MonsterTurn, [UnlimitedBladeWorks], "20% chance to deal double damage."),
    descriptor!(Penetrator, "Penetrator", Normal, Mitigation, [], "Ignores 20% of your percent reduction."),
    descriptor!(Clobberer, "Clobberer", Normal, Mitigation, [], "Ignores 5 of your flat reduction."),
    descriptor!(Smothering, "Smothering", Normal, PlayerTurn, [], "Your critical hits deal 20% less damage."),
    descriptor!(ShieldsUp, "Shields-up", Normal, PlayerTurn, [], "10% chance to nullify your attack."),
    descriptor!(LuciferTouched, "Lucifer-touched", Normal, MonsterTurn, [], "Its hit roll is lucky."),
    descriptor!(Regenerating, "Regenerating", Normal, MonsterTurn, [], "Heals 2% of max HP after attacking."),
    descriptor!(Savage, "Savage", Normal, MonsterTurn, [], "Deals 10% more damage."),
    descriptor!(Blighted, "Blighted", Normal, PlayerHeal, [], "Your heals are halved."),
    descriptor!(Absolute, "Absolute", Boss, Generation, [Ascended], "+25 attack and defence."),
    descriptor!(CelestialWatcher, "Celestial Watcher", Boss, MonsterTurn, [], "Never misses and deals 20% more damage."),
    descriptor!(UnlimitedBladeWorks, "Unlimited Blade Works", Boss, MonsterTurn, [], "Double damage."),
    descriptor!(InfernalLegion, "Infernal Legion", Boss, MonsterTurn, [], "Minions echo its full damage."),
    descriptor!(VoidAura, "Void Aura", Boss, StartOfCombat, [ShieldBreaker], "Your ward starts at zero and grows at half speed."),
    descriptor!(Unbreakable, "Unbreakable", Boss, StartOfCombat, [Impenetrable, Titanium], "Cannot be critically hit; takes 20% less damage."),
    descriptor!(Omniscient, "Omniscient", Boss, PlayerTurn, [], "Your accuracy is reduced by 20."),
    descriptor!(SoulEater, "Soul-eater", Boss, MonsterTurn, [], "Heals twenty times the damage it deals."),
];

impl Modifier {
    pub fn descriptor(&self) -> &'static ModifierDescriptor {
        // DESCRIPTORS is declared in variant order.
        &DESCRIPTORS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn pool(&self) -> Pool {
        self.descriptor().pool
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        DESCRIPTORS
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.modifier)
    }

    pub fn conflicts_with(&self, other: Modifier) -> bool {
        self.descriptor().conflicts_with.contains(&other)
            || other.descriptor().conflicts_with.contains(self)
    }
}

pub fn normal_pool() -> Vec<Modifier> {
    DESCRIPTORS
        .iter()
        .filter(|d| d.pool == Pool::Normal)
        .map(|d| d.modifier)
        .collect()
}

pub fn boss_pool() -> Vec<Modifier> {
    DESCRIPTORS
        .iter()
        .filter(|d| d.pool == Pool::Boss)
        .map(|d| d.modifier)
        .collect()
}

/// Removes one modifier at random from `pool` and every entry that conflicts with it.
pub fn draw_from(pool: &mut Vec<Modifier>, rng: &mut impl Rng) -> Option<Modifier> {
    if pool.is_empty() {
        return None;
    }
    let picked = pool.swap_remove(rng.gen_range(0..pool.len()));
    pool.retain(|m| !picked.conflicts_with(*m));
    Some(picked)
}

/// Draws up to `count` distinct, mutually compatible modifiers.
pub fn draw_many(mut pool: Vec<Modifier>, count: usize, rng: &mut impl Rng) -> Vec<Modifier> {
    let mut drawn = Vec::with_capacity(count);
    while drawn.len() < count {
        match draw_from(&mut pool, rng) {
            Some(m) => drawn.push(m),
            None => break,
        }
    }
    drawn
}
