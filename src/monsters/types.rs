use super::bosses::BossEncounter;
use super::modifiers::Modifier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub species: String,
    /// Combat and reward level.
    pub level: u32,
    /// Catalogue row the name, image and flavor came from.
    pub template_level: u32,
    pub hp: u64,
    pub max_hp: u64,
    pub attack: u64,
    pub defence: u64,
    pub xp: u64,
    pub modifiers: Vec<Modifier>,
    pub flavor: String,
    pub image: String,
    pub is_boss: bool,
    pub is_treasure: bool,
}

impl Monster {
    /// A blank container at `level`, filled in by the generator.
    pub fn blank(level: u32) -> Self {
        Self {
            name: String::new(),
            species: String::new(),
            level,
            template_level: level,
            hp: 0,
            max_hp: 0,
            attack: 0,
            defence: 0,
            xp: 0,
            modifiers: Vec::new(),
            flavor: String::new(),
            image: String::new(),
            is_boss: false,
            is_treasure: false,
        }
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Dragons and demons count as fire-type for elemental drops.
    pub fn is_fire_type(&self) -> bool {
        ["dragon", "demon"]
            .iter()
            .any(|s| self.species.eq_ignore_ascii_case(s))
    }

    pub fn heal(&mut self, amount: u64) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Restores full HP, used between boss phases.
    pub fn regenerate(&mut self) {
        self.hp = self.max_hp;
    }
}

/// How the generator should build the next monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterMode {
    Normal,
    Treasure,
    BossPhase { encounter: BossEncounter, index: usize },
    Ascent { stage: u32 },
}
