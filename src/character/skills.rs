//! Gathering ledgers: per-user resource counts from mining, woodcutting and fishing.
//!
//! Each ledger holds five resources in ascending quality. Crafting costs name
//! a quality step and draw the matching resource from each ledger.

use crate::core::{GameError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Mining,
    Woodcutting,
    Fishing,
}

impl Skill {
    pub const ALL: [Skill; 3] = [Skill::Mining, Skill::Woodcutting, Skill::Fishing];

    pub fn table_name(&self) -> &'static str {
        match self {
            Skill::Mining => "mining",
            Skill::Woodcutting => "woodcutting",
            Skill::Fishing => "fishing",
        }
    }

    /// Resource names, lowest quality first.
    pub fn resources(&self) -> [&'static str; 5] {
        match self {
            Skill::Mining => ["iron", "coal", "gold", "platinum", "idea"],
            Skill::Woodcutting => ["oak", "willow", "mahogany", "magic", "idea"],
            Skill::Fishing => ["desiccated", "regular", "sturdy", "reinforced", "titanium"],
        }
    }

    pub fn resource_index(&self, name: &str) -> Option<usize> {
        self.resources()
            .iter()
            .position(|r| r.eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLedger {
    pub skill: Skill,
    pub tool_tier: String,
    pub quantities: [u64; 5],
}

impl SkillLedger {
    pub fn new(skill: Skill) -> Self {
        Self {
            skill,
            tool_tier: "basic".to_string(),
            quantities: [0; 5],
        }
    }

    pub fn get(&self, index: usize) -> u64 {
        self.quantities.get(index).copied().unwrap_or(0)
    }

    pub fn add(&mut self, index: usize, amount: u64) {
        if let Some(q) = self.quantities.get_mut(index) {
            *q = q.saturating_add(amount);
        }
    }

    pub fn require(&self, index: usize, amount: u64) -> Result<()> {
        let have = self.get(index);
        if have < amount {
            let resource = self.skill.resources().get(index).copied().unwrap_or("unknown");
            return Err(GameError::InsufficientMaterials {
                resource: resource.to_string(),
                needed: amount,
                have,
            });
        }
        Ok(())
    }

    pub fn spend(&mut self, index: usize, amount: u64) -> Result<()> {
        self.require(index, amount)?;
        self.quantities[index] -= amount;
        Ok(())
    }
}

/// All three ledgers for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillData {
    pub user_id: u64,
    pub mining: SkillLedger,
    pub woodcutting: SkillLedger,
    pub fishing: SkillLedger,
}

impl SkillData {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            mining: SkillLedger::new(Skill::Mining),
            woodcutting: SkillLedger::new(Skill::Woodcutting),
            fishing: SkillLedger::new(Skill::Fishing),
        }
    }

    pub fn ledger(&self, skill: Skill) -> &SkillLedger {
        match skill {
            Skill::Mining => &self.mining,
            Skill::Woodcutting => &self.woodcutting,
            Skill::Fishing => &self.fishing,
        }
    }

    pub fn ledger_mut(&mut self, skill: Skill) -> &mut SkillLedger {
        match skill {
            Skill::Mining => &mut self.mining,
            Skill::Woodcutting => &mut self.woodcutting,
            Skill::Fishing => &mut self.fishing,
        }
    }

    /// Checks ore, log and bone at quality `step` without spending.
    pub fn require_set(&self, step: usize, ore: u64, log: u64, bone: u64) -> Result<()> {
        self.mining.require(step, ore)?;
        self.woodcutting.require(step, log)?;
        self.fishing.require(step, bone)
    }

    pub fn spend_set(&mut self, step: usize, ore: u64, log: u64, bone: u64) -> Result<()> {
        self.require_set(step, ore, log, bone)?;
        self.mining.spend(step, ore)?;
        self.woodcutting.spend(step, log)?;
        self.fishing.spend(step, bone)
    }
}
