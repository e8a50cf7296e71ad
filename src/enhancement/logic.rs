//! Crafting operations that mutate gear.
//!
//! Every operation validates all preconditions, then charges its cost, then
//! rolls. The `apply_*` functions hold the post-roll mutation on their own so
//! callers (and tests) can resolve an attempt with a known outcome.

use super::costs::{
    forge_cost, forge_success_rate, potential_cost, potential_success_percent, refine_cost,
    temper_cost, MaterialCost,
};
use crate::character::{Currency, SkillData, Wallet};
use crate::core::constants::{
    IMBUE_CHANCE, REFINE_ATTACK_CHANCE, REFINE_DEFENCE_CHANCE, REFINE_RARITY_CHANCE,
    VOIDFORGE_MIN_REFINEMENT, VOIDFORGE_OVERWRITE_CHANCE, VOIDFORGE_SLOT_CHANCE,
};
use crate::core::rng::{chance, randint};
use crate::core::{GameError, Result};
use crate::items::{
    AccessoryPassive, Armor, ArmorPassive, BootPassive, Equipment, EquipmentSlot, GlovePassive,
    HelmetPassive, NamedPassive, Weapon, WeaponLine, WeaponPassive,
};
use rand::Rng;
use tracing::info;

fn random_passive<P: NamedPassive>(rng: &mut impl Rng) -> P {
    P::ALL[rng.gen_range(0..P::ALL.len())]
}

fn charge_materials(skills: &mut SkillData, wallet: &mut Wallet, cost: &MaterialCost) -> Result<()> {
    skills.require_set(cost.resource_step, cost.ore, cost.log, cost.bone)?;
    wallet.require_gold(cost.gold)?;
    skills.spend_set(cost.resource_step, cost.ore, cost.log, cost.bone)?;
    wallet.spend_gold(cost.gold)
}

// =========================================================================
// Forge
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ForgeOutcome {
    pub success: bool,
    pub success_rate: f64,
    /// Main passive after the attempt.
    pub passive: Option<WeaponPassive>,
    pub cost: Option<MaterialCost>,
}

pub fn forge<R: Rng>(
    weapon: &mut Weapon,
    skills: &mut SkillData,
    wallet: &mut Wallet,
    rng: &mut R,
) -> Result<ForgeOutcome> {
    let cost = forge_cost(weapon.level, weapon.forges_remaining)
        .ok_or(GameError::NoAttemptsRemaining("forge"))?;
    if weapon.passive.is_some_and(|p| p.advanced().is_none()) {
        return Err(GameError::PassiveMaxed);
    }
    charge_materials(skills, wallet, &cost)?;

    let rate = forge_success_rate(weapon.level, weapon.forges_remaining);
    let success = chance(rng, rate);
    let mut outcome = apply_forge(weapon, success, rng);
    outcome.success_rate = rate;
    outcome.cost = Some(cost);
    info!(
        weapon = weapon.id,
        success,
        passive = crate::items::weapon_passive_label(weapon.passive),
        remaining = weapon.forges_remaining,
        "forge"
    );
    Ok(outcome)
}

/// Resolves a forge attempt: decrements the counter and on success draws or
/// advances the main passive.
pub fn apply_forge(weapon: &mut Weapon, success: bool, rng: &mut impl Rng) -> ForgeOutcome {
    weapon.forges_remaining = weapon.forges_remaining.saturating_sub(1);
    if success {
        weapon.passive = match weapon.passive {
            None => Some(WeaponPassive::base(
                WeaponLine::ALL[rng.gen_range(0..WeaponLine::ALL.len())],
            )),
            Some(p) => Some(p.advanced().unwrap_or(p)),
        };
    }
    ForgeOutcome {
        success,
        success_rate: if success { 1.0 } else { 0.0 },
        passive: weapon.passive,
        cost: None,
    }
}

// =========================================================================
// Refine
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineOutcome {
    pub attack_gain: u32,
    pub defence_gain: u32,
    pub rarity_gain: u32,
    pub gold_spent: u64,
}

pub fn refine<R: Rng>(weapon: &mut Weapon, wallet: &mut Wallet, rng: &mut R) -> Result<RefineOutcome> {
    let gold = refine_cost(weapon.level, weapon.refines_remaining)
        .ok_or(GameError::NoAttemptsRemaining("refine"))?;
    wallet.spend_gold(gold)?;
    let mut outcome = apply_refine(weapon, rng);
    outcome.gold_spent = gold;
    info!(
        weapon = weapon.id,
        attack = outcome.attack_gain,
        defence = outcome.defence_gain,
        rarity = outcome.rarity_gain,
        "refine"
    );
    Ok(outcome)
}

/// Three independent stat rolls, then the counters move.
pub fn apply_refine(weapon: &mut Weapon, rng: &mut impl Rng) -> RefineOutcome {
    let hi = u64::from(weapon.level / 10 + 2);
    let mut roll_gain = |p: f64, fallback: u32| {
        if chance(rng, p) {
            randint(rng, 2, hi) as u32
        } else {
            fallback
        }
    };
    let attack_gain = roll_gain(REFINE_ATTACK_CHANCE, 1);
    let defence_gain = roll_gain(REFINE_DEFENCE_CHANCE, 1);
    let rarity_gain = roll_gain(REFINE_RARITY_CHANCE, 0);
    weapon.attack += attack_gain;
    weapon.defence += defence_gain;
    weapon.rarity += rarity_gain;
    weapon.refines_remaining = weapon.refines_remaining.saturating_sub(1);
    weapon.refinement_lvl += 1;
    RefineOutcome {
        attack_gain,
        defence_gain,
        rarity_gain,
        gold_spent: 0,
    }
}

/// Consumes a Rune of Refinement to restore one refine attempt on a spent weapon.
pub fn restore_refine_attempt(weapon: &mut Weapon, wallet: &mut Wallet) -> Result<()> {
    if weapon.refines_remaining > 0 {
        return Err(GameError::InvalidAction(
            "refines remain; a rune only restores a spent weapon".to_string(),
        ));
    }
    wallet.spend(Currency::RefinementRunes, 1)?;
    weapon.refines_remaining = 1;
    Ok(())
}

// =========================================================================
// Voidforge
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidforgeOutcome {
    Pinnacle(WeaponPassive),
    Utmost(WeaponPassive),
    MainOverwritten {
        previous: Option<WeaponPassive>,
        passive: WeaponPassive,
    },
    Failed,
}

/// Checks a sacrifice against a target without changing either.
pub fn check_voidforge(target: &Weapon, sacrifice: &Weapon) -> Result<WeaponPassive> {
    if target.id == sacrifice.id {
        return Err(GameError::InvalidTarget("a weapon cannot consume itself".to_string()));
    }
    if target.user_id != sacrifice.user_id {
        return Err(GameError::NotOwned(sacrifice.id));
    }
    if sacrifice.is_equipped {
        return Err(GameError::ItemEquipped(sacrifice.id));
    }
    if sacrifice.refinement_lvl < VOIDFORGE_MIN_REFINEMENT {
        return Err(GameError::Ineligible(format!(
            "sacrifice needs refinement level {VOIDFORGE_MIN_REFINEMENT}"
        )));
    }
    if sacrifice.forges_remaining != 0 {
        return Err(GameError::Ineligible("sacrifice still has forges remaining".to_string()));
    }
    sacrifice
        .passive
        .ok_or_else(|| GameError::Ineligible("sacrifice has no passive".to_string()))
}

/// Spends a Void Key and rolls. The caller destroys the sacrifice whatever the outcome.
pub fn voidforge<R: Rng>(
    target: &mut Weapon,
    sacrifice: &Weapon,
    wallet: &mut Wallet,
    rng: &mut R,
) -> Result<VoidforgeOutcome> {
    let passive = check_voidforge(target, sacrifice)?;
    wallet.spend(Currency::VoidKeys, 1)?;
    let outcome = apply_voidforge(target, passive, rng.gen::<f64>());
    info!(target = target.id, sacrifice = sacrifice.id, ?outcome, "voidforge");
    Ok(outcome)
}

pub fn apply_voidforge(target: &mut Weapon, passive: WeaponPassive, roll: f64) -> VoidforgeOutcome {
    if roll < VOIDFORGE_SLOT_CHANCE {
        if target.pinnacle_passive.is_none() {
            target.pinnacle_passive = Some(passive);
            return VoidforgeOutcome::Pinnacle(passive);
        }
        if target.utmost_passive.is_none() {
            target.utmost_passive = Some(passive);
            return VoidforgeOutcome::Utmost(passive);
        }
    }
    if roll < VOIDFORGE_OVERWRITE_CHANCE {
        let previous = target.passive.replace(passive);
        return VoidforgeOutcome::MainOverwritten { previous, passive };
    }
    VoidforgeOutcome::Failed
}

// =========================================================================
// Temper / Imbue
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperStat {
    Block,
    Evasion,
    Ward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperOutcome {
    pub success: bool,
    pub stat: TemperStat,
    pub amount: u32,
}

/// The stat temper improves: first nonzero of block, evasion, ward; ward when all are zero.
pub fn temper_target(armor: &Armor) -> TemperStat {
    if armor.block > 0 {
        TemperStat::Block
    } else if armor.evasion > 0 {
        TemperStat::Evasion
    } else {
        TemperStat::Ward
    }
}

pub fn temper<R: Rng>(
    armor: &mut Armor,
    skills: &mut SkillData,
    wallet: &mut Wallet,
    rng: &mut R,
) -> Result<TemperOutcome> {
    let cost = temper_cost(armor.level, armor.temper_remaining)
        .ok_or(GameError::NoAttemptsRemaining("temper"))?;
    charge_materials(skills, wallet, &cost)?;
    let success = chance(rng, forge_success_rate(armor.level, armor.temper_remaining));
    let outcome = apply_temper(armor, success, rng);
    info!(armor = armor.id, success, amount = outcome.amount, "temper");
    Ok(outcome)
}

pub fn apply_temper(armor: &mut Armor, success: bool, rng: &mut impl Rng) -> TemperOutcome {
    armor.temper_remaining = armor.temper_remaining.saturating_sub(1);
    let stat = temper_target(armor);
    if !success {
        return TemperOutcome { success, stat, amount: 0 };
    }
    let amount = randint(rng, u64::from(armor.level / 7), u64::from(armor.level / 5)) as u32;
    match stat {
        TemperStat::Block => armor.block += amount,
        TemperStat::Evasion => armor.evasion += amount,
        TemperStat::Ward => armor.ward += amount,
    }
    TemperOutcome { success, stat, amount }
}

pub fn imbue<R: Rng>(armor: &mut Armor, wallet: &mut Wallet, rng: &mut R) -> Result<Option<ArmorPassive>> {
    if armor.passive.is_some() {
        return Err(GameError::Ineligible("armor already has a passive".to_string()));
    }
    if armor.imbue_remaining == 0 {
        return Err(GameError::NoAttemptsRemaining("imbue"));
    }
    wallet.spend(Currency::ImbueRunes, 1)?;
    let success = chance(rng, IMBUE_CHANCE);
    let passive = apply_imbue(armor, success, rng);
    info!(armor = armor.id, success, "imbue");
    Ok(passive)
}

pub fn apply_imbue(armor: &mut Armor, success: bool, rng: &mut impl Rng) -> Option<ArmorPassive> {
    armor.imbue_remaining = 0;
    if success {
        armor.passive = Some(random_passive(rng));
    }
    armor.passive
}

// =========================================================================
// Potential
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotentialOutcome {
    pub success: bool,
    pub success_percent: f64,
    pub passive_lvl: u32,
    pub rune_used: bool,
    pub gold_spent: u64,
}

/// (passive_lvl, potential_remaining) for slots that support Potential.
fn potential_state(item: &Equipment) -> Option<(u32, u32)> {
    match item {
        Equipment::Accessory(a) => Some((a.passive_lvl, a.potential_remaining)),
        Equipment::Glove(g) => Some((g.passive_lvl, g.potential_remaining)),
        Equipment::Boot(b) => Some((b.passive_lvl, b.potential_remaining)),
        Equipment::Helmet(h) => Some((h.passive_lvl, h.potential_remaining)),
        Equipment::Weapon(_) | Equipment::Armor(_) => None,
    }
}

pub fn potential<R: Rng>(
    item: &mut Equipment,
    wallet: &mut Wallet,
    use_rune: bool,
    rng: &mut R,
) -> Result<PotentialOutcome> {
    let slot = item.slot();
    let (passive_lvl, remaining) = potential_state(item).ok_or_else(|| {
        GameError::InvalidTarget(format!("{} has no potential", slot.name()))
    })?;
    let cap = slot.passive_cap().unwrap_or(0);
    if passive_lvl >= cap {
        return Err(GameError::PassiveMaxed);
    }
    if remaining == 0 {
        return Err(GameError::NoAttemptsRemaining("potential"));
    }
    if use_rune && slot != EquipmentSlot::Accessory {
        return Err(GameError::InvalidAction(
            "runes of potential only work on accessories".to_string(),
        ));
    }
    let gold = potential_cost(slot, passive_lvl).ok_or(GameError::PassiveMaxed)?;
    wallet.require_gold(gold)?;
    if use_rune {
        wallet.spend(Currency::PotentialRunes, 1)?;
    }
    wallet.spend_gold(gold)?;

    let percent = potential_success_percent(slot, passive_lvl, use_rune);
    let success = chance(rng, percent / 100.0);
    let mut outcome = apply_potential(item, success, rng);
    outcome.success_percent = percent;
    outcome.rune_used = use_rune;
    outcome.gold_spent = gold;
    info!(item = item.id(), slot = slot.name(), success, level = outcome.passive_lvl, "potential");
    Ok(outcome)
}

/// Decrements `potential_remaining`; on success unlocks a random passive at
/// level 1 or raises the existing one, never past the slot cap.
pub fn apply_potential(item: &mut Equipment, success: bool, rng: &mut impl Rng) -> PotentialOutcome {
    let cap = item.slot().passive_cap().unwrap_or(0);
    macro_rules! resolve {
        ($i:ident, $passive:ty) => {{
            $i.potential_remaining = $i.potential_remaining.saturating_sub(1);
            if success && $i.passive_lvl < cap {
                if $i.passive.is_none() {
                    $i.passive = Some(random_passive::<$passive>(rng));
                    $i.passive_lvl = 1;
                } else {
                    $i.passive_lvl += 1;
                }
            }
            $i.passive_lvl
        }};
    }
    let passive_lvl = match item {
        Equipment::Accessory(a) => resolve!(a, AccessoryPassive),
        Equipment::Glove(g) => resolve!(g, GlovePassive),
        Equipment::Boot(b) => resolve!(b, BootPassive),
        Equipment::Helmet(h) => resolve!(h, HelmetPassive),
        Equipment::Weapon(_) | Equipment::Armor(_) => 0,
    };
    PotentialOutcome {
        success,
        success_percent: 0.0,
        passive_lvl,
        rune_used: false,
        gold_spent: 0,
    }
}

// =========================================================================
// Shatter
// =========================================================================

/// Spends a Shatter Rune on an unequipped weapon and refunds half its
/// refinement levels as Runes of Refinement. The caller destroys the weapon.
pub fn shatter(weapon: &Weapon, wallet: &mut Wallet) -> Result<u64> {
    if weapon.is_equipped {
        return Err(GameError::ItemEquipped(weapon.id));
    }
    wallet.spend(Currency::ShatterRunes, 1)?;
    let refund = u64::from(weapon.refinement_lvl / 2);
    wallet.add(Currency::RefinementRunes, refund);
    info!(weapon = weapon.id, refund, "shatter");
    Ok(refund)
}
