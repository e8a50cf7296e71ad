//! Passive dispatch table.
//!
//! Each equipped passive registers once per trigger it reacts to. The engine
//! walks registrations for a trigger in slot order: armor, accessory,
//! weapon main, weapon pinnacle, weapon utmost, glove, boot, helmet.

use crate::items::{
    AccessoryPassive, ArmorPassive, BootPassive, GlovePassive, HelmetPassive, Loadout, NamedPassive,
    WeaponLine, WeaponPassive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookSlot {
    Armor,
    Accessory,
    WeaponMain,
    WeaponPinnacle,
    WeaponUtmost,
    Glove,
    Boot,
    Helmet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Start,
    PreDamage,
    OnHit,
    OnCrit,
    OnMiss,
    OnBlock,
    OnDodge,
    OnWardBreak,
    OnHeal,
    OnKill,
}

/// A registered passive with the level or tier it fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Armor(ArmorPassive),
    Accessory(AccessoryPassive, u32),
    Weapon(WeaponPassive),
    Glove(GlovePassive, u32),
    Boot(BootPassive, u32),
    Helmet(HelmetPassive, u32),
}

impl Effect {
    pub fn triggers(&self) -> &'static [Trigger] {
        use Trigger::*;
        match self {
            Effect::Armor(p) => match p {
                ArmorPassive::Invulnerable | ArmorPassive::Omnipotent => &[Start],
                ArmorPassive::MysticalMight => &[PreDamage],
                ArmorPassive::UnlimitedWealth | ArmorPassive::EverlastingBlessing => &[OnKill],
                // Read by the encounter roll, not in combat.
                ArmorPassive::TreasureHunter => &[],
            },
            Effect::Accessory(p, _) => match p {
                AccessoryPassive::Absorb => &[Start],
                AccessoryPassive::Obliterate | AccessoryPassive::LuckyStrikes => &[PreDamage],
                AccessoryPassive::Prosper | AccessoryPassive::InfiniteWisdom => &[OnKill],
            },
            Effect::Weapon(p) => match p.line {
                WeaponLine::Polished | WeaponLine::Sturdy => &[Start],
                WeaponLine::Burning
                | WeaponLine::Sparking
                | WeaponLine::Piercing
                | WeaponLine::Accurate
                | WeaponLine::Echo => &[PreDamage],
                WeaponLine::Poisonous => &[OnMiss],
                WeaponLine::Strengthened => &[OnHit],
            },
            Effect::Glove(p, _) => match p {
                GlovePassive::Instability | GlovePassive::Deftness | GlovePassive::Adroit => &[PreDamage],
                GlovePassive::WardTouched
                | GlovePassive::WardFused
                | GlovePassive::Equilibrium
                | GlovePassive::Plundering => &[OnHit],
            },
            Effect::Boot(p, _) => match p {
                BootPassive::Hearty => &[Start],
                BootPassive::Cleric => &[OnHeal],
                BootPassive::ThrillSeeker => &[OnKill],
                BootPassive::TreasureTracker => &[],
            },
            Effect::Helmet(p, _) => match p {
                HelmetPassive::Juggernaut => &[Start],
                HelmetPassive::Frenzy => &[PreDamage],
                HelmetPassive::Insight => &[OnCrit],
                HelmetPassive::Leeching => &[OnHit],
                HelmetPassive::Thorns => &[OnBlock],
                HelmetPassive::Ghosted => &[OnDodge],
                HelmetPassive::Volatile => &[OnWardBreak],
                HelmetPassive::Divine => &[OnHeal],
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Armor(p) => p.name(),
            Effect::Accessory(p, _) => p.name(),
            Effect::Weapon(p) => p.name(),
            Effect::Glove(p, _) => p.name(),
            Effect::Boot(p, _) => p.name(),
            Effect::Helmet(p, _) => p.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub slot: HookSlot,
    pub trigger: Trigger,
    pub effect: Effect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassiveTable {
    registrations: Vec<Registration>,
}

impl PassiveTable {
    pub fn build(loadout: &Loadout) -> Self {
        let mut slots: Vec<(HookSlot, Effect)> = Vec::new();

        if let Some(p) = loadout.armor.as_ref().and_then(|a| a.passive) {
            slots.push((HookSlot::Armor, Effect::Armor(p)));
        }
        if let Some(a) = &loadout.accessory {
            if let Some(p) = a.passive.filter(|_| a.passive_lvl > 0) {
                slots.push((HookSlot::Accessory, Effect::Accessory(p, a.passive_lvl)));
            }
        }
        if let Some(w) = &loadout.weapon {
            let weapon_slots = [
                (HookSlot::WeaponMain, w.passive),
                (HookSlot::WeaponPinnacle, w.pinnacle_passive),
                (HookSlot::WeaponUtmost, w.utmost_passive),
            ];
            for (slot, passive) in weapon_slots {
                let Some(p) = passive else { continue };
                // A line fires once, at its highest tier across the three slots.
                if w.line_tier(p.line) != Some(p.tier) {
                    continue;
                }
                let seen = slots
                    .iter()
                    .any(|(_, e)| matches!(e, Effect::Weapon(q) if q.line == p.line));
                if !seen {
                    slots.push((slot, Effect::Weapon(p)));
                }
            }
        }
        if let Some(g) = &loadout.glove {
            if let Some(p) = g.passive.filter(|_| g.passive_lvl > 0) {
                slots.push((HookSlot::Glove, Effect::Glove(p, g.passive_lvl)));
            }
        }
        if let Some(b) = &loadout.boot {
            if let Some(p) = b.passive.filter(|_| b.passive_lvl > 0) {
                slots.push((HookSlot::Boot, Effect::Boot(p, b.passive_lvl)));
            }
        }
        if let Some(h) = &loadout.helmet {
            if let Some(p) = h.passive.filter(|_| h.passive_lvl > 0) {
                slots.push((HookSlot::Helmet, Effect::Helmet(p, h.passive_lvl)));
            }
        }

        let registrations = slots
            .into_iter()
            .flat_map(|(slot, effect)| {
                effect
                    .triggers()
                    .iter()
                    .map(move |&trigger| Registration { slot, trigger, effect })
            })
            .collect();
        Self { registrations }
    }

    /// Effects registered for `trigger`, in slot order.
    pub fn fires(&self, trigger: Trigger) -> impl Iterator<Item = Effect> + '_ {
        self.registrations
            .iter()
            .filter(move |r| r.trigger == trigger)
            .map(|r| r.effect)
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }
}
