//! Multi-phase boss encounters: entry costs, phase tables, drop tables and epilogues.

use crate::character::{Currency, Player, Wallet};
use crate::core::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDescriptor {
    pub name: &'static str,
    /// Catalogue level of the phase template.
    pub level: u32,
    pub modifiers_count: usize,
    pub hp_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossEncounter {
    Aphrodite,
    Lucifer,
    Neet,
    Gemini,
}

const APHRODITE_PHASES: &[PhaseDescriptor] = &[
    PhaseDescriptor { name: "Aphrodite, Heaven's Envoy", level: 444, modifiers_count: 1, hp_multiplier: 1.0 },
    PhaseDescriptor { name: "Aphrodite, the Eternal", level: 444, modifiers_count: 2, hp_multiplier: 1.25 },
    PhaseDescriptor { name: "Aphrodite, Harbinger of Ruin", level: 444, modifiers_count: 3, hp_multiplier: 1.5 },
];

const LUCIFER_PHASES: &[PhaseDescriptor] = &[
    PhaseDescriptor { name: "Lucifer, Fallen", level: 666, modifiers_count: 2, hp_multiplier: 1.25 },
    PhaseDescriptor { name: "Lucifer, Maddened", level: 666, modifiers_count: 3, hp_multiplier: 1.5 },
    PhaseDescriptor { name: "Lucifer, Enraged", level: 666, modifiers_count: 4, hp_multiplier: 1.75 },
    PhaseDescriptor { name: "Lucifer, Unbound", level: 666, modifiers_count: 5, hp_multiplier: 2.0 },
];

const NEET_PHASES: &[PhaseDescriptor] = &[
    PhaseDescriptor { name: "NEET, the Shut-in", level: 777, modifiers_count: 3, hp_multiplier: 1.5 },
    PhaseDescriptor { name: "NEET, the Insomniac", level: 777, modifiers_count: 4, hp_multiplier: 1.75 },
    PhaseDescriptor { name: "NEET, Lord of the Void", level: 888, modifiers_count: 5, hp_multiplier: 2.0 },
];

const GEMINI_PHASES: &[PhaseDescriptor] = &[
    PhaseDescriptor { name: "Gemini, Castor", level: 555, modifiers_count: 2, hp_multiplier: 1.5 },
    PhaseDescriptor { name: "Gemini, Pollux", level: 555, modifiers_count: 3, hp_multiplier: 1.5 },
];

/// Fixed drop table rolled on final victory.
#[derive(Debug, Clone, Copy)]
pub struct BossDropTable {
    pub chances: &'static [(Currency, f64)],
    pub guaranteed: &'static [Currency],
}

impl BossEncounter {
    pub const ALL: [BossEncounter; 4] = [
        BossEncounter::Aphrodite,
        BossEncounter::Lucifer,
        BossEncounter::Neet,
        BossEncounter::Gemini,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BossEncounter::Aphrodite => "Aphrodite",
            BossEncounter::Lucifer => "Lucifer",
            BossEncounter::Neet => "NEET",
            BossEncounter::Gemini => "Gemini",
        }
    }

    pub fn phases(&self) -> &'static [PhaseDescriptor] {
        match self {
            BossEncounter::Aphrodite => APHRODITE_PHASES,
            BossEncounter::Lucifer => LUCIFER_PHASES,
            BossEncounter::Neet => NEET_PHASES,
            BossEncounter::Gemini => GEMINI_PHASES,
        }
    }

    pub fn phase(&self, index: usize) -> Option<&'static PhaseDescriptor> {
        self.phases().get(index)
    }

    pub fn entry_cost(&self) -> &'static [(Currency, u64)] {
        match self {
            BossEncounter::Aphrodite => &[(Currency::DragonKey, 1), (Currency::AngelKey, 1)],
            BossEncounter::Lucifer => &[
                (Currency::DragonKey, 1),
                (Currency::AngelKey, 1),
                (Currency::SoulCores, 5),
            ],
            BossEncounter::Neet => &[(Currency::VoidFrags, 5)],
            BossEncounter::Gemini => &[(Currency::BalanceFragment, 5)],
        }
    }

    pub fn can_afford(&self, wallet: &Wallet) -> Result<()> {
        self.entry_cost()
            .iter()
            .try_for_each(|(currency, amount)| wallet.require(*currency, *amount))
    }

    /// Deducts the entry cost, all or nothing.
    pub fn charge_entry(&self, wallet: &mut Wallet) -> Result<()> {
        self.can_afford(wallet)?;
        for (currency, amount) in self.entry_cost() {
            wallet.spend(*currency, *amount)?;
        }
        Ok(())
    }

    pub fn drop_table(&self) -> BossDropTable {
        match self {
            BossEncounter::Aphrodite => BossDropTable {
                chances: &[
                    (Currency::RefinementRunes, 0.33),
                    (Currency::PotentialRunes, 0.33),
                    (Currency::ImbueRunes, 0.33),
                ],
                guaranteed: &[Currency::Curios],
            },
            BossEncounter::Lucifer => BossDropTable {
                chances: &[(Currency::RefinementRunes, 0.66), (Currency::PotentialRunes, 0.33)],
                guaranteed: &[],
            },
            BossEncounter::Neet => BossDropTable {
                chances: &[(Currency::PotentialRunes, 0.66), (Currency::RefinementRunes, 0.33)],
                guaranteed: &[],
            },
            BossEncounter::Gemini => BossDropTable {
                chances: &[(Currency::PartnershipRunes, 0.5)],
                guaranteed: &[],
            },
        }
    }
}

/// Lucifer's parting gift: the player picks how the soul core reshapes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoulCoreChoice {
    /// +3 attack.
    Enraged,
    /// +3 defence.
    Solidified,
    /// +10 max HP.
    Vitalized,
    /// +5 attack at the cost of 2 defence.
    Unstable,
}

impl SoulCoreChoice {
    pub const ALL: [SoulCoreChoice; 4] = [
        SoulCoreChoice::Enraged,
        SoulCoreChoice::Solidified,
        SoulCoreChoice::Vitalized,
        SoulCoreChoice::Unstable,
    ];

    pub fn apply(&self, player: &mut Player) {
        match self {
            SoulCoreChoice::Enraged => player.attack += 3,
            SoulCoreChoice::Solidified => player.defence += 3,
            SoulCoreChoice::Vitalized => {
                player.max_hp += 10;
                player.current_hp += 10;
            }
            SoulCoreChoice::Unstable => {
                player.attack += 5;
                player.defence = player.defence.saturating_sub(2);
            }
        }
        player.clamp_hp();
    }
}

/// Post-reward epilogue owed by an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Epilogue {
    None,
    SoulCoreChoice,
    VoidKey,
}

impl BossEncounter {
    pub fn epilogue(&self) -> Epilogue {
        match self {
            BossEncounter::Lucifer => Epilogue::SoulCoreChoice,
            BossEncounter::Neet => Epilogue::VoidKey,
            BossEncounter::Aphrodite | BossEncounter::Gemini => Epilogue::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lucifer_phase_table() {
        let phases = BossEncounter::Lucifer.phases();
        let counts: Vec<_> = phases.iter().map(|p| p.modifiers_count).collect();
        let mults: Vec<_> = phases.iter().map(|p| p.hp_multiplier).collect();
        assert_eq!(counts, vec![2, 3, 4, 5]);
        assert_eq!(mults, vec![1.25, 1.5, 1.75, 2.0]);
    }

    #[test]
    fn test_phase_levels_in_boss_band() {
        for encounter in BossEncounter::ALL {
            for phase in encounter.phases() {
                assert!((444..=888).contains(&phase.level), "{}", phase.name);
            }
        }
    }

    #[test]
    fn test_charge_entry_is_all_or_nothing() {
        let mut wallet = Wallet::default();
        wallet.add(Currency::DragonKey, 2);
        wallet.add(Currency::AngelKey, 2);
        wallet.add(Currency::SoulCores, 4);
        assert!(BossEncounter::Lucifer.charge_entry(&mut wallet).is_err());
        assert_eq!(wallet.dragon_key, 2);
        assert_eq!(wallet.angel_key, 2);

        wallet.add(Currency::SoulCores, 1);
        BossEncounter::Lucifer.charge_entry(&mut wallet).unwrap();
        assert_eq!((wallet.dragon_key, wallet.angel_key, wallet.soul_cores), (1, 1, 0));
    }

    #[test]
    fn test_soul_core_choices_mutate_stats() {
        let mut p = Player::new(1, "A");
        let (atk, def, hp) = (p.attack, p.defence, p.max_hp);
        SoulCoreChoice::Enraged.apply(&mut p);
        assert_eq!(p.attack, atk + 3);
        SoulCoreChoice::Vitalized.apply(&mut p);
        assert_eq!(p.max_hp, hp + 10);
        SoulCoreChoice::Unstable.apply(&mut p);
        assert_eq!(p.attack, atk + 8);
        assert_eq!(p.defence, def - 2);
    }
}
