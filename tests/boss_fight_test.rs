//! Integration test: boss chains from the door to the epilogue.

use grindstone::character::{Currency, Player};
use grindstone::combat::{Action, BossFight, BossStatus, BossStep, Outcome, SessionSettings};
use grindstone::core::GameError;
use grindstone::monsters::{BossEncounter, SoulCoreChoice};
use grindstone::store::{MemoryStore, UserRepository};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn champion() -> Player {
    let mut p = Player::new(21, "Thane");
    p.level = 60;
    p.attack = 900;
    p.defence = 400;
    p.max_hp = 5_000;
    p.current_hp = 5_000;
    for (currency, amount) in [
        (Currency::DragonKey, 2),
        (Currency::AngelKey, 2),
        (Currency::SoulCores, 10),
        (Currency::VoidFrags, 10),
        (Currency::BalanceFragment, 10),
    ] {
        p.wallet.add(currency, amount);
    }
    p
}

/// Drops the current phase to one hit from death.
fn finish_phase(fight: &mut BossFight) {
    let session = fight.session_mut().expect("phase in progress");
    session.monster.modifiers.clear();
    session.monster.hp = 1;
}

#[test]
fn test_every_boss_chain_completes() {
    for boss in BossEncounter::ALL {
        let mut player = champion();
        let mut rng = StepRng::new(0, 0);
        let mut fight = BossFight::new(boss, SessionSettings::default());
        fight.accept_door(&mut player, &mut rng).unwrap();

        let mut cleared = 0;
        let rewards = loop {
            finish_phase(&mut fight);
            match fight.act(&mut player, Action::Attack, |_| 0, &mut rng).unwrap() {
                BossStep::PhaseCleared { next_phase, snapshot } => {
                    cleared += 1;
                    assert_eq!(next_phase, cleared);
                    assert_eq!(snapshot.monster_name, boss.phases()[next_phase].name);
                }
                BossStep::Victory(rewards) => break rewards,
                other => panic!("{}: unexpected {other:?}", boss.name()),
            }
        };
        assert_eq!(cleared + 1, boss.phases().len(), "{}", boss.name());
        for currency in boss.drop_table().guaranteed {
            assert!(rewards.currencies.iter().any(|(c, _)| c == currency));
        }
        assert!(matches!(fight.status(), BossStatus::Won | BossStatus::AwaitingEpilogue));
    }
}

#[test]
fn test_entry_cost_is_all_or_nothing() {
    let mut player = champion();
    player.wallet.soul_cores = 4;
    let mut fight = BossFight::new(BossEncounter::Lucifer, SessionSettings::default());
    assert!(matches!(
        fight.accept_door(&mut player, &mut StepRng::new(0, 0)),
        Err(GameError::InsufficientCurrency(_))
    ));
    assert_eq!(player.wallet.dragon_key, 2);
    assert_eq!(player.wallet.angel_key, 2);
    assert_eq!(player.wallet.soul_cores, 4);
}

#[test]
fn test_lucifer_epilogue_persists() {
    let mut store = MemoryStore::new();
    store.register(&champion()).unwrap();
    let mut player = store.get(21).unwrap();
    let mut rng = StepRng::new(0, 0);
    let mut fight = BossFight::new(BossEncounter::Lucifer, SessionSettings::default());
    fight.accept_door(&mut player, &mut rng).unwrap();
    while fight.status() != BossStatus::AwaitingEpilogue {
        finish_phase(&mut fight);
        fight.act(&mut player, Action::Attack, |_| 0, &mut rng).unwrap();
    }
    let defence = player.defence;
    fight.resolve_epilogue(&mut player, SoulCoreChoice::Solidified).unwrap();
    store.update_from_player_object(&player).unwrap();

    let back = store.get(21).unwrap();
    assert_eq!(back.defence, defence + 3);
    assert_eq!(back.wallet, player.wallet);
    assert!(back.wallet.refinement_runes >= 1);
}

#[test]
fn test_real_fight_ends_in_a_known_state() {
    for seed in 0..5 {
        let mut player = champion();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut fight = BossFight::new(BossEncounter::Gemini, SessionSettings::default());
        fight.accept_door(&mut player, &mut rng).unwrap();
        let mut steps = 0;
        loop {
            steps += 1;
            assert!(steps < 10_000, "seed {seed} never finished");
            match fight.act(&mut player, Action::GigaAuto, |_| 0, &mut rng).unwrap() {
                BossStep::Continue(_) | BossStep::PhaseCleared { .. } => {}
                BossStep::Victory(_) => {
                    assert_eq!(fight.status(), BossStatus::Won);
                    break;
                }
                BossStep::Ended(outcome) => {
                    assert!(matches!(outcome, Outcome::Defeat { .. }));
                    assert_eq!(player.current_hp, 1);
                    break;
                }
            }
        }
        assert_eq!(player.combat_ward, 0);
        assert!(fight.act(&mut player, Action::Attack, |_| 0, &mut rng).is_err());
    }
}
