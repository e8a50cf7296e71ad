//! Integration test: encounter -> session -> rewards -> persistence.
//!
//! Drives whole fights the way a front end would: take the activity lock,
//! load the player, generate a monster, act until the session finishes, grant
//! rewards and write the player back.

use grindstone::character::Player;
use grindstone::combat::{
    Action, ActivityRegistry, CombatSession, Outcome, SessionSettings, Step,
};
use grindstone::core::GameError;
use grindstone::items::{generate_equipment, EquipmentSlot};
use grindstone::monsters::{generate_monster, EncounterMode, Monster};
use grindstone::rewards::grant_victory;
use grindstone::store::{EquipmentRepository, MemoryStore, UserRepository};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn veteran(user_id: u64) -> Player {
    let mut p = Player::new(user_id, "Vesper");
    p.level = 30;
    p.attack = 120;
    p.defence = 90;
    p.max_hp = 600;
    p.current_hp = 600;
    p
}

fn run_to_end(session: &mut CombatSession, player: &mut Player, rng: &mut ChaCha8Rng) -> Outcome {
    for _ in 0..1_000 {
        if let Step::Finished(outcome) = session.act(player, Action::GigaAuto, rng).unwrap() {
            return outcome;
        }
    }
    panic!("fight did not finish");
}

// =========================================================================
// Full loop
// =========================================================================

#[test]
fn test_fight_round_trips_through_store() {
    let mut store = MemoryStore::new();
    store.register(&veteran(1)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let weapon = generate_equipment(EquipmentSlot::Weapon, 1, 30, &mut rng);
    let id = store.create(weapon).unwrap();
    store.equip(1, EquipmentSlot::Weapon, id).unwrap();

    let registry = ActivityRegistry::new();
    let guard = registry.acquire(1, "combat").unwrap();
    assert!(matches!(
        registry.acquire(1, "boss"),
        Err(GameError::Busy { user_id: 1, .. })
    ));

    let mut player = store.get(1).unwrap();
    assert_eq!(player.loadout.weapon.as_ref().map(|w| w.id), Some(id));
    let monster = generate_monster(&player, EncounterMode::Normal, &mut rng).unwrap();
    let (mut session, first) = CombatSession::start(&mut player, monster, SessionSettings::default(), &mut rng);
    assert_eq!(first.turn, 0);
    assert!(first.allowed.contains(&Action::Attack));

    let exp_before = player.exp;
    let outcome = run_to_end(&mut session, &mut player, &mut rng);
    match outcome {
        Outcome::Victory => {
            let held = |slot| store.count(1, slot).unwrap_or(0);
            let mut rewards = grant_victory(&mut player, &session.monster, None, held, &mut rng);
            assert!(player.wallet.gold >= rewards.gold);
            store.commit_victory(&mut player, &mut rewards).unwrap();
            assert!(player.companions.iter().all(|c| c.id != 0));
        }
        Outcome::Defeat { exp_lost } => {
            assert_eq!(player.current_hp, 1);
            assert_eq!(exp_lost, exp_before / 10);
        }
        other => panic!("auto never flees, got {other:?}"),
    }
    assert_eq!(player.combat_ward, 0);
    assert!(player.last_combat > 0);

    store.update_from_player_object(&player).unwrap();
    drop(guard);
    assert!(!registry.is_busy(1));

    let reloaded = store.get(1).unwrap();
    assert_eq!(reloaded.current_hp, player.current_hp);
    assert_eq!(reloaded.exp, player.exp);
    assert_eq!(reloaded.wallet.gold, player.wallet.gold);
    assert_eq!(reloaded.last_combat, player.last_combat);
    assert_eq!(reloaded.companions.len(), player.companions.len());
    assert!(reloaded.current_hp <= reloaded.max_hp);
}

#[test]
fn test_same_seed_same_fight() {
    let play = || {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut player = veteran(1);
        let monster = generate_monster(&player, EncounterMode::Normal, &mut rng).unwrap();
        let (mut session, _) = CombatSession::start(&mut player, monster, SessionSettings::default(), &mut rng);
        let outcome = run_to_end(&mut session, &mut player, &mut rng);
        (outcome, player.current_hp, session.state.turns)
    };
    assert_eq!(play(), play());
}

#[test]
fn test_many_seeds_keep_hp_in_bounds() {
    for seed in 0..40 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut player = veteran(1);
        let monster = generate_monster(&player, EncounterMode::Normal, &mut rng).unwrap();
        let (mut session, _) = CombatSession::start(&mut player, monster, SessionSettings::default(), &mut rng);
        loop {
            match session.act(&mut player, Action::Auto, &mut rng).unwrap() {
                Step::Continue(snapshots) => {
                    for s in snapshots {
                        assert!(s.player_hp <= s.player_max_hp, "seed {seed}");
                        assert!(s.monster_hp <= s.monster_max_hp, "seed {seed}");
                    }
                }
                Step::Finished(_) => break,
            }
        }
        assert!(player.current_hp >= 1, "seed {seed}");
    }
}

// =========================================================================
// Ending without a kill
// =========================================================================

#[test]
fn test_timeout_ends_without_penalty() {
    let mut player = veteran(1);
    player.exp = 500;
    let mut rng = StepRng::new(0, 0);
    let (mut session, _) = CombatSession::start(&mut player, Monster::blank(30), SessionSettings::default(), &mut rng);
    let step = session.act(&mut player, Action::Timeout, &mut rng).unwrap();
    assert_eq!(step, Step::Finished(Outcome::TimedOut));
    assert_eq!(player.exp, 500);
    assert!(matches!(
        session.act(&mut player, Action::Attack, &mut rng),
        Err(GameError::InvalidAction(_))
    ));
}

#[test]
fn test_heal_unavailable_at_full_hp() {
    let mut player = veteran(1);
    let mut rng = StepRng::new(0, 0);
    let (mut session, snapshot) =
        CombatSession::start(&mut player, Monster::blank(30), SessionSettings::default(), &mut rng);
    assert!(!snapshot.allowed.contains(&Action::Heal));
    assert!(matches!(
        session.act(&mut player, Action::Heal, &mut rng),
        Err(GameError::FullHealth)
    ));
    assert!(!session.is_finished());
}

#[test]
fn test_treasure_fight_grants_no_xp() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut player = veteran(1);
    let monster = generate_monster(&player, EncounterMode::Treasure, &mut rng).unwrap();
    assert!(monster.is_treasure);
    let (mut session, _) = CombatSession::start(&mut player, monster, SessionSettings::default(), &mut rng);
    if run_to_end(&mut session, &mut player, &mut rng) == Outcome::Victory {
        let rewards = grant_victory(&mut player, &session.monster, None, |_| 0, &mut rng);
        assert_eq!(rewards.xp, 0);
        assert!(player.wallet.curios >= 1);
    }
}
