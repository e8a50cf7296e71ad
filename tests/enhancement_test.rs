//! Integration test: crafting operations against stored gear.
//!
//! Each test loads an item from the store, runs an operation on it and writes
//! the result back, checking what a player would see on the next load.

use grindstone::character::{Currency, Player, Skill};
use grindstone::core::GameError;
use grindstone::enhancement::{
    apply_voidforge, check_voidforge, forge, imbue, potential, refine, restore_refine_attempt,
    shatter, temper, VoidforgeOutcome,
};
use grindstone::items::{
    Accessory, Armor, Equipment, EquipmentSlot, Weapon, WeaponLine, WeaponPassive,
};
use grindstone::store::{EquipmentRepository, MemoryStore, SkillRepository, UserRepository};
use rand::rngs::mock::StepRng;

const USER: u64 = 11;

fn setup() -> MemoryStore {
    let mut store = MemoryStore::new();
    let mut player = Player::new(USER, "Smith");
    player.wallet.gold = 1_000_000;
    store.register(&player).unwrap();
    for skill in Skill::ALL {
        store.update_batch(USER, skill, [500, 500, 500, 500, 500]).unwrap();
    }
    store
}

fn load_weapon(store: &MemoryStore, id: u64) -> Weapon {
    match store.get_item(EquipmentSlot::Weapon, id).unwrap() {
        Equipment::Weapon(w) => w,
        other => panic!("expected a weapon, got {other:?}"),
    }
}

fn store_weapon(store: &mut MemoryStore, level: u32) -> u64 {
    let weapon = Weapon::new(USER, "Cleaver".to_string(), level, 20, 5, 0);
    store.create(Equipment::Weapon(weapon)).unwrap()
}

// =========================================================================
// Forge
// =========================================================================

#[test]
fn test_forge_chain_until_exhausted() {
    let mut store = setup();
    let id = store_weapon(&mut store, 20);
    let mut player = store.get(USER).unwrap();
    let mut skills = store.get_data(USER).unwrap();
    let mut rng = StepRng::new(0, 0);

    let mut weapon = load_weapon(&store, id);
    let tiers: Vec<u8> = (0..3)
        .map(|_| {
            forge(&mut weapon, &mut skills, &mut player.wallet, &mut rng)
                .unwrap()
                .passive
                .map(|p| p.tier)
                .unwrap()
        })
        .collect();
    assert_eq!(tiers, vec![0, 1, 2]);
    assert_eq!(weapon.passive.map(|p| p.line), Some(WeaponLine::ALL[0]));
    assert!(matches!(
        forge(&mut weapon, &mut skills, &mut player.wallet, &mut rng),
        Err(GameError::NoAttemptsRemaining("forge"))
    ));
    // 100 + 400 + 1000 gold, 10 of each resource per step.
    assert_eq!(player.wallet.gold, 1_000_000 - 1_500);
    assert_eq!(skills.mining.quantities, [490, 490, 490, 500, 500]);

    store.save_item(&Equipment::Weapon(weapon.clone())).unwrap();
    store.update_from_player_object(&player).unwrap();
    assert_eq!(load_weapon(&store, id), weapon);
    assert_eq!(store.get(USER).unwrap().wallet.gold, player.wallet.gold);
}

#[test]
fn test_forge_from_burning_reaches_carbonising() {
    let mut store = setup();
    let id = store_weapon(&mut store, 50);
    store.update_passive(EquipmentSlot::Weapon, id, "passive", "burning").unwrap();
    let mut player = store.get(USER).unwrap();
    let mut skills = store.get_data(USER).unwrap();
    let mut rng = StepRng::new(0, 0);

    let mut weapon = load_weapon(&store, id);
    assert_eq!(weapon.forges_remaining, 4);
    for _ in 0..4 {
        assert!(forge(&mut weapon, &mut skills, &mut player.wallet, &mut rng).unwrap().success);
    }
    assert_eq!(weapon.passive.map(|p| p.name()), Some("carbonising"));
    assert_eq!(weapon.forges_remaining, 0);
    // 1000 + 2500 + 5000 + 10000 gold, 20 of each resource per step.
    assert_eq!(player.wallet.gold, 1_000_000 - 18_500);
    assert_eq!(skills.mining.quantities, [480, 480, 480, 480, 500]);

    store.save_item(&Equipment::Weapon(weapon.clone())).unwrap();
    assert_eq!(load_weapon(&store, id).passive.map(|p| p.name()), Some("carbonising"));
}

#[test]
fn test_forge_without_materials_changes_nothing() {
    let mut store = MemoryStore::new();
    let mut player = Player::new(USER, "Broke");
    player.wallet.gold = 50_000;
    store.register(&player).unwrap();
    let id = store_weapon(&mut store, 20);
    let mut skills = store.get_data(USER).unwrap();
    let mut weapon = load_weapon(&store, id);

    let err = forge(&mut weapon, &mut skills, &mut player.wallet, &mut StepRng::new(0, 0)).unwrap_err();
    assert!(matches!(err, GameError::InsufficientMaterials { .. }));
    assert_eq!(weapon, load_weapon(&store, id));
    assert_eq!(player.wallet.gold, 50_000);
}

// =========================================================================
// Refine, runes and shatter
// =========================================================================

#[test]
fn test_refine_then_restore_with_rune() {
    let mut store = setup();
    let id = store_weapon(&mut store, 20);
    let mut player = store.get(USER).unwrap();
    let mut rng = StepRng::new(0, 0);
    let mut weapon = load_weapon(&store, id);

    for _ in 0..3 {
        let outcome = refine(&mut weapon, &mut player.wallet, &mut rng).unwrap();
        assert_eq!(outcome.attack_gain, 2);
    }
    assert_eq!(weapon.refinement_lvl, 3);
    assert_eq!(weapon.attack, 26);
    assert!(matches!(
        refine(&mut weapon, &mut player.wallet, &mut rng),
        Err(GameError::NoAttemptsRemaining("refine"))
    ));

    assert!(restore_refine_attempt(&mut weapon, &mut player.wallet).is_err());
    player.wallet.add(Currency::RefinementRunes, 1);
    restore_refine_attempt(&mut weapon, &mut player.wallet).unwrap();
    assert_eq!(weapon.refines_remaining, 1);
    refine(&mut weapon, &mut player.wallet, &mut rng).unwrap();
    assert_eq!(weapon.refinement_lvl, 4);
}

#[test]
fn test_shatter_refunds_half_refinement() {
    let mut store = setup();
    let id = store_weapon(&mut store, 20);
    store.update_counter(EquipmentSlot::Weapon, id, "refinement_lvl", 7).unwrap();
    let mut player = store.get(USER).unwrap();
    player.wallet.add(Currency::ShatterRunes, 1);
    let weapon = load_weapon(&store, id);

    assert_eq!(shatter(&weapon, &mut player.wallet).unwrap(), 3);
    assert_eq!(player.wallet.refinement_runes, 3);
    store.discard(USER, EquipmentSlot::Weapon, id).unwrap();
    assert_eq!(store.count(USER, EquipmentSlot::Weapon).unwrap(), 0);
}

// =========================================================================
// Voidforge
// =========================================================================

#[test]
fn test_voidforge_fills_pinnacle_then_utmost() {
    let mut store = setup();
    let target_id = store_weapon(&mut store, 60);
    let sacrifice_id = store_weapon(&mut store, 60);
    store.update_counter(EquipmentSlot::Weapon, sacrifice_id, "refinement_lvl", 5).unwrap();
    store.update_counter(EquipmentSlot::Weapon, sacrifice_id, "forges_remaining", 0).unwrap();
    store.update_passive(EquipmentSlot::Weapon, sacrifice_id, "passive", "keen").unwrap();

    let mut target = load_weapon(&store, target_id);
    let sacrifice = load_weapon(&store, sacrifice_id);
    let passive = check_voidforge(&target, &sacrifice).unwrap();
    assert_eq!(passive, WeaponPassive { line: WeaponLine::Piercing, tier: 1 });

    assert_eq!(apply_voidforge(&mut target, passive, 0.1), VoidforgeOutcome::Pinnacle(passive));
    assert_eq!(apply_voidforge(&mut target, passive, 0.1), VoidforgeOutcome::Utmost(passive));
    // With both slots taken the sacrifice can still overwrite the main passive.
    let previous = target.passive;
    assert_eq!(
        apply_voidforge(&mut target, passive, 0.1),
        VoidforgeOutcome::MainOverwritten { previous, passive }
    );
    assert!(check_voidforge(&target, &sacrifice).is_ok());

    store.save_item(&Equipment::Weapon(target.clone())).unwrap();
    let back = load_weapon(&store, target_id);
    assert_eq!(back.pinnacle_passive, Some(passive));
    assert_eq!(back.utmost_passive, Some(passive));
    assert_eq!(back.passive, Some(passive));
}

#[test]
fn test_voidforge_rejects_equipped_sacrifice() {
    let mut store = setup();
    let target_id = store_weapon(&mut store, 20);
    let sacrifice_id = store_weapon(&mut store, 20);
    store.equip(USER, EquipmentSlot::Weapon, sacrifice_id).unwrap();
    let target = load_weapon(&store, target_id);
    let sacrifice = load_weapon(&store, sacrifice_id);
    assert!(matches!(
        check_voidforge(&target, &sacrifice),
        Err(GameError::ItemEquipped(_))
    ));
}

// =========================================================================
// Armor and accessories
// =========================================================================

#[test]
fn test_temper_and_imbue_armor() {
    let mut store = setup();
    let armor = Armor::new(USER, "Plate".to_string(), 35);
    let id = store.create(Equipment::Armor(armor)).unwrap();
    let mut player = store.get(USER).unwrap();
    let mut skills = store.get_data(USER).unwrap();
    let mut rng = StepRng::new(0, 0);

    let Equipment::Armor(mut armor) = store.get_item(EquipmentSlot::Armor, id).unwrap() else {
        panic!("armor table returned another slot");
    };
    let outcome = temper(&mut armor, &mut skills, &mut player.wallet, &mut rng).unwrap();
    assert!(outcome.success);
    // Zero block and evasion: ward gains level/7.
    assert_eq!(armor.ward, 5);

    assert!(imbue(&mut armor, &mut player.wallet, &mut rng).is_err());
    player.wallet.add(Currency::ImbueRunes, 1);
    assert!(imbue(&mut armor, &mut player.wallet, &mut rng).unwrap().is_some());
    assert!(matches!(
        imbue(&mut armor, &mut player.wallet, &mut rng),
        Err(GameError::Ineligible(_))
    ));

    store.save_item(&Equipment::Armor(armor.clone())).unwrap();
    assert_eq!(store.get_item(EquipmentSlot::Armor, id).unwrap(), Equipment::Armor(armor));
}

#[test]
fn test_potential_unlocks_and_raises_accessory() {
    let mut store = setup();
    let accessory = Accessory::new(USER, "Charm".to_string(), 20);
    let id = store.create(Equipment::Accessory(accessory)).unwrap();
    let mut player = store.get(USER).unwrap();
    let mut rng = StepRng::new(0, 0);
    let mut item = store.get_item(EquipmentSlot::Accessory, id).unwrap();

    let first = potential(&mut item, &mut player.wallet, false, &mut rng).unwrap();
    assert_eq!(first.passive_lvl, 1);
    assert_eq!(first.gold_spent, 500);
    let second = potential(&mut item, &mut player.wallet, false, &mut rng).unwrap();
    assert_eq!(second.passive_lvl, 2);

    assert!(matches!(
        potential(&mut item, &mut player.wallet, true, &mut rng),
        Err(GameError::InsufficientCurrency(_))
    ));
    store.save_item(&item).unwrap();
    let Equipment::Accessory(back) = store.get_item(EquipmentSlot::Accessory, id).unwrap() else {
        panic!("accessory table returned another slot");
    };
    assert_eq!(back.passive_lvl, 2);
    assert!(back.passive.is_some());
}

#[test]
fn test_potential_rejects_weapons() {
    let mut store = setup();
    let id = store_weapon(&mut store, 20);
    let mut player = store.get(USER).unwrap();
    let mut item = store.get_item(EquipmentSlot::Weapon, id).unwrap();
    assert!(matches!(
        potential(&mut item, &mut player.wallet, false, &mut StepRng::new(0, 0)),
        Err(GameError::InvalidTarget(_))
    ));
}
