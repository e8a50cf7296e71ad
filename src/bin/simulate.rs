//! Combat balance simulator CLI.
//!
//! Runs Monte Carlo fights through the real combat session to check win rates
//! and reward pacing at a given player level.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                       # 1000 fights at level 20
//!   cargo run --bin simulate -- -n 200 -l 60       # 200 fights at level 60
//!   cargo run --bin simulate -- --boss Lucifer     # boss chain instead
//!   cargo run --bin simulate -- --seed 42          # reproducible run

use grindstone::character::{apply_level_ups, exp_threshold, Player};
use grindstone::combat::{Action, BossFight, BossStep, CombatSession, Outcome, SessionSettings, Step};
use grindstone::core::constants::MAX_LEVEL;
use grindstone::core::{game_rng, CoreConfig, GameRng, Result};
use grindstone::items::{generate_equipment, EquipmentSlot};
use grindstone::monsters::{generate_monster, roll_encounter_mode, BossEncounter};
use grindstone::rewards::grant_victory;
use std::env;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct SimConfig {
    runs: u32,
    level: u32,
    seed: Option<u64>,
    boss: Option<BossEncounter>,
    geared: bool,
    verbose: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 1000,
            level: 20,
            seed: None,
            boss: None,
            geared: true,
            verbose: false,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    victories: u32,
    defeats: u32,
    unfinished: u32,
    xp: u64,
    gold: u64,
    drops: u64,
    turns: u64,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    let default_filter = if config.verbose { "grindstone=debug" } else { "grindstone=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let core = CoreConfig::load();
    let settings = SessionSettings::from(&core);
    let mut rng = game_rng(config.seed.or(core.seed));

    println!("Grindstone combat simulator");
    println!("  Runs:   {}", config.runs);
    println!("  Level:  {}", config.level);
    println!("  Gear:   {}", if config.geared { "generated" } else { "none" });
    if let Some(boss) = config.boss {
        println!("  Boss:   {}", boss.name());
    }
    if let Some(seed) = config.seed {
        println!("  Seed:   {}", seed);
    }
    println!();

    let mut tally = Tally::default();
    for run in 0..config.runs {
        let mut player = build_player(u64::from(run) + 1, &config, &mut rng);
        let result = match config.boss {
            Some(boss) => simulate_boss(&mut player, boss, settings, &mut rng, &mut tally),
            None => simulate_fight(&mut player, settings, &mut rng, &mut tally),
        };
        if let Err(e) = result {
            eprintln!("run {run} aborted: {e}");
            tally.unfinished += 1;
        }
    }
    print_report(&config, &tally);
}

/// A fresh player levelled through the real level-up rolls.
fn build_player(user_id: u64, config: &SimConfig, rng: &mut GameRng) -> Player {
    let mut player = Player::new(user_id, format!("sim-{user_id}"));
    while player.level < config.level.min(MAX_LEVEL) {
        player.exp += exp_threshold(player.level);
        apply_level_ups(&mut player, rng);
    }
    if config.geared {
        for slot in EquipmentSlot::ALL {
            player
                .loadout
                .equip(generate_equipment(slot, user_id, player.level, rng));
        }
    }
    if let Some(boss) = config.boss {
        for (currency, amount) in boss.entry_cost() {
            player.wallet.add(*currency, *amount);
        }
    }
    player.current_hp = player.max_hp;
    player
}

fn simulate_fight(player: &mut Player, settings: SessionSettings, rng: &mut GameRng, tally: &mut Tally) -> Result<()> {
    let mode = roll_encounter_mode(player, rng);
    let monster = generate_monster(player, mode, rng)?;
    let (mut session, _) = CombatSession::start(player, monster, settings, rng);
    // Giga-auto always trades at least once, so low-HP stops still make progress.
    loop {
        if let Step::Finished(outcome) = session.act(player, Action::GigaAuto, rng)? {
            return record(player, &session, outcome, rng, tally);
        }
    }
}

fn record(
    player: &mut Player,
    session: &CombatSession,
    outcome: Outcome,
    rng: &mut GameRng,
    tally: &mut Tally,
) -> Result<()> {
    tally.turns += u64::from(session.state.turns);
    match outcome {
        Outcome::Victory => {
            let rewards = grant_victory(player, &session.monster, None, |_| 0, rng);
            tally.victories += 1;
            tally.xp += rewards.xp;
            tally.gold += rewards.gold;
            tally.drops += rewards.currencies.len() as u64 + u64::from(rewards.gear.is_some());
        }
        Outcome::Defeat { .. } => tally.defeats += 1,
        Outcome::Fled | Outcome::TimedOut => tally.unfinished += 1,
    }
    Ok(())
}

fn simulate_boss(
    player: &mut Player,
    boss: BossEncounter,
    settings: SessionSettings,
    rng: &mut GameRng,
    tally: &mut Tally,
) -> Result<()> {
    let mut fight = BossFight::new(boss, settings);
    fight.accept_door(player, rng)?;
    loop {
        match fight.act(player, Action::GigaAuto, |_| 0, rng)? {
            BossStep::Continue(_) | BossStep::PhaseCleared { .. } => {}
            BossStep::Victory(rewards) => {
                tally.victories += 1;
                tally.xp += rewards.xp;
                tally.gold += rewards.gold;
                tally.drops += rewards.currencies.len() as u64;
                return Ok(());
            }
            BossStep::Ended(outcome) => return record_boss_loss(outcome, tally),
        }
    }
}

fn record_boss_loss(outcome: Outcome, tally: &mut Tally) -> Result<()> {
    match outcome {
        Outcome::Defeat { .. } => tally.defeats += 1,
        _ => tally.unfinished += 1,
    }
    Ok(())
}

fn print_report(config: &SimConfig, tally: &Tally) {
    let runs = f64::from(config.runs.max(1));
    let wins = f64::from(tally.victories.max(1));
    println!("Results");
    println!("  Win rate:        {:.1}%", f64::from(tally.victories) / runs * 100.0);
    println!("  Defeats:         {}", tally.defeats);
    println!("  Unfinished:      {}", tally.unfinished);
    println!("  Avg turns:       {:.1}", tally.turns as f64 / runs);
    println!("  Avg XP per win:  {:.1}", tally.xp as f64 / wins);
    println!("  Avg gold/win:    {:.1}", tally.gold as f64 / wins);
    println!("  Drops per win:   {:.2}", tally.drops as f64 / wins);
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-l" | "--level" => {
                if i + 1 < args.len() {
                    config.level = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-b" | "--boss" => {
                if i + 1 < args.len() {
                    let wanted = &args[i + 1];
                    config.boss = BossEncounter::ALL
                        .iter()
                        .copied()
                        .find(|b| b.name().eq_ignore_ascii_case(wanted));
                    if config.boss.is_none() {
                        eprintln!("unknown boss {wanted}");
                        std::process::exit(2);
                    }
                    i += 1;
                }
            }
            "--no-gear" => {
                config.geared = false;
            }
            "-v" | "--verbose" => {
                config.verbose = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Grindstone Combat Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Number of fights (default: 1000)");
    println!("    -l, --level <L>     Player level (default: 20)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -b, --boss <NAME>   Fight a boss chain (Aphrodite, Lucifer, NEET, Gemini)");
    println!("    --no-gear           Fight without generated equipment");
    println!("    -v, --verbose       Debug logging (RUST_LOG overrides)");
    println!("    -h, --help          Show this help");
}
