//! Battle Regen - Skirmish Runner
//!
//! Runs a seeded skirmish against the in-memory sandbox host: three teams
//! trade random blows while the regeneration core heals them, and a summary of
//! the healing and medicine experience is printed at the end.

use std::path::PathBuf;

use battle_regen::core::config::RegenConfig;
use battle_regen::core::error::Result;
use battle_regen::core::types::{AgentId, CreatureFamily, HeroId, TeamId};
use battle_regen::experience::FlushReport;
use battle_regen::host::HeroInfo;
use battle_regen::mission::MissionBridge;
use battle_regen::sandbox::{HeroRecord, SandboxHost, TeamSetup};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Skirmish runner for the battle regeneration core
#[derive(Parser, Debug)]
#[command(name = "battle-regen")]
#[command(about = "Run a seeded skirmish and report how much everyone healed")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured formula id (e.g. 01_Quadratic)
    #[arg(long)]
    formula: Option<String>,

    /// Troops per team, not counting heroes and mounts
    #[arg(long, default_value_t = 40)]
    troops: usize,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Blows landed per tick across the whole battlefield
    #[arg(long, default_value_t = 2)]
    blows: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Run as a custom battle: no medicine experience is earned
    #[arg(long)]
    custom_battle: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// Skirmish summary
#[derive(Serialize)]
struct SkirmishReport {
    seed: u64,
    formula: String,
    ticks: u64,
    spawned: usize,
    survivors: usize,
    blows: usize,
    deaths: usize,
    health_restored: f32,
    heal_events: usize,
    suppressed_messages: usize,
    notifications: usize,
    experience: FlushReport,
    heroes: Vec<HeroRecord>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("battle_regen=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RegenConfig::load(path)?,
        None => RegenConfig::default(),
    };
    if let Some(formula) = &args.formula {
        config.formula = formula.clone();
    }
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!("Skirmish starting with seed {}", seed);

    let mut host = SandboxHost::new();
    host.set_persistent_progression(!args.custom_battle);
    let mut bridge = MissionBridge::new(config);

    let spawned = deploy(&mut host, &mut rng, args.troops);
    for id in host.agent_ids() {
        bridge.on_agent_build(&host, id);
    }
    info!("Deployed {} agents", spawned);

    let mut report = SkirmishReport {
        seed,
        formula: bridge.active_formula().id().to_string(),
        ticks: args.ticks,
        spawned,
        survivors: 0,
        blows: 0,
        deaths: 0,
        health_restored: 0.0,
        heal_events: 0,
        suppressed_messages: 0,
        notifications: 0,
        experience: FlushReport::default(),
        heroes: Vec::new(),
    };

    for tick in 0..args.ticks {
        for _ in 0..args.blows {
            if let Some(killed) = land_blow(&mut host, &mut bridge, &mut rng) {
                debug!("Tick {}: {} was killed", tick, killed);
                report.deaths += 1;
            }
            report.blows += 1;
        }

        if let Some(tick_report) = bridge.on_mission_tick(&mut host, args.dt) {
            report.health_restored += tick_report.health_restored;
            report.heal_events += tick_report.healed;
            report.suppressed_messages += tick_report.suppressed_messages;
        }
    }

    report.experience = bridge.on_end_mission(&mut host);
    report.survivors = host.agent_count();
    report.notifications = host.notifications().len();
    report.heroes = host.hero_records();

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }

    Ok(())
}

/// Spawn the player's party, an allied host and an enemy host
fn deploy(host: &mut SandboxHost, rng: &mut ChaCha8Rng, troops: usize) -> usize {
    let player_team = host.add_team(TeamSetup::player());
    let allied_team = host.add_team(TeamSetup::ally());
    let enemy_team = host.add_team(TeamSetup::enemy());

    let player = host.spawn_agent(|a| {
        a.is_player_unit = true;
        a.hero = Some(HeroId(1));
        a.medicine = 80.0;
        a.team = Some(player_team);
    });
    host.set_name(player, "Player");
    host.set_main_agent(Some(player));
    host.set_main_hero(Some(HeroInfo {
        id: HeroId(1),
        medicine: 80.0,
    }));
    host.set_general(player_team, Some(player));

    for n in 0..2u64 {
        let companion = host.spawn_agent(|a| {
            a.hero = Some(HeroId(10 + n));
            a.is_player_companion = true;
            a.medicine = rng.gen_range(0.0..150.0);
            a.team = Some(player_team);
        });
        host.set_name(companion, format!("Companion {}", n + 1));
    }

    let allied_general = spawn_general(host, allied_team, HeroId(20), rng);
    host.set_name(allied_general, "Allied Lord");
    let enemy_general = spawn_general(host, enemy_team, HeroId(30), rng);
    host.set_name(enemy_general, "Enemy Lord");

    for team in [player_team, allied_team, enemy_team] {
        for n in 0..troops {
            let health_limit = rng.gen_range(80.0..120.0);
            let rider = host.spawn_agent(|a| {
                a.health_limit = health_limit;
                a.health = health_limit;
                a.medicine = rng.gen_range(0.0..30.0);
                a.team = Some(team);
            });

            // every fifth troop is mounted
            if n % 5 == 0 {
                let horse = host.spawn_agent(|a| {
                    a.is_mount = true;
                    a.family = CreatureFamily::Beast;
                    a.health_limit = 150.0;
                    a.health = 150.0;
                    a.team = Some(team);
                });
                host.mount_up(rider, horse);
            }
        }
    }

    // a stray dog wandering the field
    host.spawn_agent(|a| {
        a.family = CreatureFamily::Beast;
        a.health_limit = 40.0;
        a.health = 40.0;
    });

    host.agent_count()
}

fn spawn_general(
    host: &mut SandboxHost,
    team: TeamId,
    hero: HeroId,
    rng: &mut ChaCha8Rng,
) -> AgentId {
    let general = host.spawn_agent(|a| {
        a.hero = Some(hero);
        a.medicine = rng.gen_range(20.0..200.0);
        a.team = Some(team);
    });
    host.set_general(team, Some(general));
    general
}

/// One random agent hits another; returns the victim if the blow killed it
fn land_blow(
    host: &mut SandboxHost,
    bridge: &mut MissionBridge,
    rng: &mut ChaCha8Rng,
) -> Option<AgentId> {
    let ids = host.agent_ids();
    if ids.len() < 2 {
        return None;
    }
    let attacker = ids[rng.gen_range(0..ids.len())];
    let victim = ids[rng.gen_range(0..ids.len())];
    if attacker == victim {
        return None;
    }

    host.damage(victim, rng.gen_range(5.0..35.0));
    bridge.on_register_blow(&*host, Some(attacker), Some(victim));

    match host.health(victim) {
        Some(health) if health <= 0.0 => {
            host.despawn(victim);
            bridge.on_agent_removed(victim);
            Some(victim)
        }
        _ => None,
    }
}

fn print_text(report: &SkirmishReport) {
    println!("=== SKIRMISH REPORT ===");
    println!("Seed:            {}", report.seed);
    println!("Formula:         {}", report.formula);
    println!("Ticks:           {}", report.ticks);
    println!(
        "Agents:          {} deployed, {} survived, {} killed",
        report.spawned, report.survivors, report.deaths
    );
    println!("Blows:           {}", report.blows);
    println!(
        "Healing:         {:.1} health over {} heal events",
        report.health_restored, report.heal_events
    );
    println!(
        "Messages:        {} shown, {} suppressed",
        report.notifications, report.suppressed_messages
    );
    println!(
        "Experience:      {} heroes paid, {} skipped",
        report.experience.delivered, report.experience.skipped
    );
    println!();
    println!("Heroes:");
    for hero in &report.heroes {
        println!("  {:<10} {:>8.3} medicine xp", hero.id, hero.medicine_xp);
    }
}
