//! Mission lifecycle integration tests

use std::path::Path;

use battle_regen::classify::RoleTag;
use battle_regen::core::config::RegenConfig;
use battle_regen::core::types::{CreatureFamily, HeroId, TeamId};
use battle_regen::formula::{EVE_ONLINE_ID, QUADRATIC_ID};
use battle_regen::host::{BattleHost, HeroInfo};
use battle_regen::mission::MissionBridge;
use battle_regen::sandbox::{SandboxHost, TeamSetup};

fn full_heal() -> RegenConfig {
    RegenConfig {
        heal_to_full: true,
        ..RegenConfig::default()
    }
}

#[test]
fn test_player_heals_one_percent_per_second() {
    let mut host = SandboxHost::new();
    let player = host.spawn_agent(|a| {
        a.is_player_unit = true;
        a.health = 50.0;
    });
    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, player);
    assert_eq!(bridge.engine().state(player).unwrap().role(), RoleTag::Player);

    let report = bridge.on_mission_tick(&mut host, 1.0).unwrap();
    assert_eq!(report.healed, 1);
    assert!((host.health(player).unwrap() - 51.0).abs() < 1e-5);
}

#[test]
fn test_unclassifiable_agent_heals_at_enemy_troop_rate() {
    let mut host = SandboxHost::new();
    let lost = host.spawn_agent(|a| {
        a.health = 50.0;
        a.team = Some(TeamId(99));
    });
    let mut config = full_heal();
    config.rates.enemy_troop = 0.0;
    let mut bridge = MissionBridge::new(config);
    bridge.on_agent_build(&host, lost);
    assert_eq!(bridge.engine().state(lost).unwrap().role(), RoleTag::None);

    let report = bridge.on_mission_tick(&mut host, 1.0).unwrap();
    assert_eq!(report.healed, 0);
    assert_eq!(host.health(lost), Some(50.0));

    let mut config = full_heal();
    config.rates.enemy_troop = 2.0;
    bridge.set_config(config);
    bridge.on_mission_tick(&mut host, 1.0);
    assert!((host.health(lost).unwrap() - 52.0).abs() < 1e-5);
}

#[test]
fn test_huge_dt_stops_exactly_at_ceiling() {
    let mut host = SandboxHost::new();
    let wounded = host.spawn_agent(|a| a.health = 12.5);
    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, wounded);

    bridge.on_mission_tick(&mut host, 1.0e6);
    assert_eq!(host.health(wounded), Some(100.0));

    // at the ceiling nothing more happens
    let report = bridge.on_mission_tick(&mut host, 1.0).unwrap();
    assert_eq!(report.healed, 0);
}

#[test]
fn test_ceiling_is_spawn_health_without_heal_to_full() {
    let mut host = SandboxHost::new();
    let id = host.spawn_agent(|a| a.health = 70.0);
    let mut bridge = MissionBridge::new(RegenConfig::default());
    bridge.on_agent_build(&host, id);

    host.damage(id, 30.0);
    bridge.on_mission_tick(&mut host, 1000.0);
    assert_eq!(host.health(id), Some(70.0));
}

#[test]
fn test_delay_gating_and_reset_on_hit() {
    let mut host = SandboxHost::new();
    let victim = host.spawn_agent(|a| a.health = 50.0);
    let attacker = host.spawn_agent(|_| {});
    let mut bridge = MissionBridge::new(RegenConfig {
        regen_delay: 2.0,
        ..full_heal()
    });
    bridge.on_agent_build(&host, victim);
    bridge.on_agent_build(&host, attacker);

    bridge.on_mission_tick(&mut host, 1.5);
    assert_eq!(host.health(victim), Some(50.0));

    bridge.on_register_blow(&host, Some(attacker), Some(victim));
    bridge.on_mission_tick(&mut host, 1.5);
    assert_eq!(host.health(victim), Some(50.0));

    bridge.on_mission_tick(&mut host, 1.0);
    assert!((host.health(victim).unwrap() - 51.0).abs() < 1e-5);
}

#[test]
fn test_removed_slot_is_reused_without_growth() {
    let mut host = SandboxHost::new();
    let mut bridge = MissionBridge::new(RegenConfig {
        initial_capacity: 2,
        ..full_heal()
    });
    let a = host.spawn_agent(|_| {});
    let b = host.spawn_agent(|_| {});
    bridge.on_agent_build(&host, a);
    bridge.on_agent_build(&host, b);
    assert_eq!(bridge.engine().capacity(), 2);

    bridge.on_agent_removed(a);
    let c = host.spawn_agent(|_| {});
    bridge.on_agent_build(&host, c);
    assert_eq!(bridge.engine().capacity(), 2);
    assert_eq!(bridge.engine().len(), 2);

    bridge.on_agent_deleted(b);
    bridge.on_agent_deleted(b);
    assert_eq!(bridge.engine().len(), 1);
    assert!(bridge.engine().is_tracked(c));
}

#[test]
fn test_capacity_doubles_when_full() {
    let mut host = SandboxHost::new();
    let mut bridge = MissionBridge::new(RegenConfig {
        initial_capacity: 4,
        ..full_heal()
    });
    for _ in 0..5 {
        let id = host.spawn_agent(|_| {});
        bridge.on_agent_build(&host, id);
    }
    assert_eq!(bridge.engine().capacity(), 8);
}

#[test]
fn test_medicine_xp_flows_to_healer_and_commander() {
    let mut host = SandboxHost::new();
    let team = host.add_team(TeamSetup::player());
    let player = host.spawn_agent(|a| {
        a.is_player_unit = true;
        a.hero = Some(HeroId(1));
        a.team = Some(team);
    });
    host.set_main_agent(Some(player));
    let companion = host.spawn_agent(|a| {
        a.hero = Some(HeroId(2));
        a.is_player_companion = true;
        a.health = 50.0;
        a.team = Some(team);
    });

    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, player);
    bridge.on_agent_build(&host, companion);

    for _ in 0..10 {
        bridge.on_mission_tick(&mut host, 1.0);
    }
    // 10 health of 100 healed: 0.1 * 5 to self, 0.1 * 0.5 to the commander
    assert!((bridge.ledger().get(HeroId(2)).unwrap() - 0.5).abs() < 1e-4);
    assert!((bridge.ledger().get(HeroId(1)).unwrap() - 0.05).abs() < 1e-4);

    // nothing is delivered before the mission ends
    assert_eq!(host.hero_xp(HeroId(2)), Some(0.0));

    let report = bridge.on_end_mission(&mut host);
    assert_eq!(report.delivered, 2);
    assert!((host.hero_xp(HeroId(2)).unwrap() - 0.5).abs() < 1e-4);
    assert!(bridge.ledger().is_empty());
}

#[test]
fn test_flush_skips_retired_hero_and_delivers_rest() {
    let mut host = SandboxHost::new();
    let a = host.spawn_agent(|a| {
        a.hero = Some(HeroId(5));
        a.health = 40.0;
    });
    let b = host.spawn_agent(|a| {
        a.hero = Some(HeroId(6));
        a.health = 40.0;
    });
    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, a);
    bridge.on_agent_build(&host, b);
    bridge.on_mission_tick(&mut host, 5.0);

    host.retire_hero(HeroId(5));
    let report = bridge.on_end_mission(&mut host);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.skipped, 1);
    assert!(host.hero_xp(HeroId(6)).unwrap() > 0.0);
}

#[test]
fn test_custom_battle_earns_no_xp() {
    let mut host = SandboxHost::new();
    host.set_persistent_progression(false);
    let id = host.spawn_agent(|a| {
        a.hero = Some(HeroId(3));
        a.health = 10.0;
    });
    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, id);
    bridge.on_mission_tick(&mut host, 5.0);

    assert!(host.health(id).unwrap() > 10.0);
    assert!(bridge.ledger().is_empty());
}

#[test]
fn test_mount_heals_with_rider_medicine_and_pays_rider() {
    let mut host = SandboxHost::new();
    let rider = host.spawn_agent(|a| {
        a.hero = Some(HeroId(8));
        a.medicine = 100.0;
    });
    let horse = host.spawn_agent(|a| {
        a.is_mount = true;
        a.family = CreatureFamily::Beast;
        a.health = 50.0;
    });
    host.mount_up(rider, horse);

    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, rider);
    bridge.on_agent_build(&host, horse);
    bridge.on_mission_tick(&mut host, 1.0);

    // 100 medicine at 50% per 50 points doubles the rate
    assert!((host.health(horse).unwrap() - 52.0).abs() < 1e-5);
    assert!((bridge.ledger().get(HeroId(8)).unwrap() - 0.1).abs() < 1e-5);
}

#[test]
fn test_enemy_general_boosts_own_troops() {
    let mut host = SandboxHost::new();
    let team = host.add_team(TeamSetup::enemy());
    let general = host.spawn_agent(|a| {
        a.hero = Some(HeroId(40));
        a.medicine = 200.0;
        a.team = Some(team);
    });
    host.set_general(team, Some(general));
    let troop = host.spawn_agent(|a| {
        a.health = 50.0;
        a.team = Some(team);
    });

    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, troop);
    bridge.on_mission_tick(&mut host, 1.0);

    // 200 medicine at 25% per 50 points: modifier 2.0
    assert!((host.health(troop).unwrap() - 52.0).abs() < 1e-5);
    assert!((bridge.ledger().get(HeroId(40)).unwrap() - 0.01).abs() < 1e-5);
}

#[test]
fn test_team_change_switches_rate() {
    let mut host = SandboxHost::new();
    let enemy = host.add_team(TeamSetup::enemy());
    let ally = host.add_team(TeamSetup::ally());
    let id = host.spawn_agent(|a| {
        a.health = 50.0;
        a.team = Some(enemy);
    });

    let mut config = full_heal();
    config.rates.enemy_troop = 0.0;
    config.rates.allied_troop = 3.0;
    let mut bridge = MissionBridge::new(config);
    bridge.on_agent_build(&host, id);

    bridge.on_mission_tick(&mut host, 1.0);
    assert_eq!(host.health(id), Some(50.0));

    host.set_team(id, Some(ally));
    bridge.on_agent_team_changed(&host, id);
    bridge.on_mission_tick(&mut host, 1.0);
    assert!((host.health(id).unwrap() - 53.0).abs() < 1e-5);
}

#[test]
fn test_player_troops_fall_back_to_main_hero() {
    let mut host = SandboxHost::new();
    let team = host.add_team(TeamSetup::player());
    host.set_main_hero(Some(HeroInfo {
        id: HeroId(1),
        medicine: 100.0,
    }));
    let troop = host.spawn_agent(|a| {
        a.health = 50.0;
        a.team = Some(team);
    });

    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, troop);
    bridge.on_mission_tick(&mut host, 1.0);

    // main hero's 100 medicine at 25% per 50 points: +0.5
    assert!((host.health(troop).unwrap() - 51.5).abs() < 1e-5);
}

#[test]
fn test_alternative_formulas_run_end_to_end() {
    for formula in [QUADRATIC_ID, EVE_ONLINE_ID] {
        let mut host = SandboxHost::new();
        let id = host.spawn_agent(|a| a.health = 25.0);
        let mut bridge = MissionBridge::new(RegenConfig {
            formula: formula.to_string(),
            ..full_heal()
        });
        bridge.on_agent_build(&host, id);
        bridge.on_mission_tick(&mut host, 1.0);
        assert!(host.health(id).unwrap() > 25.0, "{}", formula);
        assert!(host.health(id).unwrap() <= 100.0, "{}", formula);
    }
}

#[test]
fn test_restart_forgets_everything() {
    let mut host = SandboxHost::new();
    let id = host.spawn_agent(|a| {
        a.hero = Some(HeroId(1));
        a.health = 50.0;
    });
    let mut bridge = MissionBridge::new(full_heal());
    bridge.on_agent_build(&host, id);
    bridge.on_mission_tick(&mut host, 1.0);

    bridge.on_clear_scene();
    assert!(bridge.engine().is_empty());
    assert!(bridge.ledger().is_empty());

    let before = host.health(id);
    bridge.on_mission_tick(&mut host, 1.0);
    assert_eq!(host.health(id), before);
}

#[test]
fn test_sample_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/battle_regen.toml");
    let config = RegenConfig::load(&path).unwrap();
    assert_eq!(config, RegenConfig::default());
}

#[test]
fn test_host_trait_object_is_usable() {
    let mut host = SandboxHost::new();
    let id = host.spawn_agent(|_| {});
    let dyn_host: &mut dyn BattleHost = &mut host;
    dyn_host.set_health(id, 3e-6).unwrap();
    assert_eq!(dyn_host.agent(id).unwrap().health, 3e-6);
}
