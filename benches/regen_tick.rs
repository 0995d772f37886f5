//! Regeneration tick benchmarks
//!
//! Run with: cargo bench --bench regen_tick

use battle_regen::core::config::RegenConfig;
use battle_regen::core::types::TeamId;
use battle_regen::experience::ExperienceLedger;
use battle_regen::formula::{FormulaRegistry, LINEAR_ID, QUADRATIC_ID};
use battle_regen::regen::RegenEngine;
use battle_regen::sandbox::{SandboxHost, TeamSetup};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const AGENTS: usize = 2048;

/// A full battlefield: two teams, every agent wounded
fn battlefield(config: &RegenConfig) -> (SandboxHost, RegenEngine) {
    let mut host = SandboxHost::new();
    let teams: [TeamId; 2] = [
        host.add_team(TeamSetup::player()),
        host.add_team(TeamSetup::enemy()),
    ];
    let mut engine = RegenEngine::from_config(config);
    for i in 0..AGENTS {
        let id = host.spawn_agent(|a| {
            a.team = Some(teams[i % 2]);
            a.health = 5.0;
            a.medicine = (i % 200) as f32;
        });
        engine.on_agent_created(&host, id, config);
    }
    (host, engine)
}

fn bench_tick(c: &mut Criterion) {
    let registry = FormulaRegistry::with_builtins();
    let mut group = c.benchmark_group("regen_tick");

    for formula_id in [LINEAR_ID, QUADRATIC_ID] {
        for (mode, threshold) in [("sequential", usize::MAX), ("parallel", 64)] {
            let config = RegenConfig {
                heal_to_full: true,
                parallel_threshold: threshold,
                ..RegenConfig::default()
            };
            let formula = registry.get(formula_id).expect("builtin formula");
            let (mut host, mut engine) = battlefield(&config);
            let mut ledger = ExperienceLedger::new();

            group.bench_with_input(
                BenchmarkId::new(mode, formula_id),
                &formula_id,
                |b, _| {
                    // tiny dt keeps everyone below the ceiling across iterations
                    b.iter(|| {
                        let report =
                            engine.on_tick(&mut host, black_box(1e-6), &config, formula, &mut ledger);
                        black_box(report)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
