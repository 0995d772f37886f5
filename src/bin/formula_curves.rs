//! Formula Curves
//!
//! Prints the rate curve of every built-in formula relative to Linear, so the
//! models can be compared before picking one in the configuration.

use battle_regen::formula::{sample_curve, CurvePoint, FormulaRegistry};
use clap::Parser;
use serde::Serialize;

/// Compare regeneration formulas across the health range
#[derive(Parser, Debug)]
#[command(name = "formula-curves")]
#[command(about = "Print each regeneration formula's rate curve")]
struct Args {
    /// Samples between empty and full health, inclusive
    #[arg(long, default_value_t = 11)]
    points: usize,

    /// Only print this formula id
    #[arg(long)]
    formula: Option<String>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct Curve {
    id: String,
    name: String,
    points: Vec<CurvePoint>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("battle_regen=info")),
        )
        .init();

    let args = Args::parse();
    let registry = FormulaRegistry::with_builtins();

    let curves: Vec<Curve> = registry
        .iter()
        .filter(|f| args.formula.as_deref().map_or(true, |id| f.id() == id))
        .map(|f| Curve {
            id: f.id().to_string(),
            name: f.name().to_string(),
            points: sample_curve(f, args.points),
        })
        .collect();

    if curves.is_empty() {
        eprintln!(
            "No formula matches; registered ids: {}",
            registry.ids().join(", ")
        );
        std::process::exit(1);
    }

    if args.format == "json" {
        match serde_json::to_string_pretty(&curves) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize curves: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for curve in &curves {
        println!("{} ({})", curve.name, curve.id);
        for point in &curve.points {
            let bar = "#".repeat((point.relative_rate * 20.0).round().max(0.0) as usize);
            println!(
                "  {:>5.1}%  {:>6.3}x  {}",
                point.health_ratio * 100.0,
                point.relative_rate,
                bar
            );
        }
        println!();
    }
}
