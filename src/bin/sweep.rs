//! What-if sweep across spending and revenue impact, or a CSV of scenarios
//!
//! Every grid point is an independent pipeline invocation, so they run in
//! parallel. Output is one CSV row per point.
//!
//! Usage:
//!   cargo run --bin sweep -- --spending-max 10 --revenue-min -3 --revenue-max 3
//!   cargo run --bin sweep -- --scenarios scenarios.csv

use anyhow::{bail, Context, Result};
use clap::Parser;
use fiscal_stress::{
    inputs::{load_scenarios, BaselineMacro, PolicyShock, SimulationInput},
    ProjectionConfig, SimulationResult, Simulator, WarningKind,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "sweep", about = "Parallel what-if sweep")]
struct Args {
    /// Scenario CSV; when given, the grid options are ignored
    #[arg(long)]
    scenarios: Option<PathBuf>,

    #[arg(long, default_value_t = 24_500.0)]
    baseline_debt: f64,

    #[arg(long, default_value_t = 18_200.0)]
    baseline_gdp: f64,

    #[arg(long, default_value_t = 5.4, allow_hyphen_values = true)]
    current_deficit: f64,

    #[arg(long, default_value_t = 0.0)]
    spending_min: f64,

    #[arg(long, default_value_t = 10.0)]
    spending_max: f64,

    #[arg(long, default_value_t = 0.5)]
    spending_step: f64,

    #[arg(long, default_value_t = -3.0, allow_hyphen_values = true)]
    revenue_min: f64,

    #[arg(long, default_value_t = 3.0, allow_hyphen_values = true)]
    revenue_max: f64,

    #[arg(long, default_value_t = 0.5)]
    revenue_step: f64,

    #[arg(long, default_value_t = 60)]
    duration_months: u32,

    /// Affected sectors, comma separated
    #[arg(long, value_delimiter = ',')]
    sectors: Vec<String>,

    #[arg(long, default_value_t = fiscal_stress::projection::DEFAULT_BASE_YEAR)]
    base_year: i32,

    #[arg(long, default_value = "sweep_output.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    scenario: String,
    spending_commitment: f64,
    revenue_impact: f64,
    duration_months: u32,
    fiscal_strain_score: u8,
    risk_category: String,
    projected_deficit_absolute: f64,
    terminal_debt_to_gdp: f64,
    reserve_depletion_year: Option<u8>,
    liquidity: bool,
    revenue_miss: bool,
    implementation_delay: bool,
}

impl SweepRow {
    fn new(scenario: String, input: &SimulationInput, result: &SimulationResult) -> Self {
        let fired = |kind: WarningKind| result.early_warnings.iter().any(|w| w.kind == kind);
        Self {
            scenario,
            spending_commitment: input.shock.spending_commitment,
            revenue_impact: input.shock.revenue_impact,
            duration_months: input.shock.duration_months,
            fiscal_strain_score: result.fiscal_strain_score,
            risk_category: result.risk_category.to_string(),
            projected_deficit_absolute: result.projected_deficit_absolute,
            terminal_debt_to_gdp: result.terminal_debt_to_gdp().unwrap_or(0.0),
            reserve_depletion_year: result.reserve_depletion_year,
            liquidity: fired(WarningKind::Liquidity),
            revenue_miss: fired(WarningKind::RevenueMiss),
            implementation_delay: fired(WarningKind::ImplementationDelay),
        }
    }
}

/// Upper bound on the number of grid points evaluated in one sweep
const MAX_GRID_POINTS: usize = 1_000_000;

/// Inclusive range of evenly spaced values; steps are counted, not accumulated
fn grid(name: &str, min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    if step.is_nan() || step <= 0.0 || max < min {
        return Ok(vec![min]);
    }
    let count = ((max - min) / step + 1e-9).floor();
    if !count.is_finite() || count >= MAX_GRID_POINTS as f64 {
        bail!("{} range with step {} exceeds {} points", name, step, MAX_GRID_POINTS);
    }
    let count = count as usize;
    Ok((0..=count).map(|i| min + step * i as f64).collect())
}

fn grid_inputs(args: &Args) -> Result<Vec<(String, SimulationInput)>> {
    let baseline = BaselineMacro {
        baseline_debt: args.baseline_debt,
        baseline_gdp: args.baseline_gdp,
        current_deficit: args.current_deficit,
    };

    let spending_points = grid("spending", args.spending_min, args.spending_max, args.spending_step)?;
    let revenue_points = grid("revenue", args.revenue_min, args.revenue_max, args.revenue_step)?;
    let total = spending_points.len().saturating_mul(revenue_points.len());
    if total > MAX_GRID_POINTS {
        bail!("sweep of {} points exceeds {}", total, MAX_GRID_POINTS);
    }

    let mut inputs = Vec::with_capacity(total);
    for &spending in &spending_points {
        for &revenue in &revenue_points {
            let shock = PolicyShock {
                spending_commitment: spending,
                revenue_impact: revenue,
                duration_months: args.duration_months,
                sectors: args.sectors.clone(),
            };
            let name = format!("s{:.2}_r{:+.2}", spending, revenue);
            inputs.push((name, SimulationInput::new(baseline, shock)));
        }
    }
    Ok(inputs)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let inputs = match &args.scenarios {
        Some(path) => load_scenarios(path)
            .with_context(|| format!("loading scenarios from {}", path.display()))?
            .into_iter()
            .map(|s| (s.name, s.input))
            .collect(),
        None => grid_inputs(&args)?,
    };
    println!("Evaluating {} scenarios...", inputs.len());

    let simulator = Simulator::new(ProjectionConfig {
        base_year: args.base_year,
    });

    let rows: Vec<SweepRow> = inputs
        .par_iter()
        .map(|(name, input)| {
            simulator
                .simulate(input)
                .map(|result| SweepRow::new(name.clone(), input, &result))
                .with_context(|| format!("scenario {}", name))
        })
        .collect::<Result<_>>()?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let high = rows.iter().filter(|r| r.risk_category == "HIGH").count();
    println!("Output written to {}", args.output.display());
    println!("  HIGH risk: {} of {}", high, rows.len());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_inclusive() {
        let points = grid("spending", 0.0, 1.0, 0.25).unwrap();
        assert_eq!(points, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_degenerate_step_is_single_point() {
        assert_eq!(grid("revenue", -1.0, 1.0, 0.0).unwrap(), vec![-1.0]);
        assert_eq!(grid("revenue", -1.0, 1.0, f64::NAN).unwrap(), vec![-1.0]);
    }

    #[test]
    fn test_oversized_grid_rejected() {
        assert!(grid("spending", 0.0, 10.0, 1e-12).is_err());
        assert!(grid("spending", 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_grid_product_capped() {
        // Each axis is within bounds on its own: 10,001 x 6,001 points
        let args = Args::parse_from([
            "sweep",
            "--spending-step", "0.001",
            "--revenue-step", "0.001",
        ]);
        assert!(grid_inputs(&args).is_err());
    }
}
