//! Fiscal Stress CLI
//!
//! Runs one canonical simulation, optionally with a what-if preview alongside

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use fiscal_stress::{
    advisor,
    extraction::{Extractor, JsonExtractor},
    inputs::{self, normalizer::fields, RawInput},
    ProjectionConfig, SimulationInput, SimulationResult, Simulator, WhatIf,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "fiscal_stress", version, about = "Five-year fiscal stress simulation")]
struct Cli {
    /// Outstanding debt, billions (formatting like "$24,500" accepted)
    #[arg(long, default_value = "24500")]
    baseline_debt: String,

    /// Nominal GDP, billions
    #[arg(long, default_value = "18200")]
    baseline_gdp: String,

    /// Current deficit, percent of GDP
    #[arg(long, default_value = "5.4", allow_hyphen_values = true)]
    current_deficit: String,

    /// Extraction service JSON payload to read the shock from
    #[arg(long, conflicts_with_all = ["spending", "revenue_impact", "duration_months", "sectors"])]
    policy: Option<PathBuf>,

    /// Added spending, billions per year
    #[arg(long)]
    spending: Option<String>,

    /// Percent change to the tax base (negative = contraction)
    #[arg(long, allow_hyphen_values = true)]
    revenue_impact: Option<String>,

    /// Policy duration in months
    #[arg(long)]
    duration_months: Option<String>,

    /// Affected sectors, comma separated
    #[arg(long, value_delimiter = ',')]
    sectors: Vec<String>,

    /// Calendar label of projection year 1 (defaults to the current year)
    #[arg(long)]
    base_year: Option<i32>,

    /// What-if: replacement spending commitment
    #[arg(long)]
    what_if_spending: Option<f64>,

    /// What-if: replacement revenue impact
    #[arg(long, allow_hyphen_values = true)]
    what_if_revenue: Option<f64>,

    /// What-if: replacement duration
    #[arg(long)]
    what_if_duration: Option<u32>,

    /// Write the canonical result as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Write the debt-to-GDP projection as CSV
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Print mitigation recommendations
    #[arg(long)]
    recommend: bool,
}

impl Cli {
    fn raw_input(&self) -> Result<RawInput> {
        let mut raw = RawInput::new()
            .with(fields::BASELINE_DEBT, self.baseline_debt.as_str())
            .with(fields::BASELINE_GDP, self.baseline_gdp.as_str())
            .with(fields::CURRENT_DEFICIT, self.current_deficit.as_str());

        if let Some(path) = &self.policy {
            let document = fs::read_to_string(path)
                .with_context(|| format!("reading policy payload {}", path.display()))?;
            let extracted = JsonExtractor.extract(&document)?;
            let shock = extracted.shock;
            raw = raw
                .with(fields::SPENDING_COMMITMENT, shock.spending_commitment)
                .with(fields::REVENUE_IMPACT, shock.revenue_impact)
                .with(fields::DURATION_MONTHS, shock.duration_months)
                .with(fields::SECTORS, shock.sectors);
            return Ok(raw);
        }

        let shock_fields = [
            (fields::SPENDING_COMMITMENT, &self.spending),
            (fields::REVENUE_IMPACT, &self.revenue_impact),
            (fields::DURATION_MONTHS, &self.duration_months),
        ];
        for (field, value) in shock_fields {
            if let Some(text) = value {
                raw.set(field, text.as_str());
            }
        }
        raw.set(fields::SECTORS, self.sectors.clone());
        Ok(raw)
    }

    fn what_if(&self) -> WhatIf {
        WhatIf {
            spending_commitment: self.what_if_spending,
            revenue_impact: self.what_if_revenue,
            duration_months: self.what_if_duration,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let base_year = cli.base_year.unwrap_or_else(|| chrono::Local::now().year());
    let simulator = Simulator::new(ProjectionConfig { base_year });

    let input: SimulationInput = inputs::normalize(&cli.raw_input()?).context("invalid simulation input")?;
    let canonical = simulator.simulate(&input)?;

    let edits = cli.what_if();
    let preview = if edits.is_empty() {
        None
    } else {
        Some(simulator.what_if(&input, &edits).context("invalid what-if input")?)
    };

    println!("Fiscal Stress Simulation v{}", env!("CARGO_PKG_VERSION"));
    println!("============================\n");
    println!("Baseline: debt ${:.1}B, GDP ${:.1}B, deficit {:.2}%",
        input.baseline.baseline_debt, input.baseline.baseline_gdp, input.baseline.current_deficit);
    println!("Shock:    spending ${:.2}B/yr, revenue {:+.2}%, {} months, sectors [{}]",
        input.shock.spending_commitment,
        input.shock.revenue_impact,
        input.shock.duration_months,
        input.shock.sectors.join(", "));
    println!();

    print_summary(&canonical, preview.as_ref());

    if cli.recommend {
        println!("\nRecommendations:");
        for rec in advisor::recommend(&canonical) {
            println!("  [{:?}] {}: {}", rec.impact, rec.title, rec.description);
        }
    }

    if let Some(path) = &cli.json_out {
        let json = serde_json::to_string_pretty(&canonical)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("\nResult written to: {}", path.display());
    }

    if let Some(path) = &cli.csv_out {
        write_projection_csv(path, &canonical)?;
        println!("Projection written to: {}", path.display());
    }

    Ok(())
}

fn print_summary(canonical: &SimulationResult, preview: Option<&SimulationResult>) {
    let rows: [(&str, fn(&SimulationResult) -> String); 6] = [
        ("Fiscal strain score", |r| format!("{}/100", r.fiscal_strain_score)),
        ("Risk category", |r| r.risk_category.to_string()),
        ("Projected deficit (Y1)", |r| format!("${:.2}B", r.projected_deficit_absolute)),
        ("Deficit increase", |r| format!("{:+.2}%", r.projected_deficit_increase)),
        ("Reserve depletion", |r| match r.reserve_depletion_year {
            Some(year) => format!("Year {}", year),
            None => "beyond horizon".to_string(),
        }),
        ("Delta (revenue + expense)", |r| format!("${:+.2}B", r.delta)),
    ];

    println!("{:<28} {:>14} {:>14}", "", "Canonical", if preview.is_some() { "What-if" } else { "" });
    println!("{}", "-".repeat(58));
    for (label, cell) in rows {
        let what_if = preview.map(cell).unwrap_or_default();
        println!("{:<28} {:>14} {:>14}", label, cell(canonical), what_if);
    }

    println!("\nDebt-to-GDP projection:");
    for (i, point) in canonical.debt_to_gdp_projection.iter().enumerate() {
        let what_if = preview
            .and_then(|p| p.debt_to_gdp_projection.get(i))
            .map(|p| format!("{:>13.2}%", p.debt_to_gdp_ratio))
            .unwrap_or_default();
        println!("  {:>6} {:>13.2}% {}", point.year, point.debt_to_gdp_ratio, what_if);
    }

    println!("\nBaseline vs stress (year 1):");
    for row in &canonical.baseline_vs_stress {
        println!("  {:<10} {:>12.2} {:>12.2}", row.category.as_str(), row.baseline_value, row.stress_value);
    }

    println!("\nEarly warnings:");
    if !canonical.has_warnings() {
        println!("  none");
    }
    for warning in &canonical.early_warnings {
        println!("  {:?}: {} - {}", warning.kind, warning.title, warning.description);
    }
}

fn write_projection_csv(path: &Path, result: &SimulationResult) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for point in &result.debt_to_gdp_projection {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}
