//! Cashflow Sweep CLI
//!
//! Runs the full scenario sweep against the sample in-memory workbook and
//! prints the merged result tables.

use anyhow::anyhow;
use cashflow_sweep::engine::{names, CalcEngine};
use cashflow_sweep::{deck, sample, run_full_sweep};
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "cashflow_sweep", version, about = "Scenario sweep for UVL/ILP cash-flow projections")]
struct Cli {
    /// Product code to sweep (UVL01..UVL03, ILP01)
    #[arg(long, default_value = "UVL01")]
    product: String,

    /// Base projection term in policy years
    #[arg(long, default_value_t = 10)]
    term: usize,

    /// CSV file of withdrawal year-range records (start_year,end_year,amount)
    #[arg(long)]
    withdrawals: Option<PathBuf>,

    /// CSV file of rider records (code,sum_assured,term_years,rate_per_mille)
    #[arg(long)]
    riders: Option<PathBuf>,

    /// Write the merged base result rows to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the run report as JSON instead of the column preview
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let started = chrono::Local::now();

    println!("Cashflow Sweep v{}", env!("CARGO_PKG_VERSION"));
    println!("==================\n");

    let withdrawals = match &cli.withdrawals {
        Some(path) => deck::load_withdrawals(path)
            .map_err(|e| anyhow!("failed to load withdrawals from {}: {}", path.display(), e))?,
        None => sample::default_withdrawals(),
    };
    let riders = match &cli.riders {
        Some(path) => deck::load_riders(path)
            .map_err(|e| anyhow!("failed to load riders from {}: {}", path.display(), e))?,
        None => sample::default_riders(),
    };

    println!("Product: {}", cli.product);
    println!("  Term: {} years", cli.term);
    println!("  Withdrawal records: {}", withdrawals.len());
    println!("  Riders: {}", riders.len());
    println!();

    let mut workbook = sample::build_workbook(&cli.product, cli.term, &withdrawals, &riders);

    let run_start = Instant::now();
    let report = run_full_sweep(&mut workbook)?;
    let elapsed = run_start.elapsed();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        println!();
    } else {
        println!("Base result rows:  {}", report.base_rows);
        println!("Rider result rows: {}", report.rider_rows);
        println!();
    }

    // Print the first scenarios' base rows to the console
    let preview = if cli.json { 0 } else { report.base_rows.min(2 * cli.term) };
    if preview > 0 {
        println!(
            "{:>5} {:>12} {:>12} {:>12} {:>12} {:>14}",
            "Year", "Premium", "Withdrawal", "Charges", "Interest", "Fund EOP"
        );
        println!("{}", "-".repeat(72));
        for row in workbook.read_table_rows(names::TBL_BASE_CF_RESULT, 0..preview)? {
            println!(
                "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                row[0].as_f64().unwrap_or(0.0),
                row[1].as_f64().unwrap_or(0.0),
                row[2].as_f64().unwrap_or(0.0),
                row[3].as_f64().unwrap_or(0.0),
                row[4].as_f64().unwrap_or(0.0),
                row[5].as_f64().unwrap_or(0.0),
            );
        }
        if report.base_rows > preview {
            println!("... ({} more rows)", report.base_rows - preview);
        }
        println!();
    }

    if let Some(path) = &cli.output {
        let mut file = File::create(path)?;
        writeln!(file, "Year,Premium,Withdrawal,Charges,Interest,FundEOP")?;
        for row in workbook.read_table_rows(names::TBL_BASE_CF_RESULT, 0..report.base_rows)? {
            writeln!(
                file,
                "{},{:.8},{:.8},{:.8},{:.8},{:.8}",
                row[0].as_f64().unwrap_or(0.0),
                row[1].as_f64().unwrap_or(0.0),
                row[2].as_f64().unwrap_or(0.0),
                row[3].as_f64().unwrap_or(0.0),
                row[4].as_f64().unwrap_or(0.0),
                row[5].as_f64().unwrap_or(0.0),
            )?;
        }
        println!("Base result rows written to: {}", path.display());
        println!();
    }

    let finished = chrono::Local::now();
    println!("Started:  {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!("Finished: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    println!("Duration: {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}
