//! Launch Records Dashboard
//!
//! Loads a table of launch records and serves an interactive page with a
//! launch-site selector, a success pie chart and a payload-vs-outcome scatter
//! plot filtered by a payload range slider.

mod callbacks;
mod charts;
mod cli;
mod error;
mod layout;
mod model;
mod server;


use anyhow::{Context, Result};
use charts::{payload_scatter, success_pie};
use clap::Parser;
use cli::{format_kg, format_pct, Cli};
use model::{LaunchTable, Outcome, SiteSelection};

fn main() -> Result<()> {
    let args = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.to_config();
    let table = LaunchTable::load(&config.data_path)
        .with_context(|| format!("cannot start without launch table {}", config.data_path.display()))?;

    if args.summary {
        return run_summary(&args, &table);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(server::run_server(&config, table))
}

fn run_summary(args: &Cli, table: &LaunchTable) -> Result<()> {
    println!("=== Launch Records ===\n");
    println!("  Rows:          {}", table.len());
    println!("  Sites:         {}", table.sites().len());
    println!("  Payload min:   {}", format_kg(table.min_payload()));
    println!("  Payload max:   {}", format_kg(table.max_payload()));
    println!();

    println!("--- Outcomes by Site ---");
    for site in table.sites() {
        let rows: Vec<_> = table.records().iter().filter(|r| r.launch_site == *site).collect();
        let successes = rows.iter().filter(|r| r.outcome == Outcome::Success).count();
        println!(
            "  {:<14} {:>3} launches  {:>3} {}  {:>3} {}  ({} success)",
            site,
            rows.len(),
            successes,
            Outcome::Success.name(),
            rows.len() - successes,
            Outcome::Failure.name(),
            format_pct(successes as f64, rows.len() as f64)
        );
    }
    println!();

    let selection = args.selection();
    if let SiteSelection::Site(site) = &selection {
        if !table.sites().contains(site) {
            println!("  (no rows for site {:?}; charts will be empty)\n", site);
        }
    }

    let pie = success_pie(table, &selection);
    println!("--- {} ---", pie.title);
    for slice in &pie.slices {
        println!(
            "  {:<14} {:>3}  ({})",
            slice.label,
            slice.value,
            format_pct(slice.value as f64, pie.total() as f64)
        );
    }
    println!();

    let range = args.payload_range(table.full_payload_range())?;
    let scatter = payload_scatter(table, &selection, range);
    println!("--- {} ---", scatter.title);
    println!("  Payload range: {} .. {}", format_kg(range.low()), format_kg(range.high()));
    println!("  Points:        {}", scatter.point_count());
    println!("  Successful:    {}", scatter.points().filter(|p| p.y == 1).count());
    for series in &scatter.series {
        let successes = series.points.iter().filter(|p| p.y == 1).count();
        println!(
            "  {:<8} {:>3} points  {:>3} successful",
            series.category,
            series.points.len(),
            successes
        );
    }

    Ok(())
}
