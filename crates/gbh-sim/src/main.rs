use chrono::{Local, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gbh_sim::analytics::analyze;
use gbh_sim::cli::{Args, Command};
use gbh_sim::data::financial::generate_financial_series;
use gbh_sim::data::transactions::generate_transactions;
use gbh_sim::error::SimResult;
use gbh_sim::random::sim_rng;
use gbh_sim::registry::TerritoryCategory;
use gbh_sim::results::{host_name, write_report, RunContext, SnapshotReport, SCHEMA_VERSION};
use gbh_sim::snapshot::{Snapshot, TerritorySnapshot};

fn print_json<T: Serialize>(value: &T) -> SimResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> SimResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let profile = args.resolve_profile()?;
    let category = args.category_filter()?;
    let mut rng = sim_rng(profile.seed);
    let now = Local::now().naive_local();

    match args.command {
        Command::Registry => {
            for category in TerritoryCategory::ALL {
                println!("{category} [{}]:", category.color());
                for territory in category.territories() {
                    println!("- {} ({})", territory.name, territory.stores.join(", "));
                }
            }
        }
        Command::Financial { .. } => {
            let end = profile.end_date.or(profile.anchor.map(|anchor| anchor.date()));
            let series = generate_financial_series(&mut rng, profile.start_date, end)?;
            print_json(&series)?;
        }
        Command::Territories { .. } => {
            let snapshot = TerritorySnapshot::generate(&mut rng);
            match category {
                Some(category) => print_json(&snapshot.in_category(category).collect::<Vec<_>>())?,
                None => print_json(&snapshot.territories)?,
            }
        }
        Command::Stores => {
            print_json(&TerritorySnapshot::generate(&mut rng).store_statistics())?;
        }
        Command::Kpi => {
            print_json(&TerritorySnapshot::generate(&mut rng).kpi_summary())?;
        }
        Command::Transactions { .. } => {
            let anchor = profile.anchor.unwrap_or(now);
            print_json(&generate_transactions(&mut rng, profile.transactions, anchor)?)?;
        }
        Command::Analyze { .. } => {
            let snapshot = Snapshot::generate(&mut rng, &profile.snapshot_request(now))?;
            print_json(&analyze(&snapshot, &profile.analytics_options())?)?;
        }
        Command::Snapshot { .. } => {
            let snapshot = Snapshot::generate(&mut rng, &profile.snapshot_request(now))?;
            let analytics = analyze(&snapshot, &profile.analytics_options())?;
            let context = RunContext {
                schema_version: SCHEMA_VERSION,
                label: profile.label.clone(),
                created_at: Utc::now(),
                host: host_name(),
                seed: profile.seed,
                start_date: profile.start_date,
                end_date: profile.end_date,
                fingerprint: snapshot.fingerprint()?,
            };
            let report = SnapshotReport::new(context, snapshot, analytics);
            let out_file = write_report(&args.results_dir, &report)?;
            info!(path = %out_file.display(), fingerprint = %report.context.fingerprint, "wrote snapshot report");
            println!("wrote snapshot: {}", out_file.display());
        }
    }

    Ok(())
}
