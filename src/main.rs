use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

mod dataset;
mod filter;
mod metrics;
mod models;
mod report;
mod tui;

use filter::Filters;
use models::Record;

#[derive(Parser)]
#[command(name = "mission-dashboard")]
#[command(about = "Internal metrics dashboard for the mission app", long_about = None)]
struct Cli {
    /// Path to the dashboard dataset
    #[arg(long, global = true, default_value = dataset::DEFAULT_DATA_PATH)]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard
    Dashboard,
    /// Print one view (or all) as plain text
    Summary {
        #[arg(long, default_value = "all")]
        view: String,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        persona: Option<String>,
    },
    /// Write a markdown report across all views
    Report {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write the computed view models as JSON
    Export {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long, default_value = "views.json")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let records = dataset::load(&cli.data)?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => tui::run(&records)?,
        Commands::Summary {
            view,
            region,
            persona,
        } => {
            let filters = build_filters(&records, region, persona)?;
            let filtered = filter::apply(&records, &filters);
            let views = metrics::all_views(&filtered);

            if view.eq_ignore_ascii_case("all") {
                for view in &views {
                    println!("{}", report::render_view_text(view));
                }
            } else {
                match views.iter().find(|v| v.name.eq_ignore_ascii_case(&view)) {
                    Some(found) => println!("{}", report::render_view_text(found)),
                    None => {
                        let names: Vec<&str> = views.iter().map(|v| v.name).collect();
                        bail!(
                            "unknown view {view:?}; expected all or one of {}",
                            names.join(", ")
                        );
                    }
                }
            }
        }
        Commands::Report {
            region,
            persona,
            out,
        } => {
            let filters = build_filters(&records, region, persona)?;
            let filtered = filter::apply(&records, &filters);
            let views = metrics::all_views(&filtered);
            let report = report::build_report(&filters, filtered.len(), &views);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            region,
            persona,
            out,
        } => {
            let filters = build_filters(&records, region, persona)?;
            let filtered = filter::apply(&records, &filters);
            let views = metrics::all_views(&filtered);
            let json = serde_json::to_string_pretty(&views)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("View data written to {}.", out.display());
        }
    }

    Ok(())
}

/// Turns the optional selector flags into filters, rejecting values outside
/// the domains present in the loaded data.
fn build_filters(
    records: &[Record],
    region: Option<String>,
    persona: Option<String>,
) -> anyhow::Result<Filters> {
    if let Some(region) = region.as_deref() {
        let domain = filter::selector_domain(records, |r| &r.region);
        if !domain.iter().any(|v| v == region) {
            bail!("unknown region {region:?}; expected one of {}", domain.join(", "));
        }
    }
    if let Some(persona) = persona.as_deref() {
        let domain = filter::selector_domain(records, |r| &r.persona);
        if !domain.iter().any(|v| v == persona) {
            bail!(
                "unknown persona {persona:?}; expected one of {}",
                domain.join(", ")
            );
        }
    }

    Ok(Filters {
        region: region.filter(|v| v != filter::ALL),
        persona: persona.filter(|v| v != filter::ALL),
    })
}
