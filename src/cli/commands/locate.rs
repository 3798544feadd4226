//! Locate command - list discovered cache directories

use crate::cli::args::{selected_builds, LocateArgs, OutputFormat};
use crate::config::Config;
use crate::error::DumpResult;
use crate::locate::{discover, CacheLocation, Identity, Platform};
use crate::ui::{self, UiContext};
use console::style;
use std::path::PathBuf;

/// Execute the locate command
pub async fn execute(args: LocateArgs, home: Option<PathBuf>, config: &Config) -> DumpResult<()> {
    let platform = Platform::detect().ensure_supported()?;
    let identity = Identity::detect(platform, home)?;
    let builds = selected_builds(&args.build);

    let locations = discover(
        platform,
        &identity.home,
        &builds,
        config.dump.include_flatpak,
    )?;

    if locations.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No cache found");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&locations),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&locations)?),
        OutputFormat::Plain => print_plain(&locations),
    }

    Ok(())
}

fn print_table(locations: &[CacheLocation]) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Discord caches");

    println!(
        "{:<14} {:>8} {:>14}  {}",
        style("BUILD").bold(),
        style("FILES").bold(),
        style("BYTES").bold(),
        style("PATH").bold()
    );
    println!("{}", "-".repeat(72));

    for location in locations {
        println!(
            "{:<14} {:>8} {:>14}  {}",
            location.build.name(),
            location.entries.len(),
            location.readable_size(),
            location.path.display()
        );
    }

    println!();
    println!("{} cache(s)", locations.len());
}

fn print_plain(locations: &[CacheLocation]) {
    for location in locations {
        println!("{}", location.path.display());
    }
}
