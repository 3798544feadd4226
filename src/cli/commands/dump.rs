//! Dump command - copy every located cache into a timestamped directory

use crate::cli::args::{selected_builds, DumpArgs, OutputFormat};
use crate::config::schema::DumpConfig;
use crate::config::Config;
use crate::dump::{
    dump_location, run_dir_name, BuildReport, CopyOptions, CopyOutcome, DumpLayout, ExtractMode,
};
use crate::error::{DumpError, DumpResult};
use crate::locate::{discover, CacheLocation, Identity, Platform};
use crate::storage;
use crate::ui::{self, CopyProgress, TaskSpinner, UiContext};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings for one run, after applying command-line overrides to config
#[derive(Debug, Clone, PartialEq)]
struct DumpSettings {
    output: PathBuf,
    extract: ExtractMode,
    tag: bool,
    jobs: usize,
    include_flatpak: bool,
}

impl DumpSettings {
    fn resolve(args: &DumpArgs, config: &DumpConfig) -> Self {
        Self {
            output: args
                .output
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
            extract: args.extract.unwrap_or(config.extract),
            tag: config.tag_files && !args.no_tag,
            jobs: args
                .jobs
                .map(usize::from)
                .unwrap_or(config.jobs)
                .max(1),
            include_flatpak: config.include_flatpak,
        }
    }
}

/// Machine-readable result of a run
#[derive(Debug, Serialize)]
struct DumpSummary {
    platform: &'static str,
    user: String,
    run_dir: Option<PathBuf>,
    required_bytes: u64,
    available_bytes: Option<u64>,
    builds: Vec<BuildReport>,
}

/// Execute the dump command
pub async fn execute(args: DumpArgs, home: Option<PathBuf>, config: &Config) -> DumpResult<()> {
    let ctx = UiContext::detect()
        .with_auto_yes(args.noninteractive)
        .with_quiet(args.format.is_machine());
    let platform = Platform::detect().ensure_supported()?;
    let settings = DumpSettings::resolve(&args, &config.dump);
    let builds = selected_builds(&args.build);
    debug!("Dump settings: {:?}", settings);

    ui::intro(&ctx, concat!("Discord Cache Dump v", env!("CARGO_PKG_VERSION")));

    let identity = Identity::detect(platform, home)?;
    if identity.is_root {
        ui::step_warn_hint(
            &ctx,
            "Running as root",
            "the logged in user's cache will be dumped",
        );
    }
    ui::key_value(&ctx, "Logged in as", &identity.user_name);
    ui::key_value(&ctx, "Home", &identity.home.display().to_string());
    if !args.build.is_empty() {
        let names: Vec<_> = builds.iter().map(|b| b.name()).collect();
        ui::key_value(&ctx, "Builds", &names.join(", "));
    }

    ui::step_warn_hint(
        &ctx,
        "index and data_0 to data_3 are locked while Discord is running",
        "quit every Discord instance first to dump them too",
    );
    if !ui::confirm_continue(&ctx).await? {
        ui::outro_warn(&ctx, "Dump cancelled");
        return Ok(());
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Checking for existing cache directories...");
    let mut locations = discover(platform, &identity.home, &builds, settings.include_flatpak)?;
    if locations.is_empty() {
        spinner.stop_warn("No cache directories found");
    } else {
        spinner.stop(&format!("Found {} cache directories", locations.len()));
    }

    for location in &locations {
        if location.is_empty() {
            ui::step_warn(
                &ctx,
                &format!("Discord {} :: cache empty, skipping", location.build),
            );
        } else {
            ui::step_info(
                &ctx,
                &format!(
                    "Discord {} :: found {} cached files",
                    location.build,
                    location.entries.len()
                ),
            );
        }
    }
    locations.retain(|l| !l.is_empty());

    let mut summary = DumpSummary {
        platform: platform.name(),
        user: identity.user_name.clone(),
        run_dir: None,
        required_bytes: storage::required_space(&locations),
        available_bytes: None,
        builds: Vec::new(),
    };

    if locations.is_empty() {
        ui::outro_warn(&ctx, "No cache found");
        return print_summary(&summary, args.format);
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Checking storage...");
    summary.available_bytes =
        match storage::ensure_space(&settings.output, summary.required_bytes) {
            Ok(available) => available,
            Err(e) => {
                match e.shortfall() {
                    Some(shortfall) => {
                        spinner.stop_error(&format!("{} bytes need sparing", shortfall))
                    }
                    None => spinner.stop_error("Storage check failed"),
                }
                return Err(e);
            }
        };
    spinner.stop("Sufficient storage, safe to go ahead");

    let layout = DumpLayout::create(
        &settings.output,
        &run_dir_name(&Local::now()),
        identity.chown_target(),
    )?;
    let options = CopyOptions {
        extract: settings.extract.applies(platform),
        tag: settings.tag,
        owner: identity.chown_target(),
    };

    for location in &locations {
        let report = dump_build(&ctx, location, &layout, options, settings.jobs).await?;
        summary.builds.push(report);
    }

    let saved = absolute(layout.run_dir())?;
    info!("Dump saved to {}", saved.display());
    summary.run_dir = Some(saved.clone());

    ui::outro_success(&ctx, "Dump complete");
    if args.format == OutputFormat::Table {
        println!("Saved: {}", saved.display());
    }
    print_summary(&summary, args.format)
}

async fn dump_build(
    ctx: &UiContext,
    location: &CacheLocation,
    layout: &DumpLayout,
    options: CopyOptions,
    jobs: usize,
) -> DumpResult<BuildReport> {
    let destination = layout.build_dir(location.build)?;
    ui::section(
        ctx,
        &format!(
            "Copying {} files from Discord {}",
            location.entries.len(),
            location.build
        ),
    );

    let progress = CopyProgress::new(ctx, location.build.name(), location.entries.len() as u64);
    let report = dump_location(location, &destination, options, jobs, &|outcome| {
        let name = match outcome {
            CopyOutcome::Copied { path, .. } => path.file_name().and_then(|n| n.to_str()),
            CopyOutcome::Unreadable => None,
        };
        progress.advance(name);
    })
    .await;
    progress.finish();
    let report = report?;

    if report.unreadable > 0 {
        ui::step_warn_hint(
            ctx,
            &format!(
                "Cannot read client-critical cache while Discord {} is running",
                location.build
            ),
            &format!("{} file(s) unreadable", report.unreadable),
        );
    }
    ui::step_ok_detail(
        ctx,
        &format!("Copied {} cache files from Discord {}", report.copied, location.build),
        &format!("{} recovered", report.recovered),
    );
    if options.tag {
        ui::remark(
            ctx,
            &format!(
                "{} out of {} identified for Discord {}",
                report.identified, report.found, location.build
            ),
        );
    }

    Ok(report)
}

fn print_summary(summary: &DumpSummary, format: OutputFormat) -> DumpResult<()> {
    match format {
        OutputFormat::Table => {}
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Plain => {
            if let Some(ref run_dir) = summary.run_dir {
                println!("{}", run_dir.display());
            }
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> DumpResult<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| DumpError::io(format!("resolving {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::Build;

    fn args(extra: &[&str]) -> DumpArgs {
        use crate::cli::args::{Cli, Commands};
        use clap::Parser;

        let argv = ["dcdump", "dump"].iter().chain(extra.iter()).copied();
        match Cli::parse_from(argv).command {
            Commands::Dump(args) => args,
            _ => panic!("expected Dump command"),
        }
    }

    #[test]
    fn settings_fall_back_to_config() {
        let config = DumpConfig {
            output_dir: PathBuf::from("/var/dumps"),
            extract: ExtractMode::Always,
            tag_files: true,
            jobs: 6,
            include_flatpak: false,
        };
        let settings = DumpSettings::resolve(&args(&[]), &config);
        assert_eq!(
            settings,
            DumpSettings {
                output: PathBuf::from("/var/dumps"),
                extract: ExtractMode::Always,
                tag: true,
                jobs: 6,
                include_flatpak: false,
            }
        );
    }

    #[test]
    fn flags_override_config() {
        let config = DumpConfig::default();
        let settings = DumpSettings::resolve(
            &args(&["-o", "out", "--extract", "never", "--no-tag", "-j", "2"]),
            &config,
        );
        assert_eq!(settings.output, PathBuf::from("out"));
        assert_eq!(settings.extract, ExtractMode::Never);
        assert!(!settings.tag);
        assert_eq!(settings.jobs, 2);
    }

    #[test]
    fn zero_jobs_in_config_still_copies() {
        let config = DumpConfig {
            jobs: 0,
            ..Default::default()
        };
        assert_eq!(DumpSettings::resolve(&args(&[]), &config).jobs, 1);
    }

    #[test]
    fn summary_serializes() {
        let summary = DumpSummary {
            platform: "Linux",
            user: "alice".to_string(),
            run_dir: Some(PathBuf::from("/tmp/dump/2024-03-09--07-05-01")),
            required_bytes: 10,
            available_bytes: Some(100),
            builds: vec![BuildReport {
                build: Build::Canary,
                source: PathBuf::from("/cache"),
                destination: PathBuf::from("/tmp/dump/2024-03-09--07-05-01/Canary"),
                found: 2,
                copied: 1,
                unreadable: 1,
                recovered: 1,
                identified: 0,
                bytes: 10,
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["builds"][0]["build"], "canary");
        assert_eq!(json["builds"][0]["unreadable"], 1);
        assert_eq!(json["available_bytes"], 100);
    }
}
