//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::DumpResult;
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> DumpResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> DumpResult<()> {
    let toml = toml::to_string_pretty(config)?;
    println!("{}", toml);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> DumpResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path().display().to_string();

    if manager.init(force).await? {
        ui::step_ok_detail(&ctx, "Configuration initialized", &path);
    } else {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path),
            "Use --force to overwrite",
        );
    }

    Ok(())
}
