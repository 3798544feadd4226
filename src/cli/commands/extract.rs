//! Extract command - recover the payload of a single cache file

use crate::cli::args::{ExtractArgs, OutputFormat};
use crate::error::{DumpError, DumpResult};
use crate::extract::{self, Outcome};
use crate::tagger;
use crate::ui::{self, UiContext};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Serialize)]
struct ExtractReport {
    input: PathBuf,
    output: PathBuf,
    #[serde(flatten)]
    outcome: Outcome,
    trailer_stripped: bool,
    bytes_in: usize,
    bytes_out: usize,
    file_type: Option<&'static str>,
}

/// Execute the extract command
pub async fn execute(args: ExtractArgs) -> DumpResult<()> {
    let contents = fs::read(&args.input)
        .await
        .map_err(|e| DumpError::io(format!("reading {}", args.input.display()), e))?;

    let extraction = extract::extract(&contents);
    let outcome = extraction.outcome;
    let trailer_stripped = extraction.trailer_stripped;
    let payload = extraction.into_payload();

    let dest = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    fs::write(&dest, &payload)
        .await
        .map_err(|e| DumpError::write(&dest, e))?;

    let (output, file_type) = if args.no_tag {
        (dest, tagger::sniff(&payload))
    } else {
        match tagger::tag(&dest, &payload)? {
            Some(tagged) => (tagged.path, Some(tagged.extension)),
            None => (dest, None),
        }
    };

    let report = ExtractReport {
        input: args.input,
        output,
        outcome,
        trailer_stripped,
        bytes_in: contents.len(),
        bytes_out: payload.len(),
        file_type,
    };

    match args.format {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => println!("{}", report.output.display()),
    }

    Ok(())
}

/// `<input>.out` next to the input
fn default_output(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".out");
    PathBuf::from(name)
}

fn print_report(report: &ExtractReport) {
    let ctx = UiContext::detect();

    if report.outcome.is_recognized() {
        ui::step_ok_detail(&ctx, "Payload recovered", &report.outcome.to_string());
    } else {
        ui::step_warn_hint(
            &ctx,
            "Framing not recognized",
            "the file was written unchanged",
        );
    }
    ui::key_value(&ctx, "Input", &format!("{} bytes", report.bytes_in));
    ui::key_value(&ctx, "Output", &format!("{} bytes", report.bytes_out));
    ui::key_value(&ctx, "Type", report.file_type.unwrap_or("unknown"));
    ui::key_value(&ctx, "Saved", &report.output.display().to_string());
}
