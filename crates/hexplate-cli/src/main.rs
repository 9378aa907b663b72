//! Command line front end: run the pipeline on a drawing and export the
//! assembled compound to STEP.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use hexplate_pipeline::{present, Outcome};
use hexplate_types::{ParameterOverrides, ParameterSet};

const USAGE: &str = "usage: hexplate <drawing.svg> [--out <file.step>] [--params <overrides.json>]";

struct Args {
    drawing: PathBuf,
    out: PathBuf,
    params: ParameterSet,
}

fn parse_args() -> Result<Args, String> {
    let mut drawing: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut overrides = ParameterOverrides::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                let value = args.next().ok_or("--out needs a file path")?;
                out = Some(PathBuf::from(value));
            }
            "--params" => {
                let value = args.next().ok_or("--params needs a file path")?;
                let text = std::fs::read_to_string(&value)
                    .map_err(|e| format!("cannot read {value}: {e}"))?;
                overrides = serde_json::from_str(&text)
                    .map_err(|e| format!("invalid parameter overrides in {value}: {e}"))?;
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            other if drawing.is_none() => drawing = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument `{other}`\n{USAGE}")),
        }
    }

    let drawing = drawing.ok_or(USAGE)?;
    let out = out.unwrap_or_else(|| drawing.with_extension("step"));
    let params = ParameterSet::with_overrides(&overrides).map_err(|e| e.to_string())?;
    Ok(Args {
        drawing,
        out,
        params,
    })
}

fn run(args: &Args) -> Result<Outcome, Box<dyn std::error::Error>> {
    let compound = hexplate_pipeline::run_from_file(&args.drawing, &args.params)?;
    info!(solids = compound.len(), "pipeline produced compound");
    // No interactive viewer is wired into the CLI; export is the terminal
    // outcome here.
    Ok(present(&compound, None, &args.out)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(Outcome::Displayed) => {
            println!("displayed compound");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Exported { files }) => {
            for file in files {
                println!("wrote {}", file.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
