use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orbis::options::Options;
use orbis::{DemoKind, Viewer};

/// Interactive globe demos.
#[derive(Debug, Parser)]
#[command(name = "orbis", version, about)]
struct Cli {
    /// Demo to open: cube, globe or capitals.
    #[arg(default_value_t = DemoKind::Capitals)]
    demo: DemoKind,

    /// TOML options file. Missing fields use defaults.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Globe texture image (PNG or JPEG). Overrides `display.texture_path`.
    #[arg(long, value_name = "PATH")]
    texture: Option<PathBuf>,

    /// Print the options JSON Schema and exit.
    #[arg(long)]
    schema: bool,
}

#[allow(clippy::print_stdout)]
fn print_schema() -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(&Options::json_schema())?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();

    if cli.schema {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("failed to serialize schema: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let mut options = match &cli.options {
        Some(path) => match Options::load(path) {
            Ok(options) => {
                log::info!("loaded options from {}", path.display());
                options
            }
            Err(e) => {
                log::error!("{}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    if let Some(path) = &cli.texture {
        options.display.texture_path = path.display().to_string();
    }

    let viewer = Viewer::builder()
        .with_demo(cli.demo)
        .with_options(options)
        .build();
    match viewer.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
