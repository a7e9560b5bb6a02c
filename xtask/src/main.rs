//! `cargo xtask` build tasks.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Build tasks for the orbis workspace")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the wasm package and stage it with its assets under `web/`.
    BuildWeb {
        /// Build without optimizations.
        #[arg(long)]
        dev: bool,
    },
}

const WASM_TARGET: &str = "wasm32-unknown-unknown";

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn run(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn {cmd:?}"))?;
    if !status.success() {
        bail!("{cmd:?} exited with {status}");
    }
    Ok(())
}

fn build_web(dev: bool) -> Result<()> {
    let root = workspace_root();
    let profile = if dev { "debug" } else { "release" };

    let mut cargo = Command::new(env!("CARGO"));
    let _ = cargo.current_dir(&root).args([
        "rustc",
        "--lib",
        "--crate-type",
        "cdylib",
        "--target",
        WASM_TARGET,
        "--no-default-features",
        "--features",
        "web",
    ]);
    if !dev {
        let _ = cargo.arg("--release");
    }
    run(&mut cargo)?;

    let wasm = root
        .join("target")
        .join(WASM_TARGET)
        .join(profile)
        .join("orbis.wasm");
    let out_dir = root.join("web").join("pkg");
    run(Command::new("wasm-bindgen")
        .arg("--target")
        .arg("web")
        .arg("--no-typescript")
        .arg("--out-dir")
        .arg(&out_dir)
        .arg(&wasm))
    .context("wasm-bindgen failed (install with `cargo install wasm-bindgen-cli`)")?;

    copy_dir(&root.join("assets").join("textures"), &root.join("web").join("assets").join("textures"))?;

    println!("web build ready in {}", root.join("web").display());
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    std::fs::create_dir_all(to).with_context(|| format!("creating {}", to.display()))?;
    for entry in std::fs::read_dir(from).with_context(|| format!("reading {}", from.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            let _ = std::fs::copy(entry.path(), to.join(entry.file_name()))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    match Cli::parse().task {
        Task::BuildWeb { dev } => build_web(dev),
    }
}
