//! Project automation tasks.
//!
//! Run via `cargo xtask <command>`.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Command line interface for the `xtask` helper.
#[derive(Debug, Parser)]
#[command(name = "xtask")]
struct Cli {
    /// Task to run.
    #[command(subcommand)]
    command: CommandName,
}

/// Supported automation commands.
#[derive(Debug, Subcommand)]
enum CommandName {
    /// Format the workspace and run the linter.
    Tidy,
    /// Run tests using cargo nextest.
    Test,
    /// Render every script in `demos/` to a PNG and an animated GIF.
    Demo {
        /// Curve mode passed to `bcurve`.
        #[arg(long, default_value = "composite")]
        mode: String,
    },
}

/// Common repository paths computed relative to the `xtask` crate.
#[derive(Debug, Clone)]
struct RepoPaths {
    /// Repository root directory.
    root: PathBuf,
    /// Event scripts rendered by `demo`.
    demos: PathBuf,
    /// Output directory for `demo`.
    demo_out: PathBuf,
}

impl RepoPaths {
    /// Discover repository paths from `CARGO_MANIFEST_DIR`.
    fn discover() -> Result<Self> {
        let xtask_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let root = xtask_dir
            .parent()
            .context("xtask crate must live at <repo>/xtask")?
            .to_path_buf();

        Ok(Self {
            demos: root.join("demos"),
            demo_out: root.join("target").join("demos"),
            root,
        })
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

/// Dispatch the selected `xtask` command.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = RepoPaths::discover()?;

    match cli.command {
        CommandName::Tidy => tidy(&paths),
        CommandName::Test => test(&paths),
        CommandName::Demo { mode } => demo(&paths, &mode),
    }
}

/// Run `cargo fmt` and the workspace linter.
fn tidy(paths: &RepoPaths) -> Result<()> {
    format_workspace(paths)?;
    lint_workspace(paths)?;
    format_workspace(paths)?;
    Ok(())
}

/// Run tests using cargo nextest.
fn test(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(sh, "cargo nextest run --all").run()?;
    Ok(())
}

/// Render each `demos/*.events` script with the `bcurve` binary.
fn demo(paths: &RepoPaths, mode: &str) -> Result<()> {
    let scripts: Vec<PathBuf> = sorted_files(&paths.demos)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "events"))
        .collect();
    if scripts.is_empty() {
        bail!("no .events scripts found in {}", paths.demos.display());
    }

    fs::create_dir_all(&paths.demo_out)
        .with_context(|| format!("failed to create {}", paths.demo_out.display()))?;
    let sh = repo_shell(paths)?;
    cmd!(sh, "cargo build -q -p bcurve --release").run()?;
    let bin = paths.root.join("target").join("release").join("bcurve");

    for script in &scripts {
        let stem = script
            .file_stem()
            .context("script path has no file name")?
            .to_string_lossy()
            .to_string();
        let png = paths.demo_out.join(format!("{stem}.png"));
        let gif = paths.demo_out.join(format!("{stem}.gif"));
        cmd!(sh, "{bin} render --mode {mode} {script} {png}").run()?;
        cmd!(sh, "{bin} replay --mode {mode} {script} {gif}").run()?;
    }

    println!("Demo output in {}:", paths.demo_out.display());
    for file in sorted_files(&paths.demo_out)? {
        println!("  {}", describe_file(&file)?);
    }
    Ok(())
}

/// Format the Rust workspace using rustfmt.
fn format_workspace(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;

    let config = paths.root.join("rustfmt-nightly.toml");
    if config.is_file() {
        cmd!(sh, "cargo +nightly fmt --all -- --config-path {config}").run()?;
        return Ok(());
    }

    cmd!(sh, "cargo +nightly fmt --all").run()?;
    Ok(())
}

/// Run clippy across the workspace, applying safe fixes.
fn lint_workspace(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(
        sh,
        "cargo clippy -q --fix --all --all-targets --all-features --allow-dirty --tests --examples"
    )
    .run()?;
    Ok(())
}

/// Create a verbose shell rooted at the repository root.
fn repo_shell(paths: &RepoPaths) -> Result<Shell> {
    let sh = Shell::new()?;
    sh.change_dir(&paths.root);
    Ok(sh)
}

/// Return the files in `dir`, sorted by filename.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read directory entry in {}", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Describe a file size and basename.
fn describe_file(path: &Path) -> Result<String> {
    let metadata =
        fs::metadata(path).with_context(|| format!("failed to stat file {}", path.display()))?;
    let size = human_size(metadata.len());
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    Ok(format!("{size} \t{name}"))
}

/// Render a byte count as a human-friendly string.
fn human_size(bytes: u64) -> String {
    let units = ["B", "KB", "MB", "GB", "TB"];
    let mut amount = bytes as f64;

    for unit in units {
        if amount < 1024.0 || unit == units[units.len() - 1] {
            return format!("{amount:.1} {unit}");
        }
        amount /= 1024.0;
    }

    format!("{amount:.1} PB")
}
