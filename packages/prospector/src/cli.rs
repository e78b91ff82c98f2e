//! Command-line interface for the prospector.

use std::path::{Path, PathBuf};
use std::thread;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{load_run_config, CONFIG_FILE, DEFAULT_EXPORT_DIR};
use crate::error::{ProspectorError, Result};
use crate::export::{refine_ore, ExportFormat};
use crate::miner::Miner;

/// Forum Prospector - Mine forum posts into CSV, JSON or HTML tables.
#[derive(Parser)]
#[command(name = "prospector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Site configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory exports are written to
    #[arg(short, long, global = true, default_value = DEFAULT_EXPORT_DIR)]
    pub export_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mine one site and export its posts.
    Mine {
        /// Site name in the configuration file
        site: String,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Mine every site listed in a YAML run file, one thread per site.
    Run {
        /// Run file (e.g. run.yml)
        run_file: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mine { site, format } => {
            mine_command(&cli.config, &site, format, &cli.export_dir)
        }
        Commands::Run { run_file } => run_command(&cli.config, &run_file, &cli.export_dir),
    }
}

/// Mine a site and export its ore cart. Returns the export path and the
/// number of records.
fn mine_and_export(
    config: &Path,
    site: &str,
    format: ExportFormat,
    export_dir: &Path,
) -> Result<(PathBuf, usize)> {
    let mut miner = Miner::from_config_file(config, site)?;
    miner.mine()?;
    let cart = miner.into_ore_cart();
    let path = refine_ore(&cart, format, export_dir)?;
    Ok((path, cart.len()))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the mine command.
fn mine_command(config: &Path, site: &str, format: ExportFormat, export_dir: &Path) -> Result<()> {
    println!(
        "{} {} from {}",
        style("Mining").bold(),
        style(site).cyan(),
        style(config.display()).green()
    );
    println!();

    let pb = spinner(format!("Mining {site}..."));
    let result = mine_and_export(config, site, format, export_dir);
    pb.finish_and_clear();

    let (path, records) = result?;
    println!("  Records: {records}");
    println!();
    println!("{} {}", style("Saved to:").green().bold(), path.display());

    Ok(())
}

/// Execute the run command.
fn run_command(config: &Path, run_file: &Path, export_dir: &Path) -> Result<()> {
    let run = load_run_config(run_file)?;
    if run.websites.is_empty() {
        return Err(ProspectorError::InvalidConfig(format!(
            "{} lists no websites",
            run_file.display()
        )));
    }

    println!(
        "{} {} sites from {}",
        style("Mining").bold(),
        run.websites.len(),
        style(run_file.display()).green()
    );
    println!();

    let pb = spinner(format!("Mining {} sites...", run.websites.len()));

    let results: Vec<(&str, Result<(PathBuf, usize)>)> = thread::scope(|scope| {
        let handles: Vec<_> = run
            .websites
            .iter()
            .map(|(site, target)| {
                let format = target.filetype;
                let handle =
                    scope.spawn(move || mine_and_export(config, site, format, export_dir));
                (site.as_str(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(site, handle)| {
                let result = handle
                    .join()
                    .unwrap_or_else(|_| Err(ProspectorError::ThreadPanicked(site.to_string())));
                (site, result)
            })
            .collect()
    });

    pb.finish_and_clear();

    let mut failed = 0;
    for (site, result) in &results {
        match result {
            Ok((path, records)) => println!(
                "  {} {} ({records} records) -> {}",
                style("✓").green().bold(),
                style(site).cyan(),
                path.display()
            ),
            Err(e) => {
                failed += 1;
                println!("  {} {}: {e}", style("✗").red().bold(), style(site).cyan());
            }
        }
    }

    if failed > 0 {
        return Err(ProspectorError::RunFailed {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_mine() {
        let cli = Cli::parse_from(["prospector", "mine", "classic_cars"]);

        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
        assert_eq!(cli.export_dir, PathBuf::from(DEFAULT_EXPORT_DIR));
        let Commands::Mine { site, format } = cli.command else {
            panic!("expected mine command");
        };
        assert_eq!(site, "classic_cars");
        assert_eq!(format, ExportFormat::Csv);
    }

    #[test]
    fn test_cli_parse_mine_with_format_and_globals() {
        let cli = Cli::parse_from([
            "prospector",
            "mine",
            "sample_forum",
            "--format",
            "json",
            "--config",
            "sites.json",
            "--export-dir",
            "out",
        ]);

        assert_eq!(cli.config, PathBuf::from("sites.json"));
        assert_eq!(cli.export_dir, PathBuf::from("out"));
        let Commands::Mine { format, .. } = cli.command else {
            panic!("expected mine command");
        };
        assert_eq!(format, ExportFormat::Json);
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["prospector", "run", "run.yml"]);

        let Commands::Run { run_file } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(run_file, PathBuf::from("run.yml"));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["prospector", "mine", "x", "--format", "xml"]).is_err());
    }
}
