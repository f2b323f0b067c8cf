use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use log::info;
use noshow_analysis::{AnalysisConfig, ExportFormat, run};

const USAGE: &str = "Usage: noshow-analysis [INPUT] [--config FILE] [--output DIR] [--no-plots] \
                     [--export csv|parquet] [--quiet]";

/// Command-line overrides, applied on top of the configuration file
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    no_plots: bool,
    export: Option<ExportFormat>,
    quiet: bool,
    help: bool,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} needs a value\n{USAGE}"))
            };
            match arg.as_str() {
                "--config" | "-c" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--output" | "-o" => parsed.output = Some(PathBuf::from(value("--output")?)),
                "--export" => {
                    let format = value("--export")?;
                    parsed.export = Some(format.parse().context("Invalid --export value")?);
                }
                "--no-plots" => parsed.no_plots = true,
                "--quiet" | "-q" => parsed.quiet = true,
                "--help" | "-h" => parsed.help = true,
                flag if flag.starts_with('-') => bail!("Unknown option {flag}\n{USAGE}"),
                input => {
                    if parsed.input.is_some() {
                        bail!("Only one input file can be given\n{USAGE}");
                    }
                    parsed.input = Some(PathBuf::from(input));
                }
            }
        }
        Ok(parsed)
    }

    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(input) = self.input {
            config = config.with_input_path(input);
        }
        if let Some(output) = self.output {
            config = config.with_output_dir(output);
        }
        if self.no_plots {
            config = config.with_plots(false);
        }
        if self.export.is_some() {
            config = config.with_export_format(self.export);
        }
        if self.quiet {
            config = config.with_progress(false);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = args.into_config()?;
    info!("Reading appointments from {}", config.input_path.display());

    let output = run(&config)
        .with_context(|| format!("Analysis of {} failed", config.input_path.display()))?;

    println!("{}", output.report.summary());
    println!("Report written to {}", output.files.json.display());
    if let Some(path) = &output.export {
        println!("Cleaned data exported to {}", path.display());
    }
    if !output.charts.is_empty() {
        println!("{} charts written", output.charts.len());
    }
    Ok(())
}
