#![allow(
    clippy::needless_pass_by_value,    // clap hands over owned values
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
)]

//! textflow CLI - reading-order text from recorded OCR detections
//!
//! Reads EasyOCR-shaped detection JSON and prints the reconstructed text or
//! the structured result.

mod config;
mod input;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use config::{Config, OutputConfig};
use indicatif::{ProgressBar, ProgressStyle};
use input::{DetectionDocument, PageOverrides};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use textflow_core::{reconstruct, ReadingOrderConfig, StructuredResult};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Default log filter; `RUST_LOG` takes precedence
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain reconstructed text
    Text,
    /// Structured result (text, mime type, page metadata, confidence)
    Json,
}

impl OutputFormat {
    fn from_config(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow!("Unknown output format in config: '{name}' (expected text or json)"))
    }

    /// Name as written in `[output] format`
    const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    fn render(self, result: &StructuredResult) -> Result<String> {
        match self {
            Self::Text => Ok(format!("{}\n", result.text)),
            Self::Json => {
                let mut json = serde_json::to_string_pretty(result)
                    .context("Failed to serialize result to JSON")?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "textflow")]
#[command(version, about = "Reconstruct reading-order text from OCR detections", long_about = None)]
struct Args {
    /// Suppress everything except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ./.textflow.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct text from one detection file
    Compose {
        /// Detection JSON file, or - for stdin
        input: PathBuf,

        /// Page width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Page height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Source image; page dimensions are read from its header
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,

        /// Line-height threshold in pixels
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reconstruct text from many detection files
    Batch {
        /// Detection JSON files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for <stem>.txt / <stem>.json outputs
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Page width; overrides the width recorded in every input file
        #[arg(long)]
        width: Option<u32>,

        /// Page height; overrides the height recorded in every input file
        #[arg(long)]
        height: Option<u32>,

        /// Line-height threshold in pixels
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Process files concurrently
        #[arg(long)]
        parallel: bool,

        /// Keep going after a file fails
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.log_filter()),
    )
    .format_timestamp(None)
    .init();

    let config = Config::resolve(args.config.as_deref())?;

    match args.command {
        Commands::Compose {
            input,
            width,
            height,
            image,
            threshold,
            format,
            output,
        } => {
            let reading_order = config.reading_order(threshold)?;
            let format = resolve_format(format, &config)?;
            compose_command(
                &input,
                PageOverrides { width, height },
                image.as_deref(),
                &reading_order,
                format,
                output.as_deref(),
            )
        }
        Commands::Batch {
            inputs,
            output_dir,
            width,
            height,
            threshold,
            format,
            parallel,
            continue_on_error,
        } => {
            let reading_order = config.reading_order(threshold)?;
            let format = resolve_format(format, &config)?;
            let options = BatchOptions {
                output_dir,
                page: PageOverrides { width, height },
                reading_order,
                format,
                parallel,
                continue_on_error,
            };
            batch_command(&inputs, &options, verbosity)
        }
        Commands::Config => config_show(&config),
    }
}

fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat> {
    match (flag, config.output_format()) {
        (Some(format), _) => Ok(format),
        (None, Some(name)) => OutputFormat::from_config(name),
        (None, None) => Ok(OutputFormat::Text),
    }
}

fn compose_command(
    input: &Path,
    page: PageOverrides,
    image: Option<&Path>,
    reading_order: &ReadingOrderConfig,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let doc = DetectionDocument::load(input)?;
    let metadata = doc.page(page, image)?;
    log::debug!(
        "{}: {} detection(s), page {}x{}",
        input.display(),
        doc.detections.len(),
        metadata.width,
        metadata.height
    );

    let result = reconstruct(&doc.detections, metadata, reading_order)
        .with_context(|| format!("Failed to reconstruct text from {}", input.display()))?;
    let rendered = format.render(&result)?;

    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout"),
    }
}

struct BatchOptions {
    output_dir: PathBuf,
    page: PageOverrides,
    reading_order: ReadingOrderConfig,
    format: OutputFormat,
    parallel: bool,
    continue_on_error: bool,
}

impl BatchOptions {
    /// Output path per input, in input order.
    ///
    /// Inputs that share a file stem get `-2`, `-3`, ... suffixes, so no two
    /// inputs ever write the same file.
    fn plan_outputs(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let ext = self.format.extension();
        let mut taken: HashSet<PathBuf> = HashSet::with_capacity(inputs.len());

        inputs
            .iter()
            .map(|input| {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let mut path = self.output_dir.join(format!("{stem}.{ext}"));
                let mut suffix = 2usize;
                while !taken.insert(path.clone()) {
                    path = self.output_dir.join(format!("{stem}-{suffix}.{ext}"));
                    suffix += 1;
                }
                if suffix > 2 {
                    log::warn!(
                        "Output name for {} already used; writing {}",
                        input.display(),
                        path.display()
                    );
                }
                path
            })
            .collect()
    }

    fn process_one(&self, input: &Path, output: &Path) -> Result<()> {
        let doc = DetectionDocument::load(input)?;
        let metadata = doc.page(self.page, None)?;
        let result = reconstruct(&doc.detections, metadata, &self.reading_order)
            .with_context(|| format!("Failed to reconstruct text from {}", input.display()))?;

        fs::write(output, self.format.render(&result)?)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?;
        log::debug!("{} -> {}", input.display(), output.display());
        Ok(())
    }
}

fn batch_command(inputs: &[PathBuf], options: &BatchOptions, verbosity: Verbosity) -> Result<()> {
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.output_dir.display()
        )
    })?;

    let total_files = inputs.len();
    if verbosity.should_show_output() {
        let mode = if options.parallel {
            " (parallel)"
        } else {
            " (sequential)"
        };
        eprintln!(
            "{} Processing {} files{mode}...",
            "Info:".blue().bold(),
            total_files.to_string().cyan()
        );
    }

    // Hidden in quiet mode
    let progress = if verbosity.should_show_output() {
        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("█▓▒░  "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let start_time = Instant::now();
    let outputs = options.plan_outputs(inputs);
    let run = |input: &Path, output: &Path| {
        progress.set_message(input.display().to_string());
        let outcome = options.process_one(input, output);
        progress.inc(1);
        outcome
    };

    let outcomes: Vec<(&PathBuf, Result<()>)> = if options.parallel {
        inputs
            .par_iter()
            .zip(outputs.par_iter())
            .map(|(input, output)| (input, run(input, output)))
            .collect()
    } else {
        let mut outcomes = Vec::with_capacity(total_files);
        for (input, output) in inputs.iter().zip(outputs.iter()) {
            let outcome = run(input, output);
            let failed = outcome.is_err();
            outcomes.push((input, outcome));
            if failed && !options.continue_on_error {
                break;
            }
        }
        outcomes
    };
    progress.finish_and_clear();

    let mut failed = 0usize;
    for (input, outcome) in &outcomes {
        if let Err(e) = outcome {
            failed += 1;
            eprintln!("{} {}: {e:#}", "Failed:".red().bold(), input.display());
        }
    }
    let succeeded = outcomes.len() - failed;
    let skipped = total_files - outcomes.len();

    if verbosity.should_show_output() {
        eprintln!("\n{}", "=== Batch Summary ===".bold());
        eprintln!("{:<16} {}", "Total files:", total_files.to_string().cyan());
        eprintln!("{:<16} {}", "Succeeded:", succeeded.to_string().green());
        eprintln!(
            "{:<16} {}",
            "Failed:",
            if failed > 0 {
                failed.to_string().red()
            } else {
                failed.to_string().normal()
            }
        );
        eprintln!("{:<16} {}", "Skipped:", skipped.to_string().yellow());
        eprintln!(
            "{:<16} {:.2}s",
            "Total time:",
            start_time.elapsed().as_secs_f64()
        );
    }

    if failed > 0 && !options.continue_on_error {
        bail!("{failed} of {total_files} file(s) failed");
    }
    Ok(())
}

fn config_show(config: &Config) -> Result<()> {
    let effective = Config {
        layout: Some(config.reading_order(None)?),
        output: Some(OutputConfig {
            format: Some(resolve_format(None, config)?.name().to_string()),
        }),
    };
    let rendered = toml::to_string_pretty(&effective).context("Failed to render config")?;
    print!("{rendered}");
    Ok(())
}
