use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image_analyzer::Pipeline;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod output;
mod upload;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "image-analyzer")]
#[command(about = "Check listing photos for blur, poor exposure and interior/exterior content")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file layered over the XDG config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single image file and print its quality report
    Analyze {
        /// Path to the image
        path: PathBuf,

        /// Filename echoed in the report (defaults to the file's name)
        #[arg(long)]
        filename: Option<String>,

        /// Declared content type, e.g. image/jpeg (inferred when omitted)
        #[arg(long)]
        content_type: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run the analyzers one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut analyzer_config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            path,
            filename,
            content_type,
            format,
            pretty,
            output,
            sequential,
        } => {
            if sequential {
                analyzer_config.parallel = false;
            }
            let pipeline = Pipeline::new(analyzer_config).context("Invalid configuration")?;
            analyze_file(
                &pipeline,
                path,
                filename.as_deref(),
                content_type.as_deref(),
                format,
                pretty,
                output,
            )
        }
        Commands::Config => {
            print!("{}", config::render(&analyzer_config)?);
            Ok(())
        }
    }
}

fn analyze_file(
    pipeline: &Pipeline,
    path: PathBuf,
    filename: Option<&str>,
    content_type: Option<&str>,
    format: OutputFormat,
    pretty: bool,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let upload = upload::read_upload(&path, filename, content_type)?;
    info!(
        "Analyzing {} ({}, {} bytes)",
        upload.filename,
        upload.content_type,
        upload.buffer.len()
    );

    let report = pipeline.analyze(&upload.buffer, &upload.filename);

    match format {
        OutputFormat::Json => println!("{}", output::to_json(&report, pretty)?),
        OutputFormat::Text => println!("{}", output::to_text(&report)),
    }

    if let Some(output_path) = output_path {
        let json = output::to_json(&report, true)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write output to {}", output_path.display()))?;
        info!("Report saved to: {}", output_path.display());
    }

    Ok(())
}
