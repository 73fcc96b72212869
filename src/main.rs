// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cv_filler::extractor::extract_profile_json;
use cv_filler::{parse_profile_input, utils, CvGenerator, StyleConfig, TOKENS};

#[derive(Parser)]
#[command(name = "cvfill")]
#[command(about = "Fill CV Word templates from AI-extracted profile data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a .docx template with profile data
    Fill {
        /// Template document (.docx)
        #[arg(short, long)]
        template: PathBuf,
        /// Profile data: a JSON file or a raw AI response dump
        #[arg(short, long)]
        data: PathBuf,
        /// Output path (default: cv_<consultant>_<timestamp>.docx)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Style configuration file (YAML)
        #[arg(short, long)]
        style: Option<PathBuf>,
    },
    /// Extract profile JSON from an AI response
    Extract {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,
        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the recognized placeholder tokens
    Tokens,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fill {
            template,
            data,
            output,
            style,
        } => run_fill(&template, &data, output, style),
        Commands::Extract { input, output } => run_extract(&input, output),
        Commands::Tokens => {
            for token in TOKENS {
                println!("{token}");
            }
            Ok(())
        }
    }
}

fn run_fill(
    template: &Path,
    data: &Path,
    output: Option<PathBuf>,
    style: Option<PathBuf>,
) -> Result<()> {
    utils::validate_file_extension(&template.to_string_lossy(), &["docx"])?;

    let raw = fs::read_to_string(data)
        .with_context(|| format!("Failed to read profile data: {}", data.display()))?;
    let profile = parse_profile_input(&raw);

    let style = match style {
        Some(path) => StyleConfig::load(&path)?,
        None => StyleConfig::default(),
    };

    let output =
        output.unwrap_or_else(|| utils::output_file_path(Path::new("."), profile.nom_consultant()));
    CvGenerator::new(style).generate(template, &profile, &output)?;
    println!("{}", output.display());
    Ok(())
}

fn run_extract(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))?;
    let value = extract_profile_json(&raw)
        .with_context(|| format!("No profile JSON found in {}", input.display()))?;
    let pretty = serde_json::to_string_pretty(&value)?;
    match output {
        Some(path) => fs::write(&path, pretty)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => println!("{pretty}"),
    }
    Ok(())
}
