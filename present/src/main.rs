//! present - command-line front end
//!
//! Renders, encodes and checks presentation documents.

#![deny(unsafe_code)]

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser;
use cli::{Cli, Commands};
use present::file_tree::File;
use present::model::encoding;
use present::{html_renderer, Context, Doc, ParseMode, RenderConfig, RenderMode};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Main entry point for the present CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            mode,
            notes,
            play,
            stylesheet,
            config,
        } => {
            let overrides = RenderOverrides {
                mode,
                notes,
                play,
                stylesheet,
            };
            handle_render_command(&input, output, config, overrides)?;
        }

        Commands::Encode { input, output } => {
            handle_encode_command(&input, output)?;
        }

        Commands::Decode { input } => {
            handle_decode_command(&input)?;
        }

        Commands::Tree { root } => {
            let tree = File::walk(&root)
                .with_context(|| format!("Failed to list documents in {}", root.display()))?;
            println!("{}", tree.to_json()?);
        }

        Commands::Check { path, titles_only } => {
            let mode = if titles_only {
                ParseMode::TitlesOnly
            } else {
                ParseMode::Full
            };
            handle_check_command(&path, mode)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins unless `--verbose` is given; warnings are shown by default
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Render flags given on the command line
struct RenderOverrides {
    mode: Option<RenderMode>,
    notes: bool,
    play: bool,
    stylesheet: Option<String>,
}

/// Handle the render command
fn handle_render_command(
    input: &Path,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: RenderOverrides,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RenderConfig::load(&path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => {
            let dir = input.parent().unwrap_or_else(|| Path::new("."));
            RenderConfig::discover(dir)
                .with_context(|| format!("Failed to load configuration from {}", dir.display()))?
        }
    };

    // Flags override the configuration file.
    config.notes_enabled |= overrides.notes;
    config.play_enabled |= overrides.play;
    if overrides.stylesheet.is_some() {
        config.stylesheet = overrides.stylesheet;
    }
    if overrides.mode.is_some() {
        config.mode = overrides.mode;
    }
    let mode = config.mode_for(input);

    let doc = parse(input, ParseMode::Full)?;
    let output = output.unwrap_or_else(|| input.with_extension("html"));
    log::info!("rendering {} as {:?}", input.display(), mode);

    html_renderer::to_html(&doc, mode, &config, &output)
        .with_context(|| format!("Failed to write HTML to {}", output.display()))?;
    println!("✓ Successfully wrote: {}", output.display());

    Ok(())
}

/// Handle the encode command
fn handle_encode_command(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let doc = parse(input, ParseMode::Full)?;
    let output = output.unwrap_or_else(|| input.with_extension("bin"));

    let file = fs::File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    encoding::encode_to(BufWriter::new(file), &doc)
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    println!("✓ Successfully wrote: {}", output.display());

    Ok(())
}

/// Handle the decode command
fn handle_decode_command(input: &Path) -> Result<()> {
    let file =
        fs::File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let doc = encoding::decode_from(BufReader::new(file))
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    println!("{}", encoding::to_json(&doc)?);

    Ok(())
}

/// Handle the check command
fn handle_check_command(path: &Path, mode: ParseMode) -> Result<()> {
    if !path.is_dir() {
        let doc = parse(path, mode)?;
        print_doc_summary(&path.display().to_string(), &doc);
        println!("\n✓ {} is valid", path.display());
        return Ok(());
    }

    let mut tree = File::walk(path)
        .with_context(|| format!("Failed to list documents in {}", path.display()))?;
    log::info!("checking {} documents", tree.documents().len());
    tree.load_docs(path, &Context::default(), mode)?;

    let documents = tree.documents();
    for file in &documents {
        if let Some(doc) = &file.doc {
            print_doc_summary(&file.url(), doc);
        }
    }
    println!("\n✓ {} documents are valid", documents.len());

    Ok(())
}

fn parse(path: &Path, mode: ParseMode) -> Result<Doc> {
    let doc = present::parse_file(path, mode)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    log::info!(
        "parsed {}: {} sections",
        path.display(),
        doc.section_count()
    );
    Ok(doc)
}

/// Print a one-line summary of a parsed document
fn print_doc_summary(name: &str, doc: &Doc) {
    println!(
        "  {} - {} ({} authors, {} sections)",
        name,
        doc.title,
        doc.authors.len(),
        doc.section_count()
    );
}
