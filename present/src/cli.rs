//! Command-line interface definitions for present

use clap::{Parser, Subcommand};
use present::RenderMode;
use std::path::PathBuf;

/// CLI structure for the present application
#[derive(Parser)]
#[command(name = "present")]
#[command(version)]
#[command(about = "Parse and render slide decks and articles", long_about = None)]
pub struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for present
#[derive(Subcommand)]
pub enum Commands {
    /// Render a document to a standalone HTML file
    Render {
        /// Document to render (.slide or .article)
        input: PathBuf,

        /// Output file (defaults to the input with an .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Layout (defaults to slides for .slide files, article otherwise)
        #[arg(short, long, value_enum)]
        mode: Option<RenderMode>,

        /// Show speaker notes
        #[arg(long)]
        notes: bool,

        /// Mark .play snippets as runnable
        #[arg(long)]
        play: bool,

        /// Link this stylesheet instead of the built-in styles
        #[arg(long)]
        stylesheet: Option<String>,

        /// Configuration file (defaults to present.toml next to the input)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Encode a document to the binary document format
    Encode {
        /// Document to encode
        input: PathBuf,

        /// Output file (defaults to the input with a .bin extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a binary document and print it as JSON
    Decode {
        /// Encoded document
        input: PathBuf,
    },

    /// Print the JSON listing of the documents under a directory
    Tree {
        /// Root directory
        #[arg(value_name = "PATH", default_value = ".")]
        root: PathBuf,
    },

    /// Parse documents and report the first error
    Check {
        /// Document, or directory to check recursively
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Only parse the title block of each document
        #[arg(long)]
        titles_only: bool,
    },
}
