//! CLI argument parsing for styledb

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sd")]
#[command(author, version, about = "Named prompt styles backed by CSV files", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base styles file (overrides config)
    #[arg(long)]
    pub styles: Option<PathBuf>,

    /// User styles file (overrides config)
    #[arg(long)]
    pub user_styles: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all styles
    List,

    /// Show every field of a style
    Show {
        /// Style name
        #[arg(required = true)]
        name: String,
    },

    /// Apply styles to a prompt and print the result
    Apply {
        /// Prompt text
        #[arg(required = true)]
        prompt: String,

        /// Negative prompt text
        #[arg(short, long, default_value = "")]
        negative: String,

        /// Style to apply, repeatable; applied in the order given
        #[arg(short, long = "style")]
        styles: Vec<String>,
    },

    /// Add or replace a style and save the user styles file
    Add {
        /// Style name
        #[arg(required = true)]
        name: String,

        /// Positive prompt fragment, may contain {prompt}
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// Negative prompt fragment
        #[arg(short, long, default_value = "")]
        negative: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Remove a style and save the user styles file
    Remove {
        /// Style name
        #[arg(required = true)]
        name: String,
    },

    /// Write all loaded styles to a file, backing up any existing one
    Save {
        /// Target file (default: user styles file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
