use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Render the blog index with bio, SEO tags, dark-mode toggle and reading times
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Site folder (or any path inside it); the root is found by walking up
    /// to the nearest folder containing .cafecito or .git
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print the rendered index to stdout instead of writing a file
    #[arg(short = 'o', long)]
    pub stdout: bool,

    /// Output file for the rendered index (default: <root>/public/index.html)
    #[arg(long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Override template folder. Files found here take precedence over the
    /// compiled defaults.
    #[arg(long, value_name = "PATH")]
    pub template_folder: Option<PathBuf>,

    /// Folder, relative to the root, holding markdown posts
    #[arg(long, value_name = "DIR")]
    pub content_dir: Option<String>,

    /// Increase logging verbosity (-v = info, -vv = debug, -vvv = trace).
    /// Default is warn level. Can also set RUST_LOG env var.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Inspect or flip the persisted light/dark preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the current preference
    Show,
    /// Switch between light and dark and persist the result
    Toggle,
}

impl Args {
    /// Get the log level filter string based on verbosity flags.
    /// Returns a filter suitable for tracing_subscriber::EnvFilter.
    pub fn log_level_filter(&self) -> String {
        let level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };

        format!("{}={}", env!("CARGO_CRATE_NAME"), level)
    }
}
