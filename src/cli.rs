use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

/// Sketchpoint: place input points on a diagram, collect values, export a report.
#[derive(Debug, Default, Parser)]
#[command(name = "sketchpoint", version, about)]
pub struct Cli {
    /// Directory holding the document database and settings.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Keep documents in memory only; nothing is written to the database.
    #[arg(long)]
    pub in_memory: bool,
    /// Run a non-interactive script (one command per line). Use `-` to read from stdin.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
    /// Run one shell command (may be repeated).
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    pub commands: Vec<String>,
    /// Continue executing the script after a failed command (default is fail-fast).
    #[arg(long)]
    pub continue_on_error: bool,
    /// Do not echo commands while running a script.
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    pub fn is_scripted(&self) -> bool {
        self.script.is_some() || !self.commands.is_empty()
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("sketchpoint"))
            .ok_or_else(|| anyhow!("no data directory available; pass --data-dir"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_commands() {
        let cli = Cli::parse_from([
            "sketchpoint",
            "--in-memory",
            "-c",
            "admin",
            "--command",
            "list",
            "--quiet",
        ]);
        assert!(cli.in_memory);
        assert!(cli.quiet);
        assert!(cli.is_scripted());
        assert_eq!(cli.commands, vec!["admin", "list"]);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cli = Cli::parse_from(["sketchpoint", "--data-dir", "/tmp/sp"]);
        assert!(!cli.is_scripted());
        assert_eq!(cli.resolve_data_dir().unwrap(), PathBuf::from("/tmp/sp"));
    }
}
