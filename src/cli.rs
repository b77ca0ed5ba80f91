use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::extract::DocumentKind;

pub const DEFAULT_INPUT: &str = "src/game/sprite.c";
pub const DEFAULT_OUTPUT_DIR: &str = "res/config";

#[derive(Parser, Debug)]
#[command(
    name = "spritemeta",
    version,
    about = "Extract sprite metadata and variant tables from switch-based C source"
)]
pub struct Args {
    /// C source file holding the sprite switch functions
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory the JSON documents are written to [default: config output_dir, else res/config]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file [default: ./spritemeta.yml if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json", "quiet"])]
    pub format: String,

    /// Produce only the named documents (comma-separated: metadata, character, animated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Extract and report without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// List every idiom chain in priority order, then exit
    #[arg(long)]
    pub list_idioms: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Documents selected by `--only`, all of them when it is absent.
    pub fn documents(&self) -> Result<Vec<DocumentKind>> {
        if self.only.is_empty() {
            return Ok(DocumentKind::ALL.to_vec());
        }
        let mut kinds = Vec::new();
        for name in &self.only {
            let Some(kind) = DocumentKind::from_name(name.trim()) else {
                bail!("unknown document `{name}` (expected metadata, character or animated)");
            };
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds.sort();
        Ok(kinds)
    }
}
