use crate::configuration::Configuration;
use clap::Parser;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: &str = "3000";
pub const PORT_VARIABLE: &str = "ADMISSION_PORT";
pub const STORAGE_DIR_VARIABLE: &str = "ADMISSION_STORAGE_DIR";

/// Command line arguments win over environment variables (and `.env`).
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "admission_scheduler", about = "Hospital admission appointment scheduler")]
pub struct ConfigurationHandler {
    /// Port to listen on [env: ADMISSION_PORT] [default: 3000]
    #[arg(short, long)]
    port: Option<String>,

    /// Directory the appointments are stored in; in-memory only if unset
    /// [env: ADMISSION_STORAGE_DIR]
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Don't insert example appointments into empty storage
    #[arg(long)]
    no_seed: bool,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse().with_environment(|name| env::var(name).ok())
    }

    fn with_environment(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.port.is_none() {
            self.port = lookup(PORT_VARIABLE);
        }
        if self.storage_dir.is_none() {
            self.storage_dir = lookup(STORAGE_DIR_VARIABLE).map(PathBuf::from);
        }
        self
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.clone().unwrap_or_else(|| DEFAULT_PORT.into())
    }

    fn storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone()
    }

    fn seed_examples(&self) -> bool {
        !self.no_seed
    }
}
