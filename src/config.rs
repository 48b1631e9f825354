// Runtime configuration, read from CATALOG_* environment variables.

use crate::filter::TextMatch;
use crate::page::PageRequest;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const ENV_DATABASE: &str = "CATALOG_DATABASE";
pub const ENV_BIND: &str = "CATALOG_BIND";
pub const ENV_PAGE_SIZE: &str = "CATALOG_PAGE_SIZE";
pub const ENV_TEXT_MATCH: &str = "CATALOG_TEXT_MATCH";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database file
    pub database: PathBuf,

    /// Address the web server listens on
    pub bind: String,

    /// Page size used when a list request does not give one
    pub page_size: usize,

    /// Case handling for name/title filters
    pub text_match: TextMatch,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from("catalog.db"),
            bind: "0.0.0.0:3000".to_string(),
            page_size: PageRequest::DEFAULT_SIZE,
            text_match: TextMatch::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(database) = lookup(ENV_DATABASE) {
            config.database = PathBuf::from(database);
        }

        if let Some(bind) = lookup(ENV_BIND) {
            config.bind = bind;
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            let size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer, got {:?}", ENV_PAGE_SIZE, raw))?;
            anyhow::ensure!(size > 0, "{} must be greater than zero", ENV_PAGE_SIZE);
            config.page_size = size;
        }

        if let Some(raw) = lookup(ENV_TEXT_MATCH) {
            config.text_match = raw
                .parse()
                .with_context(|| format!("invalid {}", ENV_TEXT_MATCH))?;
        }

        Ok(config)
    }
}
