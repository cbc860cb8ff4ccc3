//! Runtime configuration read from the environment

use anyhow::Context;
use std::path::PathBuf;

use taskpad_core::storage::validate_key;
use taskpad_core::task::{StoreOptions, DEFAULT_STORAGE_KEY};

pub const DATA_DIR_VAR: &str = "TASKPAD_DATA_DIR";
pub const STORAGE_KEY_VAR: &str = "TASKPAD_STORAGE_KEY";
pub const PRETTY_JSON_VAR: &str = "TASKPAD_PRETTY_JSON";

const DEFAULT_DATA_DIR: &str = ".taskpad-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub pretty_json: bool,
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration, rejecting a storage key no backend can hold
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage_key = non_empty(lookup(STORAGE_KEY_VAR))
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        validate_key(&storage_key).with_context(|| format!("{} is not usable", STORAGE_KEY_VAR))?;

        Ok(Self {
            data_dir: non_empty(lookup(DATA_DIR_VAR))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            storage_key,
            pretty_json: parse_flag(lookup(PRETTY_JSON_VAR), false),
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.storage_key.clone(),
            pretty: self.pretty_json,
        }
    }
}
