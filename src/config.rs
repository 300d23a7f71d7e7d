//! Runtime configuration resolved from the environment.
//!
//! Supported:
//! - GLYCOVIEW_MODEL_PATH (default `model_diabetes.json`)
//! - GLYCOVIEW_DATASET_PATH (default `diabetes.csv`)
//! - GLYCOVIEW_REQUIRE_MODEL_MANIFEST (default false)
//! - GLYCOVIEW_LOG_MODE (`auto`, `file` or `stdout`)
//! - GLYCOVIEW_LOG_FILE (default `glycoview.log`)

use std::path::PathBuf;

const DEFAULT_MODEL_PATH: &str = "model_diabetes.json";
const DEFAULT_DATASET_PATH: &str = "diabetes.csv";
const DEFAULT_LOG_FILE: &str = "glycoview.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub require_model_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            require_model_manifest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

impl AppConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("GLYCOVIEW_MODEL_PATH").filter(|v| !v.trim().is_empty()) {
            cfg.model_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("GLYCOVIEW_DATASET_PATH").filter(|v| !v.trim().is_empty()) {
            cfg.dataset_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("GLYCOVIEW_REQUIRE_MODEL_MANIFEST") {
            cfg.require_model_manifest = parse_bool(&v);
        }
        if let Some(v) = lookup("GLYCOVIEW_LOG_MODE") {
            cfg.log_mode = LogMode::parse(&v);
        }
        if let Some(v) = lookup("GLYCOVIEW_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            cfg.log_file = PathBuf::from(v);
        }

        cfg
    }
}
