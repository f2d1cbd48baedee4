// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "stockview";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
    /// Directory of the loaded config file; relative paths resolve against it.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: CatalogSection::default(),
            ui: Ui::default(),
            log: Log::default(),
            base_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub in_stock_only: Option<bool>,
    pub filter_text: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            in_stock_only: Some(false),
            filter_text: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            path: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

/// Where the session's products come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("STOCKVIEW_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set STOCKVIEW_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put settings under [catalog], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let mut config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(catalog_path) = &self.catalog.path
            && catalog_path.trim().is_empty()
        {
            bail!(
                "catalog.path in {} is empty; remove it to use the builtin catalog",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join("|"),
                level
            );
        }

        Ok(())
    }

    /// Resolves the catalog: explicit override, then `[catalog].path`, then
    /// `STOCKVIEW_CATALOG_PATH`, then the builtin products. A relative
    /// `[catalog].path` is taken from the config file's directory.
    pub fn catalog_source(&self, override_path: Option<&Path>) -> CatalogSource {
        if let Some(path) = override_path {
            return CatalogSource::File(path.to_path_buf());
        }
        if let Some(path) = &self.catalog.path {
            return CatalogSource::File(self.resolve(path));
        }
        match env::var_os("STOCKVIEW_CATALOG_PATH") {
            Some(path) if !path.is_empty() => CatalogSource::File(PathBuf::from(path)),
            _ => CatalogSource::Builtin,
        }
    }

    pub fn in_stock_only(&self) -> bool {
        self.ui.in_stock_only.unwrap_or(false)
    }

    pub fn filter_text(&self) -> &str {
        self.ui.filter_text.as_deref().unwrap_or("")
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.path.as_deref().map(|path| self.resolve(path))
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let path = PathBuf::from(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_ascii_lowercase()
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# stockview config\n# Place this file at: {}\n\nversion = 1\n\n[catalog]\n# Optional. JSON array of {{category, name, price, stocked}} objects.\n# Default is the builtin demo catalog. Relative paths are\n# resolved against this file's directory.\n# path = \"catalog.json\"\n\n[ui]\nin_stock_only = false\nfilter_text = \"\"\n\n[log]\n# Optional. Logging is off unless a path is set.\n# path = \"/tmp/stockview.log\"\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_LOG_LEVEL,
        )
    }
}
