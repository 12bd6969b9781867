//! Load configuration from XDG `config.toml` and project `.env`, then apply it to the
//! process environment with priority: **existing env > .env > XDG**.
//!
//! `ravl::RavlConfig::from_env` reads the result, so every setting (`OPENAI_API_KEY`,
//! `RETRIEVER_K`, `MAX_REVISION_COUNT`, ...) can live in any of the three places.

mod dotenv_file;
mod xdg_toml;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] ::dotenvy::Error),
}

/// Where an applied value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Dotenv,
    Xdg,
}

/// What `load_and_apply` did. Values are not recorded, only keys, since they may be secrets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// `.env` file that was read, if any.
    pub dotenv_path: Option<PathBuf>,
    /// XDG `config.toml` location that was checked (it may not exist).
    pub xdg_path: Option<PathBuf>,
    /// Keys set in the environment, sorted, with their source.
    pub applied: Vec<(String, Source)>,
}

/// Picks a value per key: keys for which `is_set` holds are skipped, otherwise `.env`
/// wins over XDG. Output is sorted by key.
fn merge(
    is_set: impl Fn(&str) -> bool,
    dotenv_map: HashMap<String, String>,
    xdg_map: HashMap<String, String>,
) -> Vec<(String, String, Source)> {
    let mut chosen: BTreeMap<String, (String, Source)> = xdg_map
        .into_iter()
        .map(|(k, v)| (k, (v, Source::Xdg)))
        .collect();
    for (k, v) in dotenv_map {
        chosen.insert(k, (v, Source::Dotenv));
    }
    chosen
        .into_iter()
        .filter(|(k, _)| !is_set(k))
        .map(|(k, (v, source))| (k, v, source))
        .collect()
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set.
///
/// * `app_name`: e.g. `"ravl"`; the XDG file is `<config home>/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, look for `.env` in this directory instead of the current one.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<LoadReport, LoadError> {
    let xdg_path = xdg_toml::config_path(app_name)?;
    let xdg_map = xdg_toml::load_env_map(&xdg_path)?;
    let dotenv_path = dotenv_file::dotenv_path(override_dir);
    let dotenv_map = match &dotenv_path {
        Some(path) => dotenv_file::load_env_map(path)?,
        None => HashMap::new(),
    };

    let mut applied = Vec::new();
    for (key, value, source) in merge(|k| std::env::var_os(k).is_some(), dotenv_map, xdg_map) {
        std::env::set_var(&key, value);
        applied.push((key, source));
    }

    Ok(LoadReport {
        dotenv_path,
        xdg_path: Some(xdg_path),
        applied,
    })
}
