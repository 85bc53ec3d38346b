//! `.env` support: assignments from the home `.env` file are handed to the
//! server process (the backend reads its AWS settings from the environment).

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::paths::home_env_path;

/// Reads the home `.env` file, if any, and returns the assignments that are
/// not already present in the launcher's own environment.
pub fn load_home_env() -> Result<Vec<(String, String)>> {
    match home_env_path() {
        Some(path) if path.is_file() => load_env_file(&path),
        _ => Ok(Vec::new()),
    }
}

pub fn load_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file {}", path.display()))?;
    Ok(missing_from_env(&contents, |key| std::env::var_os(key).is_some()))
}

fn missing_from_env(contents: &str, is_set: impl Fn(&str) -> bool) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(parse_env_assignment)
        .filter(|(key, _)| !is_set(key))
        .collect()
}

fn parse_env_assignment(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed).trim();

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), unquote(value.trim())))
}

fn unquote(raw: &str) -> String {
    if raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')))
    {
        return raw[1..raw.len() - 1].to_string();
    }
    raw.to_string()
}
