//! Placeholder values available to templates.
//! Built once per run from the project name and any user supplied variables.

use crate::constants::PROJECT_NAME_KEY;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// Ordered mapping from placeholder name to substitution value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableBinding(IndexMap<String, String>);

impl VariableBinding {
    /// Creates bindings holding only `ProjectName`.
    pub fn new<S: Into<String>>(project_name: S) -> Self {
        let mut values = IndexMap::new();
        values.insert(PROJECT_NAME_KEY.to_string(), project_name.into());
        Self(values)
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

fn key_pattern() -> &'static Regex {
    static KEY: OnceLock<Regex> = OnceLock::new();
    KEY.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid key regex"))
}

fn validate_key(key: &str) -> Result<()> {
    if key_pattern().is_match(key) {
        Ok(())
    } else {
        Err(Error::InvalidVariable(format!("'{key}' is not a valid placeholder name")))
    }
}

/// Parses a `KEY=VALUE` command line variable.
///
/// # Errors
/// * `Error::InvalidVariable` if there is no `=` or the key is not an identifier
pub fn parse_var(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::InvalidVariable(format!("expected KEY=VALUE, got '{raw}'")))?;
    let key = key.trim();
    validate_key(key)?;
    Ok((key.to_string(), value.to_string()))
}

/// Parses the contents of a variables file.
///
/// JSON is tried first, then YAML. The document must be a flat mapping whose
/// values are strings, numbers or booleans.
///
/// # Errors
/// * `Error::InvalidVariable` for unparsable documents, nested values or bad keys
pub fn parse_vars(content: &str) -> Result<IndexMap<String, String>> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content).map_err(|e| {
            Error::InvalidVariable(format!("variables file is neither JSON nor YAML: {e}"))
        })?,
    };

    let mut vars = IndexMap::new();
    for (key, value) in raw {
        validate_key(&key)?;
        let value = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::InvalidVariable(format!(
                    "'{key}' must be a string, number or boolean, got {other}"
                )))
            }
        };
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Reads and parses a variables file.
pub fn load_vars_file<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, String>> {
    let path = path.as_ref();
    debug!("Loading variables from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_vars(&content)
}

/// Builds the bindings for one run.
///
/// File variables are applied first, then `--var` flags; `ProjectName` always
/// reflects the chosen project name.
pub fn build_bindings<P: AsRef<Path>>(
    project_name: &str,
    vars_file: Option<P>,
    vars: &[String],
) -> Result<VariableBinding> {
    let mut bindings = VariableBinding::new(project_name);

    let mut extra = match vars_file {
        Some(path) => load_vars_file(path)?,
        None => IndexMap::new(),
    };
    for raw in vars {
        let (key, value) = parse_var(raw)?;
        extra.insert(key, value);
    }

    for (key, value) in extra {
        if key == PROJECT_NAME_KEY {
            warn!("Ignoring '{PROJECT_NAME_KEY}' variable, the project name is '{project_name}'.");
            continue;
        }
        bindings.insert(key, value);
    }

    Ok(bindings)
}
