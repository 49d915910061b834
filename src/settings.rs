//! Key/value settings store persisted as a JSON object
//!
//! Every component that needs to remember something between runs (class
//! lists, exam clock slices) reads and writes a single JSON blob under its
//! own key. A missing or corrupt file never fails a load: the store starts
//! empty and the problem is logged.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared handle to the settings file
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<Mutex<SettingsInner>>,
}

struct SettingsInner {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Open the store at `path`, falling back to an empty store when the
    /// file is missing or cannot be parsed
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self {
            inner: Arc::new(Mutex::new(SettingsInner { path, values })),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().path.clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().values.contains_key(key)
    }

    /// Read `key` as `T`. A value of the wrong shape is logged and treated
    /// as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.lock().values.get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Ignoring setting '{}': {}", key, e);
                None
            }
        }
    }

    /// Raw JSON value for `key`, for callers that migrate old layouts
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.inner.lock().values.get(key).cloned()
    }

    /// Store `value` under `key` and write the file.
    /// On a failed write the previous value is restored.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize setting '{}'", key))?;
        let mut inner = self.inner.lock();
        let previous = inner.values.insert(key.to_string(), value);
        if let Err(e) = inner.flush() {
            inner.restore(key, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Remove `key`, returning whether it was present
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.lock();
        let Some(previous) = inner.values.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = inner.flush() {
            inner.restore(key, Some(previous));
            return Err(e);
        }
        Ok(true)
    }
}

impl SettingsInner {
    fn restore(&mut self, key: &str, previous: Option<Value>) {
        match previous {
            Some(value) => self.values.insert(key.to_string(), value),
            None => self.values.remove(key),
        };
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory: {}", parent.display())
                })?;
            }
        }

        let contents =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize settings")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))?;

        debug!("Settings saved to: {}", self.path.display());
        Ok(())
    }
}

fn read_values(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        info!("No settings file at {}, starting empty", path.display());
        return Map::new();
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read settings file {}: {}", path.display(), e);
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(
                "Settings file {} is not a JSON object (found {}), starting empty",
                path.display(),
                json_kind(&other)
            );
            Map::new()
        }
        Err(e) => {
            warn!("Settings file {} is corrupt: {}", path.display(), e);
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
