//! Builds the flat file-and-environment mapping the store starts from.
//!
//! Layers apply in a fixed order, each overwriting identical keys from the
//! ones before it: `.env`, `.local.env`, `.<env>.env`, then the live process
//! environment.

pub mod env_file;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value::{Value, ValueMap};

pub use env_file::{parse_env_file, read_env_file};

pub const DEFAULT_ENV_VAR: &str = "APP_ENV";
pub const DEFAULT_ENV_NAME: &str = "dev";
pub const BASE_FILE: &str = ".env";
pub const LOCAL_FILE: &str = ".local.env";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Directory the env files are resolved against. `None` means the
    /// process working directory at load time.
    pub dir: Option<PathBuf>,
    /// Variable naming the active environment.
    pub env_var: String,
    /// Environment used when `env_var` is unset or empty.
    pub default_env: String,
    /// Fixed environment name; takes priority over `env_var`.
    pub env_name: Option<String>,
    pub include_process_env: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            dir: None,
            env_var: DEFAULT_ENV_VAR.to_owned(),
            default_env: DEFAULT_ENV_NAME.to_owned(),
            env_name: None,
            include_process_env: true,
        }
    }
}

impl LoaderOptions {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = env_var.into();
        self
    }

    pub fn with_default_env(mut self, default_env: impl Into<String>) -> Self {
        self.default_env = default_env.into();
        self
    }

    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = Some(env_name.into());
        self
    }

    pub fn without_process_env(mut self) -> Self {
        self.include_process_env = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLayers {
    pub env_name: String,
    pub values: ValueMap,
}

#[derive(Debug, Clone, Default)]
pub struct LayeredLoader {
    options: LoaderOptions,
}

impl LayeredLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads every layer against the live process environment. Never fails.
    pub fn load(&self) -> LoadedLayers {
        let process_env = std::env::vars_os()
            .filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            })
            .collect::<Vec<_>>();
        self.load_with_env(process_env)
    }

    /// Same as [`LayeredLoader::load`] with an explicit environment snapshot.
    pub fn load_with_env(&self, process_env: Vec<(String, String)>) -> LoadedLayers {
        let dir = self.resolve_dir();
        let env_name = self.resolve_env_name(&process_env);
        let mut values = ValueMap::new();

        for file_name in [
            BASE_FILE.to_owned(),
            LOCAL_FILE.to_owned(),
            format!(".{env_name}.env"),
        ] {
            if let Some(entries) = read_env_file(&dir.join(&file_name)) {
                merge_strings(&mut values, entries);
            }
        }

        if self.options.include_process_env {
            debug!(entries = process_env.len(), "merging process environment");
            merge_strings(&mut values, process_env);
        }

        debug!(env = %env_name, keys = values.len(), "loaded configuration layers");
        LoadedLayers { env_name, values }
    }

    fn resolve_dir(&self) -> PathBuf {
        self.options
            .dir
            .clone()
            .unwrap_or_else(|| Path::new(".").to_path_buf())
    }

    fn resolve_env_name(&self, process_env: &[(String, String)]) -> String {
        if let Some(name) = self.options.env_name.as_deref().filter(|name| !name.is_empty()) {
            return name.to_owned();
        }

        process_env
            .iter()
            .rev()
            .find(|(name, _)| *name == self.options.env_var)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .unwrap_or(self.options.default_env.as_str())
            .to_owned()
    }
}

fn merge_strings(values: &mut ValueMap, entries: Vec<(String, String)>) {
    for (key, value) in entries {
        values.insert(key, Value::String(value));
    }
}
