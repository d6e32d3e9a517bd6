use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::coerce;
use crate::error::{Error, Result};
use crate::loader::{LayeredLoader, LoaderOptions};
use crate::sources::ConfigSource;
use crate::value::{render_text, Value, ValueMap};

/// Merged configuration with a read-through cache.
///
/// Mapping, cache and registered sources sit behind one reader/writer lock.
/// Reads share it; `set`, `reload` and `add_source` hold it exclusively for
/// their whole critical section, including every source `load` during a
/// reload. The cache has its own mutex so `get` can fill it under the shared
/// lock; writers always hold the exclusive lock, which orders them after any
/// in-flight fill.
pub struct Store {
    loader: LayeredLoader,
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    data: ValueMap,
    cache: Mutex<ValueMap>,
    sources: Vec<Arc<dyn ConfigSource>>,
    env_name: String,
}

impl StoreState {
    fn cache_mut(&mut self) -> &mut ValueMap {
        self.cache.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store {
    /// Loads `.env`, `.local.env`, `.<APP_ENV>.env` from the working
    /// directory and the process environment.
    pub fn new() -> Self {
        Self::with_options(LoaderOptions::default())
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self::with_loader(LayeredLoader::new(options))
    }

    pub fn with_loader(loader: LayeredLoader) -> Self {
        let layers = loader.load();
        Self {
            loader,
            inner: RwLock::new(StoreState {
                data: layers.values,
                env_name: layers.env_name,
                ..StoreState::default()
            }),
        }
    }

    pub fn loader(&self) -> &LayeredLoader {
        &self.loader
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached lookup. Only hits are cached.
    pub fn get(&self, key: &str) -> Option<Value> {
        let state = self.read();
        let mut cache = state.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = cache.get(key) {
            return Some(value.clone());
        }

        let value = state.data.get(key)?.clone();
        cache.insert(key.to_owned(), value.clone());
        Some(value)
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
            .map(|value| render_text(&value))
            .unwrap_or_default()
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) => render_text(&value),
            None => default.to_owned(),
        }
    }

    pub fn get_int(&self, key: &str) -> isize {
        or_zero(key, self.try_get_int(key))
    }

    pub fn get_int64(&self, key: &str) -> i64 {
        or_zero(key, self.try_get_int64(key))
    }

    pub fn get_float64(&self, key: &str) -> f64 {
        or_zero(key, self.try_get_float64(key))
    }

    pub fn get_bool(&self, key: &str) -> bool {
        or_zero(key, self.try_get_bool(key))
    }

    pub fn get_duration(&self, key: &str) -> Duration {
        or_zero(key, self.try_get_duration(key))
    }

    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        coerce::split_list(&self.get_string(key))
    }

    pub fn get_array(&self, key: &str) -> Vec<String> {
        self.get_string_slice(key)
    }

    /// Collects every `<prefix>.<sub>` entry as `sub -> value`, read straight
    /// from the mapping. Only one level of prefix is stripped.
    pub fn get_string_map(&self, prefix: &str) -> HashMap<String, Value> {
        let state = self.read();
        let prefix = format!("{prefix}.");
        state
            .data
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|sub_key| (sub_key.to_owned(), value.clone()))
            })
            .collect()
    }

    pub fn try_get_int(&self, key: &str) -> Result<Option<isize>> {
        self.try_parse(key, "integer", coerce::parse_int)
    }

    pub fn try_get_int64(&self, key: &str) -> Result<Option<i64>> {
        self.try_parse(key, "64-bit integer", coerce::parse_int64)
    }

    pub fn try_get_float64(&self, key: &str) -> Result<Option<f64>> {
        self.try_parse(key, "float", coerce::parse_float64)
    }

    pub fn try_get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.try_parse(key, "boolean", coerce::parse_bool)
    }

    pub fn try_get_duration(&self, key: &str) -> Result<Option<Duration>> {
        self.try_parse(key, "duration", coerce::parse_duration)
    }

    /// Absent keys and empty values are `Ok(None)`.
    fn try_parse<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        let text = self.get_string(key);
        if text.is_empty() {
            return Ok(None);
        }

        match parse(&text) {
            Some(parsed) => Ok(Some(parsed)),
            None => Err(Error::Coercion {
                key: key.to_owned(),
                expected,
                value: text,
            }),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let mut state = self.write();
        state.cache_mut().remove(&key);
        state.data.insert(key, value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.read().data.contains_key(key)
    }

    pub fn all(&self) -> ValueMap {
        self.read().data.clone()
    }

    /// Environment name picked by the most recent load.
    pub fn active_env(&self) -> String {
        self.read().env_name.clone()
    }

    pub fn add_source(&self, source: Arc<dyn ConfigSource>) {
        debug!(source = source.name(), "registered config source");
        self.write().sources.push(source);
    }

    pub fn source_names(&self) -> Vec<String> {
        self.read()
            .sources
            .iter()
            .map(|source| source.name().to_owned())
            .collect()
    }

    /// Rebuilds the mapping from files, environment and sources.
    ///
    /// The first failing source aborts the reload and its error is returned.
    /// The mapping then holds the file and environment layers plus every
    /// source merged before the failure; nothing is rolled back. Use
    /// [`Store::reload_atomic`] to keep the previous mapping instead.
    pub fn reload(&self) -> Result<()> {
        let mut guard = self.write();
        let state = &mut *guard;
        state.cache_mut().clear();
        state.data.clear();

        let layers = self.loader.load();
        state.data = layers.values;
        state.env_name = layers.env_name;

        for source in &state.sources {
            merge_source(&mut state.data, source.as_ref())?;
        }

        debug!(keys = state.data.len(), "reloaded configuration");
        Ok(())
    }

    /// Like [`Store::reload`] but only swaps in the new mapping once every
    /// source has loaded. On failure the store is left untouched.
    pub fn reload_atomic(&self) -> Result<()> {
        let mut guard = self.write();
        let state = &mut *guard;

        let layers = self.loader.load();
        let mut next = layers.values;
        for source in &state.sources {
            merge_source(&mut next, source.as_ref())?;
        }

        state.data = next;
        state.env_name = layers.env_name;
        state.cache_mut().clear();
        debug!(keys = state.data.len(), "reloaded configuration atomically");
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Store")
            .field("env_name", &state.env_name)
            .field("keys", &state.data.len())
            .field("sources", &state.sources.len())
            .finish()
    }
}

fn merge_source(data: &mut ValueMap, source: &dyn ConfigSource) -> Result<()> {
    let values = source.load().inspect_err(|err| {
        warn!(source = source.name(), error = %err, "config source failed to load");
    })?;
    debug!(source = source.name(), keys = values.len(), "merged config source");
    data.extend(values);
    Ok(())
}

fn or_zero<T: Default>(key: &str, parsed: Result<Option<T>>) -> T {
    match parsed {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            trace!(key, error = %err, "using zero value");
            T::default()
        }
    }
}
