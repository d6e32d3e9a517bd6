//! Opt-in process-wide store.
//!
//! Nothing is installed implicitly. Application startup builds a [`Store`]
//! and hands it to [`install_default`] exactly once; later code reads it
//! back through [`default_store`]. Passing the store explicitly remains the
//! preferred wiring.

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::store::Store;

static DEFAULT_STORE: OnceLock<Store> = OnceLock::new();

pub fn install_default(store: Store) -> Result<&'static Store> {
    DEFAULT_STORE
        .set(store)
        .map_err(|_| Error::Config("default store is already installed".to_owned()))?;
    DEFAULT_STORE
        .get()
        .ok_or_else(|| Error::Config("default store is unavailable".to_owned()))
}

pub fn default_store() -> Option<&'static Store> {
    DEFAULT_STORE.get()
}
