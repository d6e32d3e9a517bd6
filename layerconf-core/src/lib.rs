//! Layered process configuration: `.env` style files, the live process
//! environment and pluggable sources merged into one typed store.

pub mod coerce;
pub mod error;
pub mod global;
pub mod loader;
pub mod logging;
pub mod sources;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use global::{default_store, install_default};
pub use loader::{LayeredLoader, LoadedLayers, LoaderOptions};
pub use sources::{ConfigSource, FileFormat, FileSource, FnSource, MapSource, WatchCallback};
pub use store::Store;
pub use value::{Value, ValueMap};
