//! External providers merged on top of the file and environment layers.

pub mod file;
pub mod memory;

use crate::error::Result;
use crate::value::ValueMap;

pub use file::{FileFormat, FileSource};
pub use memory::{FnSource, MapSource};

pub type WatchCallback = Box<dyn Fn(ValueMap) + Send + Sync>;

/// A provider of extra key/value pairs, consulted on every reload in
/// registration order.
///
/// `load` is called once per reload and must be safe to call repeatedly.
/// `watch` is accepted for push-based updates; the store never calls it, so
/// the default no-op is a valid implementation.
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &str;

    fn load(&self) -> Result<ValueMap>;

    fn watch(&self, _callback: WatchCallback) -> Result<()> {
        Ok(())
    }
}
