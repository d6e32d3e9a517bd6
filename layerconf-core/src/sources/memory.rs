use crate::error::Result;
use crate::sources::ConfigSource;
use crate::value::ValueMap;

#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    values: ValueMap,
}

impl MapSource {
    pub fn new(name: impl Into<String>, values: ValueMap) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<ValueMap> {
        Ok(self.values.clone())
    }
}

type LoadFn = Box<dyn Fn() -> Result<ValueMap> + Send + Sync>;

pub struct FnSource {
    name: String,
    load: LoadFn,
}

impl FnSource {
    pub fn new<F>(name: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> Result<ValueMap> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            load: Box::new(load),
        }
    }
}

impl std::fmt::Debug for FnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").field("name", &self.name).finish()
    }
}

impl ConfigSource for FnSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<ValueMap> {
        (self.load)()
    }
}
