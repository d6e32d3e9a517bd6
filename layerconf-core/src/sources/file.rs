use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sources::ConfigSource;
use crate::value::{flatten_into, ValueMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn label(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Structured file whose nested tables become dot-separated keys.
///
/// A missing file loads as empty unless the source is marked required.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
    format: FileFormat,
    required: bool,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        let path = path.into();
        Self {
            name: format!("{}:{}", format.label(), path.display()),
            path,
            format,
            required: false,
        }
    }

    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content).map_err(|err| {
                Error::Config(format!(
                    "failed to parse config '{}': {err}",
                    self.path.display()
                ))
            }),
            FileFormat::Toml => toml::from_str(content).map_err(|err| {
                Error::Config(format!(
                    "failed to parse config '{}': {err}",
                    self.path.display()
                ))
            }),
        }
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<ValueMap> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound && !self.required => {
                debug!(path = %self.path.display(), "optional config file not present");
                return Ok(ValueMap::new());
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(format!(
                    "config file '{}'",
                    self.path.display()
                )));
            }
            Err(err) => {
                return Err(Error::Config(format!(
                    "failed to read config '{}': {err}",
                    self.path.display()
                )));
            }
        };

        let parsed = self.parse(&content)?;
        if !parsed.is_object() {
            return Err(Error::Config(format!(
                "config file '{}' must contain an object at root",
                self.path.display()
            )));
        }

        let mut values = ValueMap::new();
        flatten_into("", parsed, &mut values);
        debug!(source = %self.name, keys = values.len(), "loaded config file");
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::FileSource;
    use crate::error::Error;
    use crate::sources::ConfigSource;

    #[test]
    fn json_file_flattens_nested_objects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"host": "0.0.0.0", "port": 8080}, "features": ["a", "b"]}"#,
        )
        .expect("write json");

        let values = FileSource::json(&path).load().expect("load");
        assert_eq!(values["server.host"], json!("0.0.0.0"));
        assert_eq!(values["server.port"], json!(8080));
        assert_eq!(values["features"], json!(["a", "b"]));
    }

    #[test]
    fn toml_file_flattens_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "name = \"svc\"\n\n[database]\nurl = \"postgres://db\"\npool = 4\nssl = true\n",
        )
        .expect("write toml");

        let source = FileSource::toml(&path);
        let values = source.load().expect("load");
        assert!(source.name().starts_with("toml:"));
        assert_eq!(values["name"], json!("svc"));
        assert_eq!(values["database.url"], json!("postgres://db"));
        assert_eq!(values["database.pool"], json!(4));
        assert_eq!(values["database.ssl"], json!(true));
    }

    #[test]
    fn missing_optional_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let values = FileSource::json(dir.path().join("absent.json"))
            .load()
            .expect("load");
        assert!(values.is_empty());
    }

    #[test]
    fn missing_required_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = FileSource::json(dir.path().join("absent.json"))
            .required()
            .load()
            .expect_err("required file is missing");
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[test]
    fn rejects_non_object_roots_and_bad_syntax() {
        let dir = tempfile::tempdir().expect("tempdir");
        let list = dir.path().join("list.json");
        std::fs::write(&list, "[1, 2]").expect("write");
        let error = FileSource::json(&list).load().expect_err("array root");
        assert!(error.to_string().contains("must contain an object"));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "key = ").expect("write");
        let error = FileSource::toml(&broken).load().expect_err("bad toml");
        assert!(error.to_string().contains("failed to parse config"));
    }
}
