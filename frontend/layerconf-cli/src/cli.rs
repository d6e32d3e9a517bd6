use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use layerconf_core::FileSource;

#[derive(Debug, Parser)]
#[command(name = "layerconf", about = "Inspect layered env configuration")]
pub struct Cli {
    /// Directory holding `.env`, `.local.env` and `.<env>.env`.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Active environment; defaults to `$APP_ENV`, then `dev`.
    #[arg(long)]
    pub env: Option<String>,

    /// Ignore the process environment layer.
    #[arg(long)]
    pub no_process_env: bool,

    /// JSON file merged on top of the env layers. Repeatable.
    #[arg(long = "json", value_name = "FILE")]
    pub json_sources: Vec<PathBuf>,

    /// TOML file merged on top of the env layers. Repeatable.
    #[arg(long = "toml", value_name = "FILE")]
    pub toml_sources: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[arg(long, default_value = "warn", env = "LAYERCONF_LOG")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print one value.
    Get {
        key: String,
        #[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
        /// Fail instead of printing a zero value when the value does not parse.
        #[arg(long)]
        strict: bool,
    },
    /// Exit 0 when the key is set, 1 otherwise.
    Has { key: String },
    /// Print every `key=value`, sorted by key.
    All {
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Print the entries under `<prefix>.` with the prefix stripped.
    Map { prefix: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    String,
    Int,
    Int64,
    Float,
    Bool,
    Duration,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// JSON files first, then TOML files, each in flag order.
    pub fn file_sources(&self) -> Vec<FileSource> {
        self.json_sources
            .iter()
            .map(|path| FileSource::json(path.clone()).required())
            .chain(
                self.toml_sources
                    .iter()
                    .map(|path| FileSource::toml(path.clone()).required()),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use layerconf_core::ConfigSource;

    use super::{Cli, Command, OutputFormat, ValueKind};

    #[test]
    fn parses_get_with_kind() {
        let cli = Cli::try_parse_from([
            "layerconf", "--dir", "/srv/app", "--env", "prod", "get", "PORT", "--as", "int",
        ])
        .expect("parse");

        assert_eq!(cli.dir.to_str(), Some("/srv/app"));
        assert_eq!(cli.env.as_deref(), Some("prod"));
        assert_eq!(cli.output, OutputFormat::Text);
        match cli.command {
            Command::Get { key, kind, strict } => {
                assert_eq!(key, "PORT");
                assert_eq!(kind, ValueKind::Int);
                assert!(!strict);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn collects_repeated_sources() {
        let cli = Cli::try_parse_from([
            "layerconf", "--json", "a.json", "--toml", "b.toml", "--json", "c.json", "all",
        ])
        .expect("parse");

        let names = cli
            .file_sources()
            .iter()
            .map(|source| source.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["json:a.json", "json:c.json", "toml:b.toml"]);
    }
}
