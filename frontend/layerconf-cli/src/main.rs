mod cli;

use std::collections::BTreeMap;
use std::sync::Arc;

use layerconf_core::{LoaderOptions, Store, Value};

use crate::cli::{Cli, Command, OutputFormat, ValueKind};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("layerconf failed: {error}");
            std::process::exit(2);
        }
    }
}

fn run() -> layerconf_core::Result<i32> {
    let args = Cli::parse_args();
    layerconf_core::logging::init_tracing(&args.log_level);

    let store = build_store(&args)?;
    tracing::debug!(env = %store.active_env(), sources = ?store.source_names(), "store ready");

    match args.command {
        Command::Get { key, kind, strict } => {
            if !store.has(&key) {
                return Ok(1);
            }
            let value = read_typed(&store, &key, kind, strict)?;
            print_value(args.output, &value)?;
        }
        Command::Has { key } => {
            let present = store.has(&key);
            if args.output == OutputFormat::Json {
                print_value(args.output, &Value::Bool(present))?;
            }
            return Ok(if present { 0 } else { 1 });
        }
        Command::All { prefix } => {
            let entries = store
                .all()
                .into_iter()
                .filter(|(key, _)| prefix.as_deref().map_or(true, |p| key.starts_with(p)))
                .collect::<BTreeMap<_, _>>();
            print_entries(args.output, &entries)?;
        }
        Command::Map { prefix } => {
            let entries = store
                .get_string_map(&prefix)
                .into_iter()
                .collect::<BTreeMap<_, _>>();
            print_entries(args.output, &entries)?;
        }
    }

    Ok(0)
}

fn build_store(args: &Cli) -> layerconf_core::Result<Store> {
    let mut options = LoaderOptions::default().with_dir(&args.dir);
    if let Some(env) = &args.env {
        options = options.with_env_name(env);
    }
    if args.no_process_env {
        options = options.without_process_env();
    }

    let store = Store::with_options(options);
    let sources = args.file_sources();
    if !sources.is_empty() {
        for source in sources {
            store.add_source(Arc::new(source));
        }
        store.reload()?;
    }
    Ok(store)
}

fn read_typed(
    store: &Store,
    key: &str,
    kind: ValueKind,
    strict: bool,
) -> layerconf_core::Result<Value> {
    if strict {
        let value = match kind {
            ValueKind::String | ValueKind::List => None,
            ValueKind::Int => store.try_get_int(key)?.map(Value::from),
            ValueKind::Int64 => store.try_get_int64(key)?.map(Value::from),
            ValueKind::Float => store.try_get_float64(key)?.map(Value::from),
            ValueKind::Bool => store.try_get_bool(key)?.map(Value::from),
            ValueKind::Duration => store
                .try_get_duration(key)?
                .map(|duration| Value::from(format!("{duration:?}"))),
        };
        if let Some(value) = value {
            return Ok(value);
        }
    }

    Ok(match kind {
        ValueKind::String => Value::from(store.get_string(key)),
        ValueKind::Int => Value::from(store.get_int(key)),
        ValueKind::Int64 => Value::from(store.get_int64(key)),
        ValueKind::Float => Value::from(store.get_float64(key)),
        ValueKind::Bool => Value::from(store.get_bool(key)),
        ValueKind::Duration => Value::from(format!("{:?}", store.get_duration(key))),
        ValueKind::List => Value::from(store.get_string_slice(key)),
    })
}

fn print_value(output: OutputFormat, value: &Value) -> layerconf_core::Result<()> {
    match output {
        OutputFormat::Text => match value {
            Value::Array(items) => {
                for item in items {
                    println!("{}", layerconf_core::value::render_text(item));
                }
            }
            other => println!("{}", layerconf_core::value::render_text(other)),
        },
        OutputFormat::Json => println!("{}", to_json(value)?),
    }
    Ok(())
}

fn print_entries(
    output: OutputFormat,
    entries: &BTreeMap<String, Value>,
) -> layerconf_core::Result<()> {
    match output {
        OutputFormat::Text => {
            for (key, value) in entries {
                println!("{key}={}", layerconf_core::value::render_text(value));
            }
        }
        OutputFormat::Json => println!("{}", to_json(entries)?),
    }
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> layerconf_core::Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| {
        layerconf_core::Error::Config(format!("failed to render json output: {err}"))
    })
}
