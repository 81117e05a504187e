mod cli;

use clap::Parser;
use log::info;
use osquery_table::prelude::*;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

use crate::cli::Args;

const TABLE_NAME: &str = "environment";

#[derive(Debug, Default, Clone, PartialEq)]
struct EnvironmentRow {
    name: String,
    value: String,
    length: i32,
}

impl EnvironmentRow {
    fn new(name: String, value: String) -> Self {
        let length = i32::try_from(value.len()).unwrap_or(i32::MAX);
        EnvironmentRow {
            name,
            value,
            length,
        }
    }
}

impl RowDefinition for EnvironmentRow {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("name", self.name.as_str()).with_options(ColumnOptions::INDEX),
            Field::new("value", self.value.as_str()),
            Field::new("length", self.length),
        ]
    }
}

// With `name = ...` constraints only the requested variables are read,
// otherwise the whole environment is listed. osquery still applies every
// constraint to the rows afterwards.
fn generate(ctx: &CallContext, query: &QueryContext) -> Result<Vec<EnvironmentRow>, GenerateError> {
    if ctx.is_cancelled() {
        return Err("extension is shutting down".into());
    }

    let wanted: Vec<&str> = query
        .get("name")
        .map(|list| list.expressions(Operator::Equals).collect())
        .unwrap_or_default();

    // Names and values need not be UTF-8; they are rendered lossily.
    if wanted.is_empty() {
        return Ok(std::env::vars_os()
            .map(|(name, value)| {
                EnvironmentRow::new(
                    name.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect());
    }

    Ok(wanted
        .into_iter()
        .filter_map(|name| {
            std::env::var_os(name).map(|value| {
                EnvironmentRow::new(name.to_string(), value.to_string_lossy().into_owned())
            })
        })
        .collect())
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let table = TablePlugin::new(TABLE_NAME, EnvironmentRow::default(), generate)
        .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
    let plugins: Vec<Arc<dyn OsqueryPlugin>> = vec![Arc::new(table)];
    let handler = ExtensionHandler::new(plugins)
        .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

    let request = ExtensionPluginRequest::from([
        ("action".to_string(), args.action.as_str().to_string()),
        ("context".to_string(), args.context),
    ]);

    info!("Sending {} request to {TABLE_NAME}", args.action.as_str());
    let response = handler
        .handle_call("table", TABLE_NAME, request)
        .map_err(|e| Error::new(ErrorKind::NotFound, e))?;

    let status = response.status.unwrap_or_default();
    if status.code != Some(0) {
        let message = status.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(Error::other(message));
    }

    let rows = response.response.unwrap_or_default();
    let out = serde_json::to_string_pretty(&rows).map_err(Error::other)?;
    println!("{out}");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn name_equals(names: &[&str]) -> QueryContext {
        let mut list = ConstraintList::new(ColumnType::Text);
        for name in names {
            list.add_constraint(Operator::Equals, *name);
        }
        let mut query = QueryContext::new();
        query.insert("name", list);
        query
    }

    #[test]
    fn test_environment_columns() {
        let table = TablePlugin::new(TABLE_NAME, EnvironmentRow::default(), generate).unwrap();
        let routes = table.routes();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].get("name"), Some(&"name".to_string()));
        assert_eq!(routes[0].get("op"), Some(&"1".to_string()));
        assert_eq!(routes[2].get("type"), Some(&"INTEGER".to_string()));
    }

    #[test]
    fn test_generate_with_name_constraint() {
        let rows = generate(
            &CallContext::background(),
            &name_equals(&["PATH", "TABLE_ENVIRONMENT_SURELY_UNSET"]),
        )
        .unwrap();

        let expected: Vec<EnvironmentRow> = std::env::var("PATH")
            .ok()
            .map(|value| EnvironmentRow::new("PATH".to_string(), value))
            .into_iter()
            .collect();
        assert_eq!(rows, expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_tolerates_non_utf8_environment() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = "TABLE_ENVIRONMENT_NON_UTF8";
        std::env::set_var(name, OsStr::from_bytes(b"f\xffo"));

        let rows = generate(&CallContext::background(), &QueryContext::new()).unwrap();
        let row = rows
            .iter()
            .find(|r| r.name == name)
            .expect("variable should be listed");
        assert_eq!(row.value, "f\u{fffd}o");

        let rows = generate(&CallContext::background(), &name_equals(&[name])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "f\u{fffd}o");

        std::env::remove_var(name);
    }

    #[test]
    fn test_row_length_counts_bytes() {
        let row = EnvironmentRow::new("K".to_string(), "héllo".to_string());
        assert_eq!(row.length, 6);
    }
}
