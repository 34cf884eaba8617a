//! Response rendering for the three output formats.
//!
//! Commands with a list view (`check`, `generate`) build their own rows and
//! call [`print_rows`]; single responses such as `canto say` go through
//! [`output`], which shows a table as one `field  value` line per key.

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Raw => serde_json::to_string(value)?,
        OutputFormat::Table => render_fields(&serde_json::to_value(value)?),
    })
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print pre-built rows as an aligned table fitted to the terminal.
pub fn print_rows(headers: &[&str], rows: &[Vec<String>]) {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };
    println!("{}", table::render(headers, rows, options));
}

fn render_fields(value: &Value) -> String {
    let rows: Vec<Vec<String>> = match value {
        Value::Object(fields) => fields
            .iter()
            .map(|(field, value)| vec![field.clone(), cell(value)])
            .collect(),
        other => vec![vec![String::from("value"), cell(other)]],
    };
    table::render(&["field", "value"], &rows, table::TableOptions::default())
}

/// Scalars print bare; nested values print as compact JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
