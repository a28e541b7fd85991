use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Serialize `value` for stdout in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Raw => serde_json::to_string(value)?,
        OutputFormat::Table => table_for(&serde_json::to_value(value)?),
    })
}

pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print `text` for table output, or `value` for json/raw.
pub fn output_with_text<T: Serialize>(
    value: &T,
    text: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if format == OutputFormat::Table {
        println!("{}", text.trim_end());
        return Ok(());
    }
    output(value, format)
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Arrays of objects become one row per object; a single object becomes
/// key/value rows. Nested objects are flattened into dotted keys.
fn table_for(value: &Value) -> String {
    match value {
        Value::Array(items) if items.is_empty() => String::from("(no rows)"),
        Value::Array(items) => {
            let flat: Vec<Map<String, Value>> = items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => flatten(map),
                    other => Map::from_iter([(String::from("value"), other.clone())]),
                })
                .collect();

            let mut columns: Vec<&str> = Vec::new();
            for key in flat.iter().flat_map(Map::keys) {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
            let rows: Vec<Vec<String>> = flat
                .iter()
                .map(|map| {
                    columns
                        .iter()
                        .map(|column| map.get(*column).map_or_else(|| String::from("-"), cell))
                        .collect()
                })
                .collect();
            table::render_table(&columns, &rows, options())
        }
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = flatten(map)
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect();
            table::render_table(&["field", "value"], &rows, options())
        }
        scalar => cell(scalar),
    }
}

fn flatten(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in map {
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                for (inner_key, inner_value) in flatten(inner) {
                    out.insert(format!("{key}.{inner_key}"), inner_value);
                }
            }
            other => {
                out.insert(key.clone(), other.clone());
            }
        }
    }
    out
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Verdict {
        ssid: &'static str,
        accepted: bool,
        reasons: Vec<&'static str>,
    }

    #[derive(Serialize)]
    struct Located {
        ssid: &'static str,
        coordinate: Coordinate,
    }

    #[derive(Serialize)]
    struct Coordinate {
        lat: f64,
        lon: f64,
    }

    #[test]
    fn json_is_pretty_and_raw_is_one_line() {
        let value = Verdict {
            ssid: "HomeNet42",
            accepted: true,
            reasons: vec![],
        };
        let pretty = render(&value, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(parsed["ssid"], "HomeNet42");
        assert!(pretty.contains('\n'));
        assert!(!render(&value, OutputFormat::Raw).unwrap().contains('\n'));
    }

    #[test]
    fn rows_keep_field_order_and_join_lists() {
        let value = vec![
            Verdict {
                ssid: "xx",
                accepted: false,
                reasons: vec!["too_short", "repeated_character"],
            },
            Verdict {
                ssid: "HomeNet42",
                accepted: true,
                reasons: vec![],
            },
        ];
        let out = render(&value, OutputFormat::Table).unwrap();
        let header = out.lines().next().unwrap();
        assert!(header.find("ssid").unwrap() < header.find("accepted").unwrap());
        assert!(out.contains("too_short,repeated_character"));
    }

    #[test]
    fn nested_objects_become_dotted_columns() {
        let value = vec![Located {
            ssid: "HomeNet42",
            coordinate: Coordinate {
                lat: 51.5,
                lon: -0.12,
            },
        }];
        let out = render(&value, OutputFormat::Table).unwrap();
        let header = out.lines().next().unwrap();
        assert!(header.contains("coordinate.lat"));
        assert!(header.contains("coordinate.lon"));
        assert!(out.contains("-0.12"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let value: Vec<Verdict> = Vec::new();
        assert_eq!(render(&value, OutputFormat::Table).unwrap(), "(no rows)");
    }
}
