pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar JSON value as plain text (strings unquoted).
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Split an object into scalar fields and the first array-of-rows field.
pub(crate) fn split_rows<'a>(
    map: &'a serde_json::Map<String, Value>,
) -> (Vec<(&'a str, &'a Value)>, Option<(&'a str, &'a [Value])>) {
    let mut scalars = Vec::new();
    let mut rows = None;
    for (key, val) in map {
        match val {
            Value::Array(items) if rows.is_none() => rows = Some((key.as_str(), items.as_slice())),
            _ => scalars.push((key.as_str(), val)),
        }
    }
    (scalars, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_text_unquotes_strings() {
        assert_eq!(scalar_text(&json!("0.0842")), "0.0842");
        assert_eq!(scalar_text(&json!(10)), "10");
        assert_eq!(scalar_text(&Value::Null), "");
    }

    #[test]
    fn test_split_rows_separates_schedule() {
        let value = json!({ "ytm_annual": "0.09", "schedule": [{ "period": 1 }] });
        let (scalars, rows) = split_rows(value.as_object().unwrap());
        assert_eq!(scalars.len(), 1);
        assert_eq!(scalars[0].0, "ytm_annual");
        let (name, items) = rows.unwrap();
        assert_eq!(name, "schedule");
        assert_eq!(items.len(), 1);
    }
}
