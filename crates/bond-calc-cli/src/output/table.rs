use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{scalar_text, split_rows};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in a Field/Value table; a row list (the coupon
/// schedule) gets its own table with one column per row field.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result_table(result, map);
            } else if let Some(Value::Array(rows)) = map.get("results") {
                print_rows_table(rows);
            } else {
                print_field_table(map.iter().map(|(k, v)| (k.as_str(), v)));
            }
        }
        Value::Array(rows) => print_rows_table(rows),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let (scalars, rows) = split_rows(result);
    print_field_table(scalars.into_iter());

    if let Some((name, rows)) = rows {
        println!("\n{}:", title_case(name));
        print_rows_table(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table<'a>(fields: impl Iterator<Item = (&'a str, &'a Value)>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.to_string(), scalar_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows_table(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| title_case(h)));

    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(scalar_text).unwrap_or_default()),
        );
    }

    println!("{}", Table::from(builder));
}

/// `cumulative_interest` -> `Cumulative Interest`
fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_headers() {
        assert_eq!(title_case("cumulative_interest"), "Cumulative Interest");
        assert_eq!(title_case("period"), "Period");
    }
}
