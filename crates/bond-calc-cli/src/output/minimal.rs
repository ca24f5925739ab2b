use serde_json::Value;

use super::scalar_text;

/// Key answer fields, most important first.
const PRIORITY_KEYS: [&str; 4] = ["ytm_annual", "current_yield", "total_interest", "premium_discount"];

/// Print just the key answer value from the output.
///
/// Looks for the yield fields first, then falls back to the first scalar
/// field of the result; a bare list of rows prints its length.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", scalar_text(val));
                return;
            }
        }

        if let Some(Value::Array(rows)) = map.get("results") {
            println!("{} rows", rows.len());
            return;
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array()) {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result_obj));
}
