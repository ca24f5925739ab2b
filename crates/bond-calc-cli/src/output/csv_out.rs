use serde_json::Value;
use std::io;

use super::{scalar_text, split_rows};

/// Write output as CSV to stdout.
///
/// A full analysis writes its scalar fields as `field,value` records, then a
/// blank record, then the schedule with a header row. A bare row list (the
/// `schedule` command) writes only the header and rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(stdout.lock());

    if let Err(e) = write_value(&mut wtr, value).and_then(|_| wtr.flush().map_err(csv::Error::from))
    {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_value<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                let (scalars, rows) = split_rows(result);
                wtr.write_record(["field", "value"])?;
                for (key, val) in scalars {
                    wtr.write_record([key, scalar_text(val).as_str()])?;
                }
                if let Some((_, rows)) = rows {
                    wtr.write_record([""])?;
                    write_rows(wtr, rows)?;
                }
                Ok(())
            } else if let Some(Value::Array(rows)) = map.get("results") {
                write_rows(wtr, rows)
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), scalar_text(val).as_str()])?;
                }
                Ok(())
            }
        }
        Value::Array(rows) => write_rows(wtr, rows),
        _ => wtr.write_record([scalar_text(value)]),
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}
