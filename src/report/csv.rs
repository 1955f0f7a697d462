use crate::core::record::{LooseRecord, COLUMNS};
use anyhow::Result;
use std::fmt::Write;

/// One header row, then one row per record. Absent values are left empty.
pub fn generate_csv_report(rows: &[LooseRecord]) -> Result<String> {
    let mut output = String::new();

    writeln!(&mut output, "{}", COLUMNS.join(","))?;

    for row in rows {
        writeln!(
            &mut output,
            "{},{},{},{},{},{},{},{},{}",
            quote(row.engine.as_deref()),
            quote(row.query_name.as_deref()),
            field(row.iteration),
            field(row.execution_time),
            field(row.cpu_usage),
            field(row.memory_usage),
            field(row.success),
            field(row.result_count),
            quote(row.error.as_deref()),
        )?;
    }

    Ok(output)
}

fn field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn quote(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("\"{}\"", text.replace('"', "\"\"")),
        None => String::new(),
    }
}
