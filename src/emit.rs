//! Tab-separated table emission.

use std::io::{self, Write};

use crate::schema::{ColumnSchema, Row};

/// Write the header line followed by one line per row.
///
/// Every field, header and data alike, is followed by a tab, so each line
/// carries a trailing tab before its newline. Downstream consumers of the
/// ancestral format depend on that exact shape, so it is preserved. A row's
/// missing or empty columns become empty fields. Values are written
/// verbatim; embedded tabs or newlines are not escaped.
pub fn write_table<W: Write>(
    writer: &mut W,
    schema: &ColumnSchema,
    rows: &[Row],
) -> io::Result<()> {
    for name in schema.iter() {
        write!(writer, "{}\t", name)?;
    }
    writeln!(writer)?;

    for row in rows {
        for name in schema.iter() {
            write!(writer, "{}\t", row.get(name).unwrap_or(""))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Render the table to a string. Convenience for tests and callers that
/// buffer the whole output anyway.
pub fn render_table(schema: &ColumnSchema, rows: &[Row]) -> String {
    let mut buffer = Vec::new();
    // Writing to a Vec cannot fail.
    write_table(&mut buffer, schema, rows).unwrap_or_default();
    String::from_utf8_lossy(&buffer).into_owned()
}
