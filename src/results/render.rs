use std::fmt;

use super::wire::WireResult;

const NULL_TEXT: &str = "NULL";

impl fmt::Display for WireResult {
    /// Aligned text table followed by write counters, or the error line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return writeln!(f, "error: {error}");
        }

        if !self.columns.is_empty() {
            let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
            for row in &self.values {
                for (width, cell) in widths.iter_mut().zip(row) {
                    let len = cell.as_deref().unwrap_or(NULL_TEXT).chars().count();
                    *width = (*width).max(len);
                }
            }

            write_row(f, &widths, self.columns.iter().map(String::as_str))?;
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            write_row(f, &widths, rule.iter().map(String::as_str))?;
            for row in &self.values {
                write_row(
                    f,
                    &widths,
                    row.iter().map(|c| c.as_deref().unwrap_or(NULL_TEXT)),
                )?;
            }
            writeln!(f, "({} rows)", self.values.len())?;
        }

        if let Some(n) = self.rows_affected {
            writeln!(f, "rows affected: {n}")?;
        }
        if let Some(id) = self.last_insert_id {
            writeln!(f, "last insert id: {id}")?;
        }
        Ok(())
    }
}

fn write_row<'a>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    let line: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(&w, c)| format!("{c:<w$}"))
        .collect();
    writeln!(f, "{}", line.join(" | ").trim_end())
}
