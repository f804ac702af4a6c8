//! Splitting raw SQL text into individual statements.

mod scanner;

use scanner::State;

use crate::error::RqliteDbError;

/// Split `sql` on top-level `;` into trimmed, non-empty statements.
///
/// Semicolons inside single-quoted literals, double-quoted identifiers, `--`
/// line comments and `/* */` block comments do not separate statements. A
/// doubled quote inside a literal or identifier is an escaped quote. Comments
/// are kept as part of the statement text they appear in.
///
/// ```rust
/// use rqlite_middleware::split_statements;
///
/// let parts = split_statements("SELECT ';'; -- done;\nSELECT 2").unwrap();
/// assert_eq!(parts, vec!["SELECT ';'", "-- done;\nSELECT 2"]);
/// ```
///
/// # Errors
/// Returns [`RqliteDbError::UnterminatedInput`] when the input ends inside a
/// string literal, a quoted identifier or a block comment. A line comment
/// running to end of input is fine.
pub fn split_statements(sql: &str) -> Result<Vec<String>, RqliteDbError> {
    let bytes = sql.as_bytes();
    let mut statements = Vec::new();
    let mut state = State::Normal;
    let mut start = 0;
    let mut idx = 0;

    while let Some(&b) = bytes.get(idx) {
        let step = state.step(idx, b, bytes.get(idx + 1).copied());
        if step.separator {
            statements.extend(trimmed_piece(sql, start, idx));
            start = idx + 1;
        }
        state = step.state;
        idx += 1 + step.consumed;
    }

    state.check_terminated()?;
    statements.extend(trimmed_piece(sql, start, bytes.len()));
    Ok(statements)
}

fn trimmed_piece(sql: &str, start: usize, end: usize) -> Option<String> {
    let piece = sql.get(start..end)?.trim();
    (!piece.is_empty()).then(|| piece.to_string())
}
