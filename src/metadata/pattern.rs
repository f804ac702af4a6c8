use regex::{Regex, RegexBuilder};

use crate::error::RqliteDbError;

/// A SQL `LIKE` pattern: `%` matches any run, `_` any single character.
///
/// Matching is anchored and case-insensitive. `None` and `"%"` match
/// everything without compiling a regex.
#[derive(Debug, Clone)]
pub struct LikePattern {
    regex: Option<Regex>,
}

impl LikePattern {
    /// # Errors
    /// [`RqliteDbError::ParameterError`] if the translated pattern does not compile.
    pub fn new(pattern: Option<&str>) -> Result<Self, RqliteDbError> {
        let regex = match pattern {
            None | Some("%") => None,
            Some(p) => Some(
                RegexBuilder::new(&translate(p))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RqliteDbError::ParameterError(format!("bad pattern {p}: {e}")))?,
            ),
        };
        Ok(Self { regex })
    }

    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.as_ref().is_none_or(|re| re.is_match(value))
    }
}

fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '%' | '_' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '%' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}
