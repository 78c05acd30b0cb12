use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::grid::Grid;

fn default_true() -> bool {
    true
}

/// Options for replacing text across the whole grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOptions {
    /// The search pattern (regex unless `use_regex` is false)
    pub pattern: String,
    /// Replacement text; `$1`-style group references apply in regex mode
    pub replacement: String,
    #[serde(default = "default_true")]
    pub use_regex: bool,
    #[serde(default)]
    pub match_case: bool,
}

impl ReplaceOptions {
    /// Global, case-insensitive regex replacement
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        ReplaceOptions {
            pattern: pattern.into(),
            replacement: replacement.into(),
            use_regex: true,
            match_case: false,
        }
    }

    /// Treat the pattern as plain text
    pub fn literal(mut self) -> Self {
        self.use_regex = false;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.match_case = true;
        self
    }

    fn build_matcher(&self) -> Result<Regex> {
        let source = if self.use_regex {
            self.pattern.clone()
        } else {
            regex::escape(&self.pattern)
        };

        RegexBuilder::new(&source)
            .case_insensitive(!self.match_case)
            .build()
            .map_err(|e| GridError::InvalidPattern(e.to_string()))
    }

    fn replacement_text(&self) -> String {
        if self.use_regex {
            self.replacement.clone()
        } else {
            // Literal mode: `$` has no group meaning
            self.replacement.replace('$', "$$")
        }
    }
}

/// Replace every match in every cell's raw and displayed text.
///
/// Returns the number of cells changed. An empty pattern changes nothing; an
/// invalid pattern leaves the grid untouched.
pub fn find_and_replace(grid: &mut Grid, options: &ReplaceOptions) -> Result<usize> {
    if options.pattern.is_empty() {
        return Ok(0);
    }
    let matcher = options.build_matcher()?;
    Ok(grid.replace_all(&matcher, &options.replacement_text()))
}
