//! Worksheet naming
//!
//! Excel rejects `\ / ? * [ ] :` in sheet names, and names that start or end
//! with an apostrophe. Names are capped at 31 characters and compared
//! case-insensitively when checking for duplicates.

use std::collections::HashSet;

/// Longest sheet name Excel accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

const ILLEGAL_CHARS: [char; 7] = ['\\', '/', '?', '*', '[', ']', ':'];

/// Make `name` a legal sheet name
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == '\'' || c.is_whitespace());
    if trimmed.is_empty() {
        "Sheet".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Hands out unique sheet names for one workbook
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize `base` and append `_1`, `_2`, ... until the name is unused
    ///
    /// The base is shortened when needed so the suffix always survives the
    /// length limit.
    pub fn assign(&mut self, base: &str) -> String {
        let name = sanitize_sheet_name(base);
        if self.claim(&name) {
            return name;
        }

        let mut counter = 1usize;
        loop {
            let suffix = format!("_{}", counter);
            let room = MAX_SHEET_NAME_LEN - suffix.len();
            let stem: String = name.chars().take(room).collect();
            let candidate = sanitize_sheet_name(&format!("{}{}", stem.trim_end(), suffix));
            if self.claim(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        self.used.insert(name.to_lowercase())
    }
}
