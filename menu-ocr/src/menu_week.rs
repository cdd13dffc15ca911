//! Menu Week label extraction.
//!
//! Finds the first `<Season> Menu Week <number>` label (e.g. `Summer Menu Week 12`)
//! in recognized text. Matching is unanchored and case-sensitive, and the gaps
//! between words accept any run of whitespace so labels that OCR wrapped across
//! lines still match.

use regex::Regex;

use crate::config::MenuWeekConfig;

#[derive(Debug, Clone)]
pub struct MenuWeekMatcher {
    pattern: Regex,
}

impl MenuWeekMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn from_config(config: &MenuWeekConfig) -> Result<Self, regex::Error> {
        Self::new(&config.pattern)
    }

    /// Returns the first matching label, or `None` when the text has none.
    pub fn extract<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
