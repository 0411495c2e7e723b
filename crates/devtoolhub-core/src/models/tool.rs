//! Tool model

use serde::Serialize;

/// A tool compiled into the catalog. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tool {
    /// Stable identifier used by favorites and history
    pub slug: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Icon name from the UI icon set
    pub icon: &'static str,
    /// Grouping category
    pub category: &'static str,
    /// Search tags
    pub tags: &'static [&'static str],
}

impl Tool {
    /// Case-insensitive match against name, description, and tags.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Tool = Tool {
        slug: "json-formatter",
        name: "JSON Formatter",
        description: "Format, minify and validate JSON",
        icon: "Braces",
        category: "Formatting",
        tags: &["json", "validate"],
    };

    #[test]
    fn matches_is_case_insensitive() {
        assert!(SAMPLE.matches("JSON"));
        assert!(SAMPLE.matches("minify"));
        assert!(SAMPLE.matches("VALID"));
        assert!(!SAMPLE.matches("cron"));
    }
}
