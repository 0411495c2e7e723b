//! Static tool catalog compiled into the binary.

use crate::models::Tool;

/// Every tool DevToolHub ships, in display order.
pub const TOOLS: &[Tool] = &[
    Tool {
        slug: "json-formatter",
        name: "JSON Formatter",
        description: "Format, minify and validate JSON data",
        icon: "Braces",
        category: "Formatting",
        tags: &["json", "format", "validate"],
    },
    Tool {
        slug: "password-generator",
        name: "Password Generator",
        description: "Generate secure random passwords",
        icon: "Key",
        category: "Security",
        tags: &["password", "generate", "security"],
    },
    Tool {
        slug: "timestamp-converter",
        name: "Timestamp Converter",
        description: "Convert between UNIX timestamps and readable dates",
        icon: "Clock",
        category: "Time",
        tags: &["timestamp", "time", "convert"],
    },
    Tool {
        slug: "regex-tester",
        name: "Regex Tester",
        description: "Test and debug regular expressions",
        icon: "Code",
        category: "Developer",
        tags: &["regex", "pattern", "test"],
    },
    Tool {
        slug: "mock-data-generator",
        name: "Mock Data Generator",
        description: "Generate structured random test data",
        icon: "Database",
        category: "Developer",
        tags: &["mock", "data", "test"],
    },
    Tool {
        slug: "uuid-generator",
        name: "UUID Generator",
        description: "Quickly generate random UUIDs",
        icon: "Hash",
        category: "Developer",
        tags: &["uuid", "generate", "identifier"],
    },
    Tool {
        slug: "jwt-decoder",
        name: "JWT Decoder",
        description: "Decode and verify JWT tokens",
        icon: "Lock",
        category: "Security",
        tags: &["jwt", "token", "decode"],
    },
    Tool {
        slug: "encryption-tool",
        name: "Encryption Playground",
        description: "Base64, hashing, HMAC and AES encryption helpers",
        icon: "Shield",
        category: "Security",
        tags: &["encrypt", "decrypt", "base64", "hash"],
    },
    Tool {
        slug: "cron-generator",
        name: "Cron Expression Tool",
        description: "Parse and build cron expressions and preview run times",
        icon: "CalendarClock",
        category: "Developer",
        tags: &["cron", "schedule", "job"],
    },
    Tool {
        slug: "url-parser",
        name: "URL Query Editor",
        description: "Parse, edit and rebuild URLs and their query parameters",
        icon: "Link2",
        category: "Network",
        tags: &["url", "query", "params"],
    },
];

/// Look up a tool by slug.
pub fn by_slug(slug: &str) -> Option<&'static Tool> {
    TOOLS.iter().find(|tool| tool.slug == slug)
}

/// Whether `slug` names a catalog tool.
pub fn contains(slug: &str) -> bool {
    by_slug(slug).is_some()
}

/// All tools in a category (exact match).
pub fn by_category(category: &str) -> Vec<&'static Tool> {
    TOOLS
        .iter()
        .filter(|tool| tool.category == category)
        .collect()
}

/// Distinct categories in catalog order.
pub fn categories() -> Vec<&'static str> {
    let mut categories = Vec::new();
    for tool in TOOLS {
        if !categories.contains(&tool.category) {
            categories.push(tool.category);
        }
    }
    categories
}

/// Case-insensitive search over name, description, and tags.
pub fn search(query: &str) -> Vec<&'static Tool> {
    let query = query.trim();
    if query.is_empty() {
        return TOOLS.iter().collect();
    }
    TOOLS.iter().filter(|tool| tool.matches(query)).collect()
}
