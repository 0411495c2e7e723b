//! Random (v4) UUID generation.

use ::uuid::Uuid;

use super::{ToolError, ToolResult};

pub const MAX_BATCH: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UuidOptions {
    pub uppercase: bool,
    pub hyphens_removed: bool,
}

#[must_use]
pub fn generate(options: UuidOptions) -> String {
    let id = Uuid::new_v4();
    let text = if options.hyphens_removed {
        id.simple().to_string()
    } else {
        id.hyphenated().to_string()
    };
    if options.uppercase {
        text.to_ascii_uppercase()
    } else {
        text
    }
}

pub fn generate_batch(count: usize, options: UuidOptions) -> ToolResult<Vec<String>> {
    if count == 0 || count > MAX_BATCH {
        return Err(ToolError::InvalidOption(format!(
            "Count must be between 1 and {MAX_BATCH}"
        )));
    }
    Ok((0..count).map(|_| generate(options)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_format_is_hyphenated_v4() {
        let id = generate(UuidOptions::default());
        assert_eq!(id.len(), 36);
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn options_change_rendering() {
        let id = generate(UuidOptions {
            uppercase: true,
            hyphens_removed: true,
        });
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn batch_is_unique_and_bounded() {
        let batch = generate_batch(50, UuidOptions::default()).unwrap();
        assert_eq!(batch.iter().collect::<HashSet<_>>().len(), 50);
        assert!(generate_batch(0, UuidOptions::default()).is_err());
        assert!(generate_batch(MAX_BATCH + 1, UuidOptions::default()).is_err());
    }
}
