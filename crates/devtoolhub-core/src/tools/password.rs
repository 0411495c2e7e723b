//! Password generation, strength scoring and simple input validators.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ToolError, ToolResult};
use crate::auth::is_plausible_email;

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 64;
pub const DEFAULT_LENGTH: usize = 16;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneratorOptions {
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    fn classes(self) -> Vec<&'static [u8]> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS.as_bytes()),
        ]
        .into_iter()
        .filter_map(|(enabled, class)| enabled.then_some(class))
        .collect()
    }
}

/// Generate a password of exactly `length` characters.
///
/// Every enabled class contributes at least one character.
pub fn generate(length: usize, options: GeneratorOptions) -> ToolResult<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(ToolError::InvalidOption(format!(
            "Password length must be between {MIN_LENGTH} and {MAX_LENGTH}"
        )));
    }
    let classes = options.classes();
    if classes.is_empty() {
        return Err(ToolError::InvalidOption(
            "Select at least one character type".to_string(),
        ));
    }

    let mut rng = rand::thread_rng();
    let pool: Vec<u8> = classes.concat();
    let mut password: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    password.extend((password.len()..length).map(|_| pool[rng.gen_range(0..pool.len())]));
    password.shuffle(&mut rng);

    Ok(password.into_iter().map(char::from).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strength {
    /// 0 to 5, one point per satisfied rule
    pub score: u8,
    /// Rules not yet satisfied
    pub feedback: Vec<&'static str>,
}

impl Strength {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.score {
            0..=1 => "very weak",
            2 => "weak",
            3 => "fair",
            4 => "strong",
            _ => "very strong",
        }
    }
}

#[must_use]
pub fn strength(password: &str) -> Strength {
    let rules: [(bool, &'static str); 5] = [
        (
            password.chars().count() >= 8,
            "Use at least 8 characters",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Add lowercase letters",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Add uppercase letters",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Add digits",
        ),
        (
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
            "Add special characters",
        ),
    ];

    let mut score = 0;
    let mut feedback = Vec::new();
    for (satisfied, hint) in rules {
        if satisfied {
            score += 1;
        } else {
            feedback.push(hint);
        }
    }
    Strength { score, feedback }
}

#[must_use]
pub fn validate_email(email: &str) -> bool {
    is_plausible_email(email)
}

/// Absolute URL with a scheme, as accepted by the URL parser.
#[must_use]
pub fn validate_url(url: &str) -> bool {
    ::url::Url::parse(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_class(c: char, options: GeneratorOptions) -> bool {
        (options.uppercase && c.is_ascii_uppercase())
            || (options.lowercase && c.is_ascii_lowercase())
            || (options.digits && c.is_ascii_digit())
            || (options.symbols && SYMBOLS.contains(c))
    }

    #[test]
    fn generated_passwords_respect_length_and_classes() {
        for mask in 1u8..16 {
            let options = GeneratorOptions {
                uppercase: mask & 1 != 0,
                lowercase: mask & 2 != 0,
                digits: mask & 4 != 0,
                symbols: mask & 8 != 0,
            };
            for length in [MIN_LENGTH, 5, 16, 33, MAX_LENGTH] {
                let password = generate(length, options).unwrap();
                assert_eq!(password.chars().count(), length);
                assert!(password.chars().all(|c| in_class(c, options)), "{password}");
            }
        }
    }

    #[test]
    fn every_enabled_class_is_present() {
        let password = generate(MIN_LENGTH, GeneratorOptions::default()).unwrap();
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| SYMBOLS.contains(c)));
    }

    #[test]
    fn invalid_options_are_rejected() {
        assert!(generate(3, GeneratorOptions::default()).is_err());
        assert!(generate(65, GeneratorOptions::default()).is_err());
        let none = GeneratorOptions {
            uppercase: false,
            lowercase: false,
            digits: false,
            symbols: false,
        };
        assert!(matches!(generate(16, none), Err(ToolError::InvalidOption(_))));
    }

    #[test]
    fn strength_scores_each_rule() {
        assert_eq!(strength("").score, 0);
        assert_eq!(strength("abc").score, 1);
        assert_eq!(strength("abcdefgh").score, 2);
        assert_eq!(strength("Abcdefg1").score, 4);

        let strong = strength("Abcdef1!");
        assert_eq!(strong.score, 5);
        assert!(strong.feedback.is_empty());
        assert_eq!(strong.label(), "very strong");
    }

    #[test]
    fn validators() {
        assert!(validate_email("dev@example.com"));
        assert!(!validate_email("dev@example"));
        assert!(validate_url("https://example.com/path?q=1"));
        assert!(!validate_url("example.com"));
    }
}
