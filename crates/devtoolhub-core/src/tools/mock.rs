//! Random mock records for fixtures and demos.

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use super::{ToolError, ToolResult};
use crate::util::iso_timestamp_now;

pub const MAX_COUNT: usize = 100;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "David", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy",
];
const LAST_NAMES: &[&str] = &[
    "Chen", "Garcia", "Ito", "Kowalski", "Martin", "Nguyen", "Okafor", "Smith", "Wang", "Zhang",
];
const CITIES: &[&str] = &[
    "Beijing", "Berlin", "London", "New York", "Paris", "Shanghai", "Sydney", "Tokyo",
];
const PRODUCT_CATEGORIES: &[&str] = &["Electronics", "Clothing", "Food", "Books"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MockKind {
    #[default]
    User,
    Product,
    Post,
}

impl std::str::FromStr for MockKind {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(Self::User),
            "product" | "products" => Ok(Self::Product),
            "post" | "posts" => Ok(Self::Post),
            other => Err(ToolError::InvalidOption(format!(
                "Unknown mock data kind '{other}' (expected user, product or post)"
            ))),
        }
    }
}

/// Generate `count` records as a JSON array.
pub fn generate(kind: MockKind, count: usize) -> ToolResult<Value> {
    if count == 0 || count > MAX_COUNT {
        return Err(ToolError::InvalidOption(format!(
            "Count must be between 1 and {MAX_COUNT}"
        )));
    }

    let mut rng = rand::thread_rng();
    let records = (0..count)
        .map(|_| match kind {
            MockKind::User => user(&mut rng),
            MockKind::Product => product(&mut rng),
            MockKind::Post => post(&mut rng),
        })
        .collect();
    Ok(Value::Array(records))
}

fn pick<'a>(rng: &mut impl Rng, values: &'a [&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn user(rng: &mut impl Rng) -> Value {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    json!({
        "id": rng.gen_range(1..10_000),
        "name": format!("{first} {last}"),
        "email": format!(
            "{}.{}{}@example.com",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase(),
            rng.gen_range(1..1000)
        ),
        "age": rng.gen_range(18..68),
        "city": pick(rng, CITIES),
        "created_at": iso_timestamp_now(),
    })
}

fn product(rng: &mut impl Rng) -> Value {
    let cents: u32 = rng.gen_range(100..100_000);
    json!({
        "id": rng.gen_range(1..10_000),
        "name": format!("Product {}", rng.gen_range(1..1000)),
        "price": format!("{}.{:02}", cents / 100, cents % 100),
        "category": pick(rng, PRODUCT_CATEGORIES),
        "in_stock": rng.gen_bool(0.5),
    })
}

fn post(rng: &mut impl Rng) -> Value {
    let number = rng.gen_range(1..1000);
    json!({
        "id": rng.gen_range(1..10_000),
        "title": format!("Post Title {number}"),
        "content": format!("This is the content of post {number}"),
        "author": format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
        "views": rng.gen_range(0..10_000),
        "published_at": iso_timestamp_now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_have_expected_shape() {
        let Value::Array(users) = generate(MockKind::User, 5).unwrap() else {
            panic!("expected an array");
        };
        assert_eq!(users.len(), 5);
        for user in users {
            for key in ["id", "name", "email", "age", "city", "created_at"] {
                assert!(user.get(key).is_some(), "missing {key}");
            }
            let age = user["age"].as_u64().unwrap();
            assert!((18..68).contains(&age));
            assert!(user["email"].as_str().unwrap().ends_with("@example.com"));
        }
    }

    #[test]
    fn other_kinds_generate() {
        let products = generate(MockKind::Product, 3).unwrap();
        assert!(products[0].get("price").is_some());
        let posts = generate("posts".parse().unwrap(), 2).unwrap();
        assert!(posts[1].get("title").is_some());
    }

    #[test]
    fn count_is_bounded() {
        assert!(generate(MockKind::User, 0).is_err());
        assert!(generate(MockKind::User, MAX_COUNT + 1).is_err());
        assert!("animal".parse::<MockKind>().is_err());
    }
}
