//! Environment variable parsing utilities.
//!
//! Type-safe helpers that eliminate the repeated
//! `std::env::var(..).ok().and_then(|v| v.parse().ok()).unwrap_or(..)` pattern.

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Get an environment variable as a string with a default value.
pub fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("SCOUT_TEST_U64", "42");
        let val: Option<u64> = env_var("SCOUT_TEST_U64");
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_var("SCOUT_NONEXISTENT_VAR_1");
        assert_eq!(missing, None);

        std::env::remove_var("SCOUT_TEST_U64");
    }

    #[test]
    fn test_env_var_or() {
        let default_val: u64 = env_var_or("SCOUT_NONEXISTENT_VAR_2", 50);
        assert_eq!(default_val, 50);
    }

    #[test]
    fn test_env_string_or() {
        std::env::set_var("SCOUT_TEST_STRING", "hello");
        assert_eq!(env_string_or("SCOUT_TEST_STRING", "default"), "hello");
        assert_eq!(env_string_or("SCOUT_NONEXISTENT_VAR_3", "default"), "default");
        std::env::remove_var("SCOUT_TEST_STRING");
    }
}
