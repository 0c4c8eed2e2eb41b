//! Typed environment lookups with fallbacks
//!
//! An unset or empty variable yields the fallback, and so does a value that
//! does not parse.

use std::time::Duration;

use chrono::DateTime;
use tracing::trace;

use crate::codec::duration::parse_duration;
use crate::codec::time::Time;
use crate::codec::url::Url;

const TRUTHY: [&str; 6] = ["1", "on", "yes", "true", "y", "t"];

fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Parse the variable with `parse`, falling back when unset or invalid
fn lookup_with<T, F>(name: &str, fallback: T, parse: F) -> T
where
    F: FnOnce(&str) -> Option<T>,
{
    match lookup(name) {
        Some(value) => parse(&value).unwrap_or_else(|| {
            trace!(var = name, value = %value, "Unparseable environment value, using fallback");
            fallback
        }),
        None => fallback,
    }
}

pub fn get_env_as_string(name: &str, fallback: &str) -> String {
    lookup(name).unwrap_or_else(|| fallback.to_string())
}

/// `1`, `on`, `yes`, `true`, `y` and `t` (any case) are true; other values are false
pub fn get_env_as_bool(name: &str, fallback: bool) -> bool {
    lookup_with(name, fallback, |value| {
        Some(TRUTHY.contains(&value.to_lowercase().as_str()))
    })
}

pub fn get_env_as_int(name: &str, fallback: i64) -> i64 {
    lookup_with(name, fallback, |value| value.parse().ok())
}

/// RFC 3339
pub fn get_env_as_time(name: &str, fallback: Time) -> Time {
    lookup_with(name, fallback, |value| {
        DateTime::parse_from_rfc3339(value).ok().map(Time)
    })
}

/// ISO 8601 or compact units, see [`parse_duration`]
pub fn get_env_as_duration(name: &str, fallback: Duration) -> Duration {
    lookup_with(name, fallback, |value| parse_duration(value).ok())
}

pub fn get_env_as_url(name: &str, fallback: Url) -> Url {
    lookup_with(name, fallback, |value| Url::parse(value).ok())
}

pub fn get_env_as_uuid(name: &str, fallback: uuid::Uuid) -> uuid::Uuid {
    lookup_with(name, fallback, |value| uuid::Uuid::parse_str(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VAR: &str = "COREKIT_ENV_TEST";

    fn with_var<R>(value: Option<&str>, check: impl FnOnce() -> R) -> R {
        match value {
            Some(value) => env::set_var(VAR, value),
            None => env::remove_var(VAR),
        }
        let result = check();
        env::remove_var(VAR);
        result
    }

    #[test]
    #[serial]
    fn string_fallback_on_unset_or_empty() {
        assert_eq!(with_var(None, || get_env_as_string(VAR, "dflt")), "dflt");
        assert_eq!(with_var(Some(""), || get_env_as_string(VAR, "dflt")), "dflt");
        assert_eq!(with_var(Some("set"), || get_env_as_string(VAR, "dflt")), "set");
    }

    #[test]
    #[serial]
    fn bool_tokens() {
        for truthy in ["1", "on", "YES", "true", "y", "T"] {
            assert!(with_var(Some(truthy), || get_env_as_bool(VAR, false)), "{truthy}");
        }
        for falsy in ["0", "off", "no", "nope", "es"] {
            assert!(!with_var(Some(falsy), || get_env_as_bool(VAR, true)), "{falsy}");
        }
        assert!(with_var(None, || get_env_as_bool(VAR, true)));
    }

    #[test]
    #[serial]
    fn int_falls_back_on_garbage() {
        assert_eq!(with_var(Some("-12"), || get_env_as_int(VAR, 7)), -12);
        assert_eq!(with_var(Some("twelve"), || get_env_as_int(VAR, 7)), 7);
        assert_eq!(with_var(None, || get_env_as_int(VAR, 7)), 7);
    }

    #[test]
    #[serial]
    fn time_is_rfc3339() {
        let fallback = Time::zero();
        let parsed = with_var(Some("2024-01-02T15:04:05Z"), || {
            get_env_as_time(VAR, fallback)
        });
        assert_eq!(parsed.ymd(), (2024, 1, 2));

        let garbage = with_var(Some("2024-01-02"), || get_env_as_time(VAR, fallback));
        assert!(garbage.is_zero());
    }

    #[test]
    #[serial]
    fn duration_accepts_both_grammars() {
        let fallback = Duration::from_secs(1);
        assert_eq!(
            with_var(Some("PT1M"), || get_env_as_duration(VAR, fallback)),
            Duration::from_secs(60)
        );
        assert_eq!(
            with_var(Some("250ms"), || get_env_as_duration(VAR, fallback)),
            Duration::from_millis(250)
        );
        assert_eq!(
            with_var(Some("soon"), || get_env_as_duration(VAR, fallback)),
            fallback
        );
    }

    #[test]
    #[serial]
    fn url_and_uuid() {
        let fallback = Url::parse("http://localhost").unwrap();
        let url = with_var(Some("https://example.com/x"), || {
            get_env_as_url(VAR, fallback.clone())
        });
        assert_eq!(url.as_str(), "https://example.com/x");
        assert_eq!(
            with_var(Some("not a url"), || get_env_as_url(VAR, fallback.clone())),
            fallback
        );

        let id = uuid::Uuid::new_v4();
        let text = id.to_string();
        assert_eq!(
            with_var(Some(&text), || get_env_as_uuid(VAR, uuid::Uuid::nil())),
            id
        );
        assert!(with_var(Some("xyz"), || get_env_as_uuid(VAR, uuid::Uuid::nil())).is_nil());
    }
}
