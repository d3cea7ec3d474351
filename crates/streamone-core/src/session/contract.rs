//! Behaviour every `SessionStore` implementation must show.
//!
//! `session_store_contract_tests!` turns the checks below into `#[test]`
//! functions for one store. Its argument evaluates to `(store, guard)`, where
//! the guard keeps any backing resources (such as a temp dir) alive.

use std::thread;
use std::time::Duration as StdDuration;

use chrono::Duration;
use serde_json::json;

use super::{SessionError, SessionStore};

macro_rules! session_store_contract_tests {
    (@tests $make:expr; $($name:ident),* $(,)?) => {
        mod store_contract {
            #[allow(unused_imports)]
            use super::*;

            $(
                #[test]
                fn $name() {
                    let (store, _guard) = $make;
                    $crate::session::contract::$name(&store);
                }
            )*
        }
    };
    ($make:expr) => {
        session_store_contract_tests!(@tests $make;
            no_session_by_default,
            active_session_reads_back_fields,
            clear_session_ends_session,
            clear_session_is_idempotent,
            timeout_is_bounded_and_non_increasing,
            set_timeout_slides_deadline,
            set_cache_key_marks_key_present,
            cache_round_trips_every_value_shape,
            unset_cache_key_removes_entry,
            clear_session_empties_cache,
            new_session_starts_with_empty_cache,
            missing_cache_key_reports_key,
            operations_without_session_fail,
            expired_session_is_indistinguishable_from_cleared,
            session_expires_without_further_calls,
        );
    };
}

fn session_timeout() -> Duration {
    Duration::seconds(10)
}

fn start(store: &dyn SessionStore) {
    store.set_session("id", "key", "user", session_timeout());
}

pub(crate) fn no_session_by_default(store: &dyn SessionStore) {
    assert!(!store.has_session());
}

pub(crate) fn active_session_reads_back_fields(store: &dyn SessionStore) {
    for (id, key, user_id) in [
        ("id", "key", "user_id"),
        ("7JhNCK-SWtEi'", "fAoMLYOCEpEi", "_i5EDeMSEwIm"),
    ] {
        store.set_session(id, key, user_id, session_timeout());
        assert!(store.has_session());
        assert_eq!(store.id().unwrap(), id);
        assert_eq!(store.key().unwrap(), key);
        assert_eq!(store.user_id().unwrap(), user_id);
    }
}

pub(crate) fn clear_session_ends_session(store: &dyn SessionStore) {
    start(store);
    store.clear_session();
    assert!(!store.has_session());
}

pub(crate) fn clear_session_is_idempotent(store: &dyn SessionStore) {
    store.clear_session();
    start(store);
    store.clear_session();
    store.clear_session();
    assert!(!store.has_session());
}

pub(crate) fn timeout_is_bounded_and_non_increasing(store: &dyn SessionStore) {
    start(store);
    let first = store.timeout().unwrap();
    thread::sleep(StdDuration::from_millis(5));
    let second = store.timeout().unwrap();

    assert!(first <= session_timeout());
    assert!(second <= first);
    assert!(second > Duration::zero());
}

pub(crate) fn set_timeout_slides_deadline(store: &dyn SessionStore) {
    store.set_session("id", "key", "user", Duration::seconds(1));
    store.set_timeout(Duration::seconds(3600)).unwrap();

    let remaining = store.timeout().unwrap();
    assert!(remaining > Duration::seconds(3500));
    assert!(remaining <= Duration::seconds(3600));
    assert_eq!(store.id().unwrap(), "id");
}

pub(crate) fn set_cache_key_marks_key_present(store: &dyn SessionStore) {
    start(store);
    let key = "thisisakey";

    assert!(!store.has_cache_key(key).unwrap());
    store.set_cache_key(key, json!("somerandomvalue")).unwrap();
    assert!(store.has_cache_key(key).unwrap());
}

pub(crate) fn cache_round_trips_every_value_shape(store: &dyn SessionStore) {
    start(store);
    let values = [
        ("string", json!("string")),
        ("int", json!(27)),
        ("float", json!(3.14159)),
        ("bool-true", json!(true)),
        ("bool-false", json!(false)),
        ("array-empty", json!([])),
        ("array-values", json!([1, 2, 3])),
        ("dictionary", json!({ "a": 5, "foo": "bar" })),
        ("null", json!(null)),
    ];

    for (key, value) in &values {
        store.set_cache_key(key, value.clone()).unwrap();
    }
    for (key, value) in &values {
        assert!(store.has_cache_key(key).unwrap());
        assert_eq!(&store.get_cache_key(key).unwrap(), value);
    }

    // Overwrite keeps the latest value
    store.set_cache_key("string", json!("other")).unwrap();
    assert_eq!(store.get_cache_key("string").unwrap(), json!("other"));
}

pub(crate) fn unset_cache_key_removes_entry(store: &dyn SessionStore) {
    start(store);
    let key = "testUnsetCacheKey";

    store.set_cache_key(key, json!("some random value")).unwrap();
    assert!(store.has_cache_key(key).unwrap());

    store.unset_cache_key(key).unwrap();
    assert!(!store.has_cache_key(key).unwrap());
    assert_eq!(
        store.get_cache_key(key).unwrap_err(),
        SessionError::NoSuchKey(key.to_string())
    );
    assert_eq!(
        store.unset_cache_key(key).unwrap_err(),
        SessionError::NoSuchKey(key.to_string())
    );
}

pub(crate) fn clear_session_empties_cache(store: &dyn SessionStore) {
    start(store);
    let key = "testClearCacheKey";
    store.set_cache_key(key, json!("some random value")).unwrap();

    store.clear_session();
    start(store);

    assert!(!store.has_cache_key(key).unwrap());
}

pub(crate) fn new_session_starts_with_empty_cache(store: &dyn SessionStore) {
    start(store);
    store.set_cache_key("first", json!(1)).unwrap();
    store.set_cache_key("second", json!(2)).unwrap();

    // No clear in between: replacing the session must drop the cache
    store.set_session("other-id", "other-key", "other-user", session_timeout());

    assert!(!store.has_cache_key("first").unwrap());
    assert!(!store.has_cache_key("second").unwrap());
    assert_eq!(store.id().unwrap(), "other-id");
}

pub(crate) fn missing_cache_key_reports_key(store: &dyn SessionStore) {
    start(store);
    assert_eq!(
        store.get_cache_key("absent").unwrap_err(),
        SessionError::NoSuchKey("absent".to_string())
    );
    assert_eq!(
        store.unset_cache_key("absent").unwrap_err(),
        SessionError::NoSuchKey("absent".to_string())
    );
}

fn assert_no_session(store: &dyn SessionStore) {
    assert!(!store.has_session());
    assert_eq!(
        store.set_timeout(Duration::seconds(1234)).unwrap_err(),
        SessionError::NoSession
    );
    assert_eq!(store.id().unwrap_err(), SessionError::NoSession);
    assert_eq!(store.key().unwrap_err(), SessionError::NoSession);
    assert_eq!(store.user_id().unwrap_err(), SessionError::NoSession);
    assert_eq!(store.timeout().unwrap_err(), SessionError::NoSession);
    assert_eq!(
        store.has_cache_key("key").unwrap_err(),
        SessionError::NoSession
    );
    assert_eq!(
        store.get_cache_key("key").unwrap_err(),
        SessionError::NoSession
    );
    assert_eq!(
        store.set_cache_key("key", json!("value")).unwrap_err(),
        SessionError::NoSession
    );
    assert_eq!(
        store.unset_cache_key("key").unwrap_err(),
        SessionError::NoSession
    );
}

pub(crate) fn operations_without_session_fail(store: &dyn SessionStore) {
    assert_no_session(store);

    start(store);
    store.clear_session();
    assert_no_session(store);
}

pub(crate) fn expired_session_is_indistinguishable_from_cleared(store: &dyn SessionStore) {
    store.set_session("id", "key", "user", Duration::zero());
    assert_no_session(store);

    // A cache write attempted after expiry must not resurrect anything
    start(store);
    assert!(!store.has_cache_key("key").unwrap());
}

pub(crate) fn session_expires_without_further_calls(store: &dyn SessionStore) {
    store.set_session("id", "key", "user", Duration::milliseconds(300));
    store.set_cache_key("tokens", json!(["a", "b"])).unwrap();
    assert!(store.has_session());

    thread::sleep(StdDuration::from_millis(500));

    assert!(!store.has_session());
    start(store);
    assert!(!store.has_cache_key("tokens").unwrap());
}
