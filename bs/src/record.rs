//! Record trait for typed documents
//!
//! A Record is any serde type that knows which collection it lives in and
//! what its id is. Stores persist records as JSON documents.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{SystemTime, UNIX_EPOCH};

/// A typed document that can be persisted in a [`StateStore`](crate::StateStore)
pub trait Record: Serialize + DeserializeOwned {
    /// Collection (table/namespace) this record type lives in
    fn collection() -> &'static str;

    /// Unique id of this record within its collection
    fn id(&self) -> String;
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_monotonic_enough() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
        assert!(a > 0);
    }
}
