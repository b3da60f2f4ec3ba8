//! Run identifiers.
//!
//! The process gets one ULID at first access; every ranking request gets its own
//! `match_run_id`. Both sort lexicographically by creation time.
//!
//! ```
//! use bm_common::run_id;
//!
//! let process = run_id::get();
//! let request = run_id::match_run_id();
//! assert_ne!(process, request);
//! ```

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Process-level run id, stable for the process lifetime.
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

/// Fresh id for one ranking request, reported as `meta.match_run_id`.
#[inline]
pub fn match_run_id() -> String {
    Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_same_value() {
        assert_eq!(get(), get());
        assert_eq!(get().len(), 26);
    }

    #[test]
    fn match_run_ids_are_unique_and_time_ordered() {
        let older = match_run_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = match_run_id();
        assert_ne!(older, newer);
        assert!(older < newer);
    }
}
