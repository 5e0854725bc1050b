use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::section::ItemId;

// Last id handed out by `next_id`, shared by the whole process.
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// A new item id: the current time in milliseconds, bumped past the last
/// id issued so ids stay strictly increasing within the process.
pub fn next_id() -> ItemId {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut last = LAST_ID.load(Ordering::SeqCst);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
