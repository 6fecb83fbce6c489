//! Execution tracking
//!
//! - [`classifier`] - maps receipt statuses onto coarse phases
//! - [`handle`] - fetches and polls one execution's receipt
//!
//! ```text
//! PENDING ──→ QUEUED ──→ DELIVERED ──→ DONE
//!    │     (RETRYING)        │
//!    └──────────┴────────────┴───────→ ERROR
//! ```

pub mod classifier;
pub mod handle;

pub use classifier::{classify, classify_receipt};
pub use handle::{
    DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, ExecutionHandle, UpdateCallback, WaitOptions,
    WaitUntil,
};
