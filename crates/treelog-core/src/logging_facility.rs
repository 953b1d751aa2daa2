//! Structured logging facility
//!
//! - One initialization point, `init(profile)`
//! - Operation macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   emitting the canonical fields from `treelog_core_types::schema`
//! - Correlation through spans (replay opens a span carrying the request id)
//! - A capture layer so tests can assert on emitted events
//!
//! # Usage
//!
//! ```rust
//! use treelog_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
