//! Transcript parsing stages.
//!
//! - [`dialect`] detects the header format and parses header fields
//! - [`scanner`] groups lines into messages
//! - [`system`] classifies join/leave/pin and other system notices
//! - [`deletion`] recognizes deleted-message sentinels

pub mod deletion;
pub mod dialect;
pub mod scanner;
pub mod system;

pub use deletion::{DeletionKind, deletion_kind};
pub use dialect::{Dialect, detect_dialect};
pub use scanner::{MessageScanner, ScanOutput};
pub use system::{Disposition, LocalizedPattern, SystemEvent, classify};
