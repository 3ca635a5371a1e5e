//! Version comparison layer
//!
//! Turns version strings and range expressions into comparable values and
//! picks the best version of a candidate pool.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   semver    │────▶│    range    │────▶│ comparator  │
//! │ (loose parse│     │ (expression │     │ (max        │
//! │  + ordering)│     │  matching)  │     │  satisfying)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: Loose version parsing and precedence ordering
//! - [`range`]: Range expression parsing and satisfaction
//! - [`comparator`]: `VersionComparator` trait and the loose SemVer implementation
//! - [`error`]: Error types for range expressions

pub mod comparator;
pub mod error;
pub mod range;
pub mod semver;
