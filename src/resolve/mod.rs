//! Requirement resolution layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│ Orchestrator │────▶│   Sources   │
//! │ (pinned or  │     │ (local/remote│     │(cache,      │
//! │  open range)│     │  ordering)   │     │ remotes)    │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌──────────────┐     ┌─────────────┐
//!                     │   Revision   │────▶│ Comparator  │
//!                     │  selection   │     │ (max range  │
//!                     │              │     │  match)     │
//!                     └──────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: `RequirementResolver` and the `Resolution` outcome
//! - [`orchestrator`]: Source ordering (`SearchStrategy`) and short-circuiting
//! - [`revision`]: Newest-revision selection per logical version
//! - [`candidates`]: Candidate pool keyed by version
//! - [`requirement`]: Requirements and their textual form
//! - [`error`]: Fatal resolution errors

pub mod candidates;
pub mod error;
pub mod orchestrator;
pub mod requirement;
pub mod resolver;
pub mod revision;
