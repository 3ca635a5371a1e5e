use thiserror::Error;

use crate::reference::Reference;
use crate::search::error::SearchError;
use crate::version::error::RangeError;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// A pinned reference does not satisfy the range declared upstream
    #[error(
        "Version range '{range}' required by '{requester}' not valid for downstream requirement '{reference}'"
    )]
    RangeMismatch {
        range: String,
        requester: String,
        reference: Reference,
    },

    /// No source offers a reference satisfying the range
    #[error("The version in '{range}' from requirement '{requirement}' could not be resolved")]
    Unresolvable { range: String, requirement: String },

    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    #[error(transparent)]
    Search(#[from] SearchError),
}
