use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid version range '{range}': cannot parse '{clause}'")]
    InvalidClause { range: String, clause: String },

    #[error("Invalid version range '{range}': unknown option '{option}'")]
    UnknownOption { range: String, option: String },
}
