use std::fmt;
use std::str::FromStr;

use crate::reference::{Reference, ReferenceError};

/// A dependency requirement as seen by one node of the dependency graph
///
/// `reference` is the pinned reference when `resolved` is true; otherwise it
/// is a skeleton whose version holds the bracketed range (`zlib/[>=1.0]@conan/stable`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub reference: Reference,
    pub version_range: Option<String>,
    pub resolved: bool,
}

impl Requirement {
    /// A requirement on an exact reference, without any range
    pub fn pinned(reference: Reference) -> Self {
        Self {
            reference,
            version_range: None,
            resolved: true,
        }
    }

    /// An open range requirement on `name` under `user`/`channel`
    pub fn range(name: &str, range: &str, user: Option<&str>, channel: Option<&str>) -> Self {
        Self {
            reference: Reference::new(name, format!("[{}]", range), user, channel),
            version_range: Some(range.to_string()),
            resolved: false,
        }
    }

    /// A range requirement already fixed to `reference` (e.g. by a downstream override)
    pub fn fixed(range: &str, reference: Reference) -> Self {
        Self {
            reference,
            version_range: Some(range.to_string()),
            resolved: true,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reference.fmt(f)
    }
}

impl FromStr for Requirement {
    type Err = ReferenceError;

    /// Parse `name/[range]@user/channel` or a plain reference
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let Some((name, rest)) = s.split_once("/[") else {
            return s.parse().map(Requirement::pinned);
        };
        let Some((range, owner)) = rest.split_once(']') else {
            return Err(ReferenceError::Malformed(s.to_string()));
        };

        // Validate name/user/channel through the reference parser with a placeholder version
        let skeleton: Reference = format!("{}/0{}", name, owner).parse()?;
        if skeleton.revision.is_some() {
            return Err(ReferenceError::InvalidField {
                reference: s.to_string(),
                field: "revision",
            });
        }

        Ok(Requirement::range(
            &skeleton.name,
            range.trim(),
            skeleton.user.as_deref(),
            skeleton.channel.as_deref(),
        ))
    }
}
