//! Package references (`name/version@user/channel#revision`)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Invalid reference '{0}': expected name/version[@user/channel][#revision]")]
    Malformed(String),

    #[error("Invalid reference '{reference}': empty or invalid {field}")]
    InvalidField {
        reference: String,
        field: &'static str,
    },
}

/// A concrete package reference
///
/// Two references are logically equal when name, version, user and channel
/// match; the revision only distinguishes builds of the same logical version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub name: String,
    pub version: String,
    pub user: Option<String>,
    pub channel: Option<String>,
    pub revision: Option<String>,
}

impl Reference {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        user: Option<&str>,
        channel: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            user: user.map(str::to_string),
            channel: channel.map(str::to_string),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Same reference with the revision stripped
    pub fn without_revision(&self) -> Reference {
        Reference {
            revision: None,
            ..self.clone()
        }
    }

    /// Whether both references denote the same logical version, ignoring revisions
    pub fn same_logical(&self, other: &Reference) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.user == other.user
            && self.channel == other.channel
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{}/{}", user, channel)?;
        }
        if let Some(revision) = &self.revision {
            write!(f, "#{}", revision)?;
        }
        Ok(())
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (body, revision) = match s.split_once('#') {
            Some((body, revision)) => (body, Some(revision)),
            None => (s, None),
        };
        let (package, owner) = match body.split_once('@') {
            Some((package, owner)) => (package, Some(owner)),
            None => (body, None),
        };

        let Some((name, version)) = package.split_once('/') else {
            return Err(ReferenceError::Malformed(s.to_string()));
        };

        let (user, channel) = match owner {
            Some(owner) => {
                let Some((user, channel)) = owner.split_once('/') else {
                    return Err(ReferenceError::Malformed(s.to_string()));
                };
                (Some(user), Some(channel))
            }
            None => (None, None),
        };

        let check = |value: &str, field: &'static str| {
            if is_valid_field(value) {
                Ok(())
            } else {
                Err(ReferenceError::InvalidField {
                    reference: s.to_string(),
                    field,
                })
            }
        };
        check(name, "name")?;
        check(version, "version")?;
        if let (Some(user), Some(channel)) = (user, channel) {
            check(user, "user")?;
            check(channel, "channel")?;
        }
        if let Some(revision) = revision {
            check(revision, "revision")?;
        }

        Ok(Reference {
            name: name.to_string(),
            version: version.to_string(),
            user: user.map(str::to_string),
            channel: channel.map(str::to_string),
            revision: revision.map(str::to_string),
        })
    }
}

fn is_valid_field(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '@' | '#'))
}
