//! Search queries and glob patterns over textual references

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::reference::Reference;
use crate::search::error::SearchError;

/// Whether a pattern must match the letter case of references exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMatch {
    Exact,
    Insensitive,
}

/// The reference skeleton to search candidates for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub version_pattern: String,
    pub user: Option<String>,
    pub channel: Option<String>,
    pub revision: Option<String>,
}

impl SearchQuery {
    /// Query for every version of `reference`'s package under the same user/channel
    pub fn any_version(reference: &Reference) -> Self {
        Self {
            name: reference.name.clone(),
            version_pattern: "*".to_string(),
            user: reference.user.clone(),
            channel: reference.channel.clone(),
            revision: None,
        }
    }

    /// Build the glob pattern sent to search sources
    ///
    /// Without an explicit revision a trailing `*` is appended so that
    /// references carrying any revision still match.
    pub fn pattern(&self) -> Result<SearchPattern, SearchError> {
        let text = match &self.revision {
            Some(_) => self.to_string(),
            None => format!("{}*", self),
        };
        SearchPattern::new(&text)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version_pattern)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{}/{}", user, channel)?;
        }
        if let Some(revision) = &self.revision {
            write!(f, "#{}", revision)?;
        }
        Ok(())
    }
}

/// A glob pattern (`*` any run of characters, `?` one character) matched
/// against the full textual form of a reference
#[derive(Debug, Clone)]
pub struct SearchPattern {
    text: String,
    exact: Regex,
    insensitive: Regex,
}

impl SearchPattern {
    pub fn new(glob: &str) -> Result<Self, SearchError> {
        let mut source = String::from("^");
        for c in glob.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                c => source.push_str(&regex::escape(&c.to_string())),
            }
        }
        source.push('$');

        let build = |case_insensitive: bool| {
            RegexBuilder::new(&source)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|source| SearchError::InvalidPattern {
                    pattern: glob.to_string(),
                    source,
                })
        };

        Ok(Self {
            text: glob.to_string(),
            exact: build(false)?,
            insensitive: build(true)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, reference: &Reference, case: CaseMatch) -> bool {
        let text = reference.to_string();
        match case {
            CaseMatch::Exact => self.exact.is_match(&text),
            CaseMatch::Insensitive => self.insensitive.is_match(&text),
        }
    }

    /// The literal package name, when the pattern does not wildcard it
    pub fn literal_name(&self) -> Option<&str> {
        let (name, _) = self.text.split_once('/')?;
        (!name.contains(['*', '?'])).then_some(name)
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reference(s: &str) -> Reference {
        s.parse().unwrap()
    }

    #[test]
    fn pattern_widens_revision_when_none_requested() {
        let query = SearchQuery::any_version(&reference("zlib/[>1.0]@conan/stable"));
        assert_eq!(query.pattern().unwrap().as_str(), "zlib/*@conan/stable*");
    }

    #[test]
    fn pattern_keeps_explicit_revision() {
        let mut query = SearchQuery::any_version(&reference("zlib/1.0@conan/stable"));
        query.revision = Some("abc".to_string());
        assert_eq!(query.pattern().unwrap().as_str(), "zlib/*@conan/stable#abc");
    }

    #[rstest]
    #[case("zlib/*@conan/stable*", "zlib/1.2.11@conan/stable", CaseMatch::Exact, true)]
    #[case("zlib/*@conan/stable*", "zlib/1.2.11@conan/stable#3", CaseMatch::Exact, true)]
    #[case("zlib/*@conan/stable*", "zlib/1.2.11@conan/testing", CaseMatch::Exact, false)]
    #[case("zlib/*@conan/stable*", "zlibext/1.0@conan/stable", CaseMatch::Exact, false)]
    #[case("zlib/*@conan/stable*", "ZLIB/1.0@conan/stable", CaseMatch::Exact, false)]
    #[case("zlib/*@conan/stable*", "ZLIB/1.0@conan/stable", CaseMatch::Insensitive, true)]
    #[case("zlib/1.?@*", "zlib/1.2@demo/testing", CaseMatch::Exact, true)]
    #[case("zlib/1.2.*", "zlib/1.2.11", CaseMatch::Exact, true)]
    #[case("zlib/1.2.*", "zlib/1x2.11", CaseMatch::Exact, false)]
    fn pattern_matches_references(
        #[case] glob: &str,
        #[case] candidate: &str,
        #[case] case: CaseMatch,
        #[case] expected: bool,
    ) {
        let pattern = SearchPattern::new(glob).unwrap();
        assert_eq!(pattern.matches(&reference(candidate), case), expected);
    }

    #[rstest]
    #[case("zlib/*@conan/stable*", Some("zlib"))]
    #[case("zl*/*", None)]
    #[case("*", None)]
    fn literal_name_extracts_fixed_names(#[case] glob: &str, #[case] expected: Option<&str>) {
        let pattern = SearchPattern::new(glob).unwrap();
        assert_eq!(pattern.literal_name(), expected);
    }
}
