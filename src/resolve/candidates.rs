use indexmap::IndexMap;

use crate::reference::Reference;

/// Candidate pool keyed by version string, one reference per version
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    by_version: IndexMap<String, Reference>,
}

impl CandidateSet {
    /// Build the pool; when several references carry the same version string
    /// the first one is kept
    pub fn from_references(references: impl IntoIterator<Item = Reference>) -> Self {
        let mut by_version = IndexMap::new();
        for reference in references {
            by_version
                .entry(reference.version.clone())
                .or_insert(reference);
        }
        Self { by_version }
    }

    pub fn versions(&self) -> Vec<String> {
        self.by_version.keys().cloned().collect()
    }

    pub fn get(&self, version: &str) -> Option<&Reference> {
        self.by_version.get(version)
    }

    pub fn is_empty(&self) -> bool {
        self.by_version.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_version.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reference_per_version_wins() {
        let set = CandidateSet::from_references(vec![
            "zlib/1.0@conan/stable#1".parse::<Reference>().unwrap(),
            "zlib/1.1@conan/stable".parse().unwrap(),
            "zlib/1.0@other/stable#2".parse().unwrap(),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.versions(), vec!["1.0", "1.1"]);
        assert_eq!(
            set.get("1.0").map(|r| r.to_string()),
            Some("zlib/1.0@conan/stable#1".to_string())
        );
        assert!(set.get("2.0").is_none());
    }
}
