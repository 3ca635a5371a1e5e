//! Selection of the best version satisfying a range

use std::cmp::Ordering;

use semver::Version;

use crate::notify::Notifier;
use crate::version::error::RangeError;
use crate::version::range::VersionRange;
use crate::version::semver::{cmp_precedence, parse_loose};

/// Trait for picking the maximum version that satisfies a range
///
/// Implementations decide how tolerant version parsing is. Versions that
/// cannot be parsed must be skipped (reporting a warning through `notifier`),
/// never turned into an error.
pub trait VersionComparator: Send + Sync {
    /// Returns the greatest version of `versions` satisfying `range`, or None
    fn satisfying(
        &self,
        versions: &[String],
        range: &VersionRange,
        notifier: &dyn Notifier,
    ) -> Option<String>;
}

/// Comparator using loose SemVer parsing (see [`parse_loose`])
#[derive(Debug, Default, Clone, Copy)]
pub struct LooseSemverComparator;

impl VersionComparator for LooseSemverComparator {
    fn satisfying(
        &self,
        versions: &[String],
        range: &VersionRange,
        notifier: &dyn Notifier,
    ) -> Option<String> {
        versions
            .iter()
            .filter_map(|v| match parse_loose(v) {
                Some(parsed) => Some((v, parsed)),
                None => {
                    notifier.warn(&format!(
                        "Version '{}' is not semver, cannot be compared with a range",
                        v
                    ));
                    None
                }
            })
            .filter(|(_, parsed)| range.satisfies(parsed))
            .max_by(|a, b| cmp_candidates(a, b))
            .map(|(original, _)| original.clone())
    }
}

/// Order by SemVer precedence; equal precedence ("1.0" vs "1.0.0") falls back
/// to the original string so the result does not depend on input order
fn cmp_candidates(a: &(&String, Version), b: &(&String, Version)) -> Ordering {
    cmp_precedence(&a.1, &b.1).then_with(|| a.0.cmp(b.0))
}

/// Parse `range_expr` and return the greatest satisfying version of `versions`
pub fn satisfying(
    versions: &[String],
    range_expr: &str,
    notifier: &dyn Notifier,
) -> Result<Option<String>, RangeError> {
    let range = VersionRange::parse(range_expr)?;
    Ok(LooseSemverComparator.satisfying(versions, &range, notifier))
}
