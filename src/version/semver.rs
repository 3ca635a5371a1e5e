use std::cmp::Ordering;

use semver::{BuildMetadata, Prerelease, Version};

/// Parse a version string loosely into a semver::Version.
///
/// Accepted beyond strict SemVer:
/// - leading `v`, `=` and whitespace ("v1.2.3", "=1.2.3")
/// - partial versions padded with zeros ("1" -> 1.0.0, "1.2" -> 1.2.0)
/// - leading zeros in numeric components ("1.02.3" -> 1.2.3)
/// - pre-release without a hyphen ("1.2.3beta" -> 1.2.3-beta)
/// - leading zeros in numeric pre-release identifiers ("1.0.0-rc.01" -> 1.0.0-rc.1)
///
/// Returns None when the string cannot be interpreted as a version.
pub fn parse_loose(version: &str) -> Option<Version> {
    let version = version
        .trim()
        .trim_start_matches(|c: char| c == 'v' || c == '=' || c.is_whitespace());

    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) if !build.is_empty() => (rest, BuildMetadata::new(build).ok()?),
        Some(_) => return None,
        None => (version, BuildMetadata::EMPTY),
    };

    let core_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (core, tail) = rest.split_at(core_len);

    let pre = match tail.strip_prefix('-').unwrap_or(tail) {
        "" if tail.is_empty() => Prerelease::EMPTY,
        "" => return None,
        pre => parse_prerelease(pre)?,
    };

    let (major, minor, patch) = parse_core(core)?;

    Some(Version {
        major,
        minor,
        patch,
        pre,
        build,
    })
}

/// Parse a dot-separated pre-release, reading numeric identifiers as numbers
pub(crate) fn parse_prerelease(pre: &str) -> Option<Prerelease> {
    let normalized = pre
        .split('.')
        .map(|id| {
            if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
                match id.trim_start_matches('0') {
                    "" => "0",
                    digits => digits,
                }
            } else {
                id
            }
        })
        .collect::<Vec<_>>()
        .join(".");

    Prerelease::new(&normalized).ok()
}

/// Parse `major[.minor[.patch]]`, padding missing components with zero
fn parse_core(core: &str) -> Option<(u64, u64, u64)> {
    let parts = core
        .split('.')
        .map(|part| {
            if part.is_empty() {
                None
            } else {
                part.parse::<u64>().ok()
            }
        })
        .collect::<Option<Vec<u64>>>()?;

    match parts.as_slice() {
        [major] => Some((*major, 0, 0)),
        [major, minor] => Some((*major, *minor, 0)),
        [major, minor, patch] => Some((*major, *minor, *patch)),
        _ => None,
    }
}

/// SemVer precedence: build metadata does not take part in the ordering.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    a.cmp_precedence(b)
}
