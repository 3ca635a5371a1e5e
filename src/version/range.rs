//! Version range expressions
//!
//! Supported syntax (loose, node-semver compatible):
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`, `=1.2.3`, `1.2.3` - comparison operators
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0, special cases for 0.x)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `1.2.x`, `1.*`, `1.2`, `*`, empty - wildcards
//! - `1.0.0 - 2.0.0` - hyphen range (>=1.0.0 <=2.0.0)
//! - `>=1.0 <2.0` or `>=1.0, <2.0` - AND, commas are treated as whitespace
//! - `^1.0 || ^2.0` - OR
//! - `include_prerelease=True` - let pre-release versions match any clause

use std::fmt;
use std::str::FromStr;

use semver::{Prerelease, Version};

use crate::version::error::RangeError;
use crate::version::semver::{cmp_precedence, parse_prerelease};

/// A parsed version range expression
#[derive(Debug, Clone)]
pub struct VersionRange {
    raw: String,
    /// Alternatives (OR); each set is an AND of comparators
    sets: Vec<ComparatorSet>,
    include_prerelease: bool,
}

#[derive(Debug, Clone, Default)]
struct ComparatorSet {
    comparators: Vec<Comparator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
struct Comparator {
    op: Op,
    version: Version,
}

/// A version in a range clause, where missing or `x`/`*` components are wildcards
#[derive(Debug, Clone, PartialEq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl VersionRange {
    pub fn parse(expr: &str) -> Result<Self, RangeError> {
        let normalized = expr.replace(',', " ");

        let mut include_prerelease = false;
        let mut tokens = Vec::new();
        for token in normalized.split_whitespace() {
            match parse_option(token) {
                Some(("include_prerelease", value)) => {
                    include_prerelease = value.eq_ignore_ascii_case("true");
                }
                // Parsing is always loose
                Some(("loose", _)) => {}
                Some(_) => {
                    return Err(RangeError::UnknownOption {
                        range: expr.to_string(),
                        option: token.to_string(),
                    });
                }
                None => tokens.push(token),
            }
        }

        let sets = tokens
            .join(" ")
            .split("||")
            .map(|set| ComparatorSet::parse(expr, set))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: expr.to_string(),
            sets,
            include_prerelease,
        })
    }

    /// Check if a version satisfies any of the alternative sets
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets
            .iter()
            .any(|set| set.satisfies(version, self.include_prerelease))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for VersionRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split `key=value` option tokens; comparators such as `=1.0` or `>=1.0` are not options
fn parse_option(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    let is_key = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
    is_key.then_some((key, value))
}

impl ComparatorSet {
    fn parse(range: &str, set: &str) -> Result<Self, RangeError> {
        let invalid = |clause: &str| RangeError::InvalidClause {
            range: range.to_string(),
            clause: clause.to_string(),
        };

        let tokens: Vec<&str> = set.split_whitespace().collect();
        let mut comparators = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = tokens[i];

            // Hyphen range: "1.0.0 - 2.0.0"
            if tokens.get(i + 1) == Some(&"-") {
                let Some(to) = tokens.get(i + 2) else {
                    return Err(invalid(&tokens[i..].join(" ")));
                };
                let from_partial = parse_partial(token).ok_or_else(|| invalid(token))?;
                let to_partial = parse_partial(to).ok_or_else(|| invalid(to))?;
                comparators.extend(hyphen(from_partial, to_partial));
                i += 3;
                continue;
            }

            if token == "-" {
                return Err(invalid(token));
            }

            // An operator separated from its version by whitespace: ">= 1.2.3"
            let (clause, consumed) = if is_operator(token) {
                let Some(next) = tokens.get(i + 1) else {
                    return Err(invalid(token));
                };
                (format!("{}{}", token, next), 2)
            } else {
                (token.to_string(), 1)
            };

            comparators.extend(parse_clause(&clause).ok_or_else(|| invalid(&clause))?);
            i += consumed;
        }

        Ok(Self { comparators })
    }

    fn satisfies(&self, version: &Version, include_prerelease: bool) -> bool {
        if !self.comparators.iter().all(|c| c.satisfies(version)) {
            return false;
        }

        if version.pre.is_empty() || include_prerelease {
            return true;
        }

        // A pre-release only matches when some comparator names a pre-release
        // of the same major.minor.patch
        self.comparators.iter().any(|c| {
            !c.version.pre.is_empty()
                && c.version.major == version.major
                && c.version.minor == version.minor
                && c.version.patch == version.patch
        })
    }
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn satisfies(&self, version: &Version) -> bool {
        let ordering = cmp_precedence(version, &self.version);
        match self.op {
            Op::Eq => ordering.is_eq(),
            Op::Gt => ordering.is_gt(),
            Op::Gte => ordering.is_ge(),
            Op::Lt => ordering.is_lt(),
            Op::Lte => ordering.is_le(),
        }
    }
}

fn is_operator(token: &str) -> bool {
    matches!(token, ">=" | "<=" | ">" | "<" | "=" | "^" | "~" | "~>")
}

/// Desugar a single clause into comparators; an empty result matches everything
fn parse_clause(clause: &str) -> Option<Vec<Comparator>> {
    if let Some(rest) = clause.strip_prefix('^') {
        return parse_partial(rest).map(caret);
    }
    // "~>" is accepted as a tilde alias
    if let Some(rest) = clause
        .strip_prefix("~>")
        .or_else(|| clause.strip_prefix('~'))
    {
        return parse_partial(rest).map(tilde);
    }

    let (op, rest) = if let Some(rest) = clause.strip_prefix(">=") {
        (Op::Gte, rest)
    } else if let Some(rest) = clause.strip_prefix("<=") {
        (Op::Lte, rest)
    } else if let Some(rest) = clause.strip_prefix('>') {
        (Op::Gt, rest)
    } else if let Some(rest) = clause.strip_prefix('<') {
        (Op::Lt, rest)
    } else if let Some(rest) = clause.strip_prefix('=') {
        (Op::Eq, rest)
    } else {
        (Op::Eq, clause)
    };

    parse_partial(rest).map(|partial| x_range(op, partial))
}

fn parse_partial(spec: &str) -> Option<Partial> {
    let spec = spec
        .trim()
        .trim_start_matches(|c: char| c == 'v' || c == '=');
    if spec.is_empty() {
        return None;
    }

    // Build metadata never affects matching
    let spec = spec.split_once('+').map_or(spec, |(rest, _)| rest);

    let core_len = spec
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'x' | 'X' | '*')))
        .unwrap_or(spec.len());
    let (core, tail) = spec.split_at(core_len);

    let pre = match tail.strip_prefix('-').unwrap_or(tail) {
        "" if tail.is_empty() => Prerelease::EMPTY,
        "" => return None,
        pre => parse_prerelease(pre)?,
    };

    let mut components = [None; 3];
    let mut wildcard = false;
    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return None;
    }
    for (slot, part) in components.iter_mut().zip(parts) {
        match part {
            "" => return None,
            "x" | "X" | "*" => wildcard = true,
            // Anything after a wildcard component is a wildcard too: "1.x.3" == "1.x"
            _ if wildcard => {}
            number => *slot = Some(number.parse::<u64>().ok()?),
        }
    }

    let [major, minor, patch] = components;
    let minor = major.and(minor);
    let patch = minor.and(patch);
    Some(Partial {
        major,
        minor,
        patch,
        pre: if patch.is_some() { pre } else { Prerelease::EMPTY },
    })
}

impl Partial {
    fn is_full(&self) -> bool {
        self.patch.is_some()
    }

    /// The lowest version this partial can denote
    fn floor(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
            build: semver::BuildMetadata::EMPTY,
        }
    }

    /// The first version past the wildcard span: 1 -> 2.0.0, 1.2 -> 1.3.0
    ///
    /// None when the span has no upper end.
    fn next_span(&self) -> Option<Version> {
        match (self.major, self.minor) {
            (Some(major), None) => next_major(major),
            (Some(major), Some(minor)) => next_minor(major, minor),
            (None, _) => None,
        }
    }
}

// A span ending at u64::MAX carries into the next component, and is unbounded
// when nothing is left to carry into.
fn next_major(major: u64) -> Option<Version> {
    major.checked_add(1).map(|major| Version::new(major, 0, 0))
}

fn next_minor(major: u64, minor: u64) -> Option<Version> {
    minor
        .checked_add(1)
        .map(|minor| Version::new(major, minor, 0))
        .or_else(|| next_major(major))
}

fn next_patch(major: u64, minor: u64, patch: u64) -> Option<Version> {
    patch
        .checked_add(1)
        .map(|patch| Version::new(major, minor, patch))
        .or_else(|| next_minor(major, minor))
}

/// `>=floor`, bounded by `<upper` when there is one
fn bounded(floor: Version, upper: Option<Version>) -> Vec<Comparator> {
    let mut comparators = vec![Comparator::new(Op::Gte, floor)];
    comparators.extend(upper.map(|upper| Comparator::new(Op::Lt, upper)));
    comparators
}

/// Matches nothing: every version is at least 0.0.0-0
fn never() -> Vec<Comparator> {
    vec![Comparator::new(
        Op::Lt,
        Version {
            pre: Prerelease::new("0").unwrap_or(Prerelease::EMPTY),
            ..Version::new(0, 0, 0)
        },
    )]
}

fn x_range(op: Op, partial: Partial) -> Vec<Comparator> {
    if partial.major.is_none() {
        return match op {
            Op::Gt | Op::Lt => never(),
            _ => Vec::new(),
        };
    }

    if partial.is_full() {
        return vec![Comparator::new(op, partial.floor())];
    }

    let next = partial.next_span();
    match op {
        Op::Eq => bounded(partial.floor(), next),
        Op::Gt => next.map_or_else(never, |next| vec![Comparator::new(Op::Gte, next)]),
        Op::Gte => vec![Comparator::new(Op::Gte, partial.floor())],
        Op::Lt => vec![Comparator::new(Op::Lt, partial.floor())],
        Op::Lte => next
            .map(|next| vec![Comparator::new(Op::Lt, next)])
            .unwrap_or_default(),
    }
}

fn tilde(partial: Partial) -> Vec<Comparator> {
    let Some(major) = partial.major else {
        return Vec::new();
    };
    let upper = match partial.minor {
        Some(minor) => next_minor(major, minor),
        None => next_major(major),
    };
    bounded(partial.floor(), upper)
}

fn caret(partial: Partial) -> Vec<Comparator> {
    let Some(major) = partial.major else {
        return Vec::new();
    };
    let upper = match (major, partial.minor, partial.patch) {
        (_, None, _) => next_major(major),
        (0, Some(minor), None) => next_minor(0, minor),
        (0, Some(0), Some(patch)) => next_patch(0, 0, patch),
        (0, Some(minor), Some(_)) => next_minor(0, minor),
        (_, Some(_), _) => next_major(major),
    };
    bounded(partial.floor(), upper)
}

fn hyphen(from: Partial, to: Partial) -> Vec<Comparator> {
    let mut comparators = Vec::new();
    if from.major.is_some() {
        comparators.push(Comparator::new(Op::Gte, from.floor()));
    }
    if to.is_full() {
        comparators.push(Comparator::new(Op::Lte, to.floor()));
    } else if let Some(next) = to.next_span() {
        comparators.push(Comparator::new(Op::Lt, next));
    }
    comparators
}
