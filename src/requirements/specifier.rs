//! Requirement specifiers
//!
//! A [`Requirement`] is an opaque string to the coordinator. The parsing
//! helpers here exist for the pip collaborator, which has to answer
//! "is this already installed" by comparing an installed version against
//! the specifier's clauses.

use crate::error::{RequisiteError, RequisiteResult};
use pep440_rs::{Version, VersionSpecifier};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A package name plus optional version constraint, e.g. `"hello==1.0.0"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Requirement(String);

impl Requirement {
    /// Wrap a specifier string. Empty specifiers are rejected.
    pub fn new(spec: impl Into<String>) -> RequisiteResult<Self> {
        let spec = spec.into();
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(RequisiteError::InvalidRequirement(spec));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The specifier exactly as passed to the installer
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the specifier into a project name and version clauses.
    ///
    /// URL specifiers (`git+https://...#egg=name==1.0`) are resolved through
    /// their fragment.
    pub fn parse(&self) -> RequisiteResult<ParsedRequirement> {
        let spec = if self.0.contains("://") {
            let fragment = self
                .0
                .split_once('#')
                .map(|(_, fragment)| fragment)
                .ok_or_else(|| RequisiteError::InvalidRequirement(self.0.clone()))?;
            fragment.strip_prefix("egg=").unwrap_or(fragment)
        } else {
            self.0.as_str()
        };

        // Environment markers are evaluated by pip, not here
        let spec = spec.split(';').next().unwrap_or(spec).trim();

        let name_end = spec
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
            .unwrap_or(spec.len());
        let name = &spec[..name_end];
        if name.is_empty() {
            return Err(RequisiteError::InvalidRequirement(self.0.clone()));
        }

        let mut rest = spec[name_end..].trim_start();
        if let Some(after) = rest.strip_prefix('[') {
            let close = after
                .find(']')
                .ok_or_else(|| RequisiteError::InvalidRequirement(self.0.clone()))?;
            rest = after[close + 1..].trim_start();
        }

        let clauses = rest
            .split(',')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(|clause| {
                clause
                    .parse::<VersionClause>()
                    .map_err(|_| RequisiteError::InvalidRequirement(self.0.clone()))
            })
            .collect::<RequisiteResult<Vec<_>>>()?;

        Ok(ParsedRequirement {
            name: name.to_string(),
            clauses,
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Requirement {
    type Err = RequisiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Requirement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Project name and version clauses of a specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequirement {
    /// Distribution name as written
    pub name: String,
    /// Version clauses, all of which must hold
    pub clauses: Vec<VersionClause>,
}

impl ParsedRequirement {
    /// Check an installed version against every clause
    pub fn matches(&self, installed: &str) -> bool {
        self.clauses.iter().all(|clause| clause.matches(installed))
    }
}

/// One clause of a specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionClause {
    /// A PEP 440 comparison such as `>=1.9`, `~=1.4.2` or `==1.2.*`
    Specifier(VersionSpecifier),
    /// `===` string identity, for versions that are not PEP 440
    Arbitrary(String),
}

impl FromStr for VersionClause {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(version) = s.strip_prefix("===") {
            let version = version.trim();
            if version.is_empty() {
                return Err(());
            }
            return Ok(Self::Arbitrary(version.to_string()));
        }

        VersionSpecifier::from_str(s)
            .map(Self::Specifier)
            .map_err(|_| ())
    }
}

impl VersionClause {
    /// Check an installed version against this clause.
    ///
    /// An installed version that is not valid PEP 440 only satisfies `===`.
    pub fn matches(&self, installed: &str) -> bool {
        match self {
            Self::Arbitrary(version) => installed.trim() == version,
            Self::Specifier(specifier) => Version::from_str(installed.trim())
                .map(|version| specifier.contains(&version))
                .unwrap_or(false),
        }
    }
}

/// PEP 440 ordering of two versions, `None` if either does not parse
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = Version::from_str(a.trim()).ok()?;
    let b = Version::from_str(b.trim()).ok()?;
    Some(a.cmp(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(s: &str) -> Requirement {
        Requirement::new(s).unwrap()
    }

    #[test]
    fn rejects_empty() {
        assert!(Requirement::new("   ").is_err());
    }

    #[test]
    fn keeps_specifier_verbatim() {
        assert_eq!(req(" hello==1.0.0 ").as_str(), "hello==1.0.0");
        assert_eq!(req("hello==1.0.0").to_string(), "hello==1.0.0");
    }

    #[test]
    fn parse_pinned() {
        let parsed = req("hello==1.0.0").parse().unwrap();
        assert_eq!(parsed.name, "hello");
        assert_eq!(
            parsed.clauses,
            vec![VersionClause::Specifier(
                VersionSpecifier::from_str("==1.0.0").unwrap()
            )]
        );
    }

    #[test]
    fn parse_bare_name() {
        let parsed = req("wledpy").parse().unwrap();
        assert_eq!(parsed.name, "wledpy");
        assert!(parsed.clauses.is_empty());
        assert!(parsed.matches("0.0.1"));
    }

    #[test]
    fn parse_extras_and_ranges() {
        let parsed = req("aiohttp[speedups]>=3.5, <4").parse().unwrap();
        assert_eq!(parsed.name, "aiohttp");
        assert_eq!(parsed.clauses.len(), 2);
        assert!(parsed.matches("3.6.2"));
        assert!(!parsed.matches("4.0.0"));
        assert!(!parsed.matches("3.4"));
    }

    #[test]
    fn parse_url_egg_fragment() {
        let parsed = req("git+https://github.com/x/pywled.git#egg=pywled==0.1.0")
            .parse()
            .unwrap();
        assert_eq!(parsed.name, "pywled");
        assert!(parsed.matches("0.1.0"));
    }

    #[test]
    fn parse_url_without_fragment_fails() {
        assert!(req("https://example.org/pkg.zip").parse().is_err());
    }

    #[test]
    fn parse_ignores_environment_markers() {
        let parsed = req("uvloop==0.12.2; sys_platform != 'win32'").parse().unwrap();
        assert_eq!(parsed.name, "uvloop");
        assert_eq!(parsed.clauses.len(), 1);
    }

    #[test]
    fn version_ordering() {
        assert_eq!(compare_versions("1.0", "1.0.0"), Some(Ordering::Equal));
        assert_eq!(compare_versions("1.10", "1.9"), Some(Ordering::Greater));
        assert_eq!(compare_versions("1.10rc1", "1.9"), Some(Ordering::Greater));
        assert_eq!(compare_versions("2.0b1", "2.0"), Some(Ordering::Less));
        assert_eq!(compare_versions("1.0.post1", "1.0"), Some(Ordering::Greater));
        assert_eq!(compare_versions("1.0.dev1", "1.0"), Some(Ordering::Less));
        assert_eq!(compare_versions("not a version", "1.0"), None);
    }

    #[test]
    fn pre_and_post_releases_satisfy_lower_bounds() {
        assert!(req("pkg>=1.9").parse().unwrap().matches("1.10rc1"));
        assert!(req("pkg>=1.0").parse().unwrap().matches("1.0.post1"));
        assert!(!req("pkg>=1.0").parse().unwrap().matches("1.0rc1"));
    }

    #[test]
    fn unparseable_installed_version_is_unsatisfied() {
        assert!(!req("pkg>=1.0").parse().unwrap().matches("custom-build"));
        assert!(req("pkg").parse().unwrap().matches("custom-build"));
    }

    #[test]
    fn wildcard_and_compatible() {
        let parsed = req("pkg==1.2.*").parse().unwrap();
        assert!(parsed.matches("1.2.9"));
        assert!(!parsed.matches("1.3.0"));

        let parsed = req("pkg~=1.4.2").parse().unwrap();
        assert!(parsed.matches("1.4.5"));
        assert!(!parsed.matches("1.5.0"));
        assert!(!parsed.matches("1.4.1"));
    }

    #[test]
    fn not_equal_and_arbitrary() {
        assert!(req("pkg!=1.0").parse().unwrap().matches("1.1"));
        assert!(!req("pkg!=1.0").parse().unwrap().matches("1.0.0"));
        assert!(req("pkg===1.0-custom").parse().unwrap().matches("1.0-custom"));
    }
}
