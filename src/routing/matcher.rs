//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a pattern string into a sequence of segment matchers
//! - Match a request path segment by segment, capturing variables
//! - Rank patterns so overlapping routes resolve deterministically
//!
//! # Pattern Grammar
//! ```text
//! /unicorns                 literal segments, exact and case-sensitive
//! /unicorns/{id}            variable: any single non-empty segment
//! /unicorns/{id:[0-9]+}     constrained variable: whole segment must match the regex
//! /files/*                  wildcard: everything after `/files/`, possibly empty (last segment only)
//! ```
//!
//! # Design Decisions
//! - Regexes are anchored at compile time so they constrain the whole segment
//! - Paths are matched as received (no percent-decoding)

use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Parameter name the wildcard remainder is captured under.
pub const WILDCARD_PARAM: &str = "*";

/// Error type for pattern compilation.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern must start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("unclosed variable in segment {0:?}")]
    UnclosedVariable(String),

    #[error("variable without a name in segment {0:?}")]
    EmptyVariableName(String),

    #[error("braces must enclose the whole segment: {0:?}")]
    MisplacedBrace(String),

    #[error("wildcard must be the last segment of {0:?}")]
    WildcardNotLast(String),

    #[error("invalid regex in segment {segment:?}: {source}")]
    InvalidRegex {
        segment: String,
        #[source]
        source: regex::Error,
    },
}

/// One compiled segment of a pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    Literal(String),
    Variable(String),
    Constrained { name: String, regex: Regex },
    Wildcard,
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw == "*" {
            return Ok(Segment::Wildcard);
        }

        if !raw.starts_with('{') {
            if raw.contains(['{', '}']) {
                return Err(PatternError::MisplacedBrace(raw.to_string()));
            }
            return Ok(Segment::Literal(raw.to_string()));
        }

        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| PatternError::UnclosedVariable(raw.to_string()))?;

        let (name, constraint) = match inner.split_once(':') {
            Some((name, regex)) => (name.trim(), Some(regex)),
            None => (inner.trim(), None),
        };

        if name.is_empty() {
            return Err(PatternError::EmptyVariableName(raw.to_string()));
        }

        match constraint {
            None => Ok(Segment::Variable(name.to_string())),
            Some(re) => {
                let regex = Regex::new(&format!("^(?:{})$", re)).map_err(|source| {
                    PatternError::InvalidRegex {
                        segment: raw.to_string(),
                        source,
                    }
                })?;
                Ok(Segment::Constrained {
                    name: name.to_string(),
                    regex,
                })
            }
        }
    }

    /// Lower is more specific.
    fn rank(&self) -> u8 {
        match self {
            Segment::Literal(_) => 0,
            Segment::Constrained { .. } => 1,
            Segment::Variable(_) => 2,
            Segment::Wildcard => 3,
        }
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a pattern string.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }
        if !source.starts_with('/') {
            return Err(PatternError::NotAbsolute(source.to_string()));
        }

        let segments = split_path(source)
            .into_iter()
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(pos) = segments.iter().position(|s| matches!(s, Segment::Wildcard)) {
            if pos != segments.len() - 1 {
                return Err(PatternError::WildcardNotLast(source.to_string()));
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a request path, returning the captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts = split_path(path);
        let mut params = HashMap::new();

        for (i, segment) in self.segments.iter().enumerate() {
            if let Segment::Wildcard = segment {
                // `/files/*` needs the separator: `/files` is not under it
                if i > 0 && parts.len() <= i {
                    return None;
                }
                let rest = parts.get(i..).map(|p| p.join("/")).unwrap_or_default();
                params.insert(WILDCARD_PARAM.to_string(), rest);
                return Some(params);
            }

            let part = parts.get(i)?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
                Segment::Constrained { name, regex } => {
                    if part.is_empty() || !regex.is_match(part) {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
                Segment::Wildcard => unreachable!("handled above"),
            }
        }

        if parts.len() == self.segments.len() {
            Some(params)
        } else {
            None
        }
    }

    /// Order patterns from most to least specific.
    ///
    /// Fewer dynamic segments wins, then fewer unconstrained ones, then the first
    /// segment that differs decides (literal < constrained < variable < wildcard).
    pub fn specificity_cmp(&self, other: &Self) -> Ordering {
        self.has_wildcard()
            .cmp(&other.has_wildcard())
            .then_with(|| self.dynamic_count().cmp(&other.dynamic_count()))
            .then_with(|| self.unconstrained_count().cmp(&other.unconstrained_count()))
            .then_with(|| {
                let lhs = self.segments.iter().map(Segment::rank);
                let rhs = other.segments.iter().map(Segment::rank);
                lhs.cmp(rhs)
            })
    }

    fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    fn dynamic_count(&self) -> usize {
        self.segments.iter().filter(|s| s.rank() > 0).count()
    }

    fn unconstrained_count(&self) -> usize {
        self.segments.iter().filter(|s| s.rank() > 1).count()
    }
}

/// Split a path into segments, ignoring the leading slash. `/` has no segments.
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern() {
        let p = Pattern::compile("/unicorns").unwrap();
        assert!(p.matches("/unicorns").is_some());
        assert!(p.matches("/unicorns/1").is_none());
        assert!(p.matches("/Unicorns").is_none());
        assert!(p.matches("/").is_none());
    }

    #[test]
    fn root_pattern() {
        let p = Pattern::compile("/").unwrap();
        assert!(p.segments().is_empty());
        assert!(p.matches("/").is_some());
        assert!(p.matches("/a").is_none());
    }

    #[test]
    fn variable_captures_one_segment() {
        let p = Pattern::compile("/unicorns/{id}").unwrap();
        let params = p.matches("/unicorns/6198f9da97069d03e849096d").unwrap();
        assert_eq!(params["id"], "6198f9da97069d03e849096d");

        assert!(p.matches("/unicorns/123/extra").is_none());
        assert!(p.matches("/unicorns/").is_none());
        assert!(p.matches("/unicorns").is_none());
    }

    #[test]
    fn constrained_variable() {
        let p = Pattern::compile("/resource/{id:[0-9]+}").unwrap();
        assert_eq!(p.matches("/resource/42").unwrap()["id"], "42");
        assert!(p.matches("/resource/abc").is_none());
        // anchored: partial matches do not count
        assert!(p.matches("/resource/42abc").is_none());
    }

    #[test]
    fn regex_with_braces() {
        let p = Pattern::compile("/codes/{code:[A-Z]{3}}").unwrap();
        assert!(p.matches("/codes/ABC").is_some());
        assert!(p.matches("/codes/ABCD").is_none());
    }

    #[test]
    fn wildcard_consumes_remainder() {
        let p = Pattern::compile("/files/*").unwrap();
        assert_eq!(p.matches("/files/a/b/c.txt").unwrap()[WILDCARD_PARAM], "a/b/c.txt");
        assert_eq!(p.matches("/files/").unwrap()[WILDCARD_PARAM], "");
        assert!(p.matches("/files").is_none());
        assert!(p.matches("/other/a").is_none());

        let root = Pattern::compile("/*").unwrap();
        assert_eq!(root.matches("/").unwrap()[WILDCARD_PARAM], "");
        assert_eq!(root.matches("/a/b").unwrap()[WILDCARD_PARAM], "a/b");
    }

    #[test]
    fn multiple_variables() {
        let p = Pattern::compile("/resource/{id}/resourceb/{uid}").unwrap();
        let params = p.matches("/resource/1/resourceb/2").unwrap();
        assert_eq!(params["id"], "1");
        assert_eq!(params["uid"], "2");
    }

    #[test]
    fn compile_errors() {
        assert!(matches!(Pattern::compile(""), Err(PatternError::Empty)));
        assert!(matches!(Pattern::compile("unicorns"), Err(PatternError::NotAbsolute(_))));
        assert!(matches!(Pattern::compile("/a/{id"), Err(PatternError::UnclosedVariable(_))));
        assert!(matches!(Pattern::compile("/a/{}"), Err(PatternError::EmptyVariableName(_))));
        assert!(matches!(Pattern::compile("/a/*/b"), Err(PatternError::WildcardNotLast(_))));
        assert!(matches!(
            Pattern::compile("/api/v{version}/items"),
            Err(PatternError::MisplacedBrace(_))
        ));
        assert!(matches!(Pattern::compile("/a/b}"), Err(PatternError::MisplacedBrace(_))));
        assert!(matches!(
            Pattern::compile("/unicorns/{id}.json"),
            Err(PatternError::UnclosedVariable(_))
        ));
        assert!(matches!(
            Pattern::compile("/a/{id:[0-9}"),
            Err(PatternError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn specificity_ordering() {
        let literal = Pattern::compile("/unicorns/active").unwrap();
        let constrained = Pattern::compile("/unicorns/{id:[a-z]+}").unwrap();
        let variable = Pattern::compile("/unicorns/{id}").unwrap();
        let wildcard = Pattern::compile("/unicorns/*").unwrap();

        assert_eq!(literal.specificity_cmp(&constrained), Ordering::Less);
        assert_eq!(constrained.specificity_cmp(&variable), Ordering::Less);
        assert_eq!(variable.specificity_cmp(&wildcard), Ordering::Less);
        assert_eq!(variable.specificity_cmp(&variable.clone()), Ordering::Equal);

        // the first differing segment breaks ties between equally dynamic patterns
        let early = Pattern::compile("/{kind}/list").unwrap();
        let late = Pattern::compile("/unicorns/{id}").unwrap();
        assert_eq!(late.specificity_cmp(&early), Ordering::Less);
    }
}
