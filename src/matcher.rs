use crate::error::{GrepperError, Result};
use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// One match criterion: pattern text plus how to interpret it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSpec {
    pub text: String,
    pub is_regex: bool,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl PatternSpec {
    pub fn literal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn regex(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_regex: true,
            ..Default::default()
        }
    }
}

/// A compiled predicate over a line or name. Compilation happens once per
/// run; `is_match` is called per line and does no parsing.
#[derive(Debug)]
pub enum Matcher {
    /// Plain substring scan; the needle is pre-folded when case-insensitive.
    Substring { needle: String, case_sensitive: bool },
    /// Everything else (regex mode, or literal whole-word) compiles down to
    /// a regex.
    Pattern(Regex),
}

impl Matcher {
    pub fn compile(spec: &PatternSpec) -> Result<Matcher> {
        if spec.is_regex {
            let pattern = if spec.whole_word {
                format!(r"\b{}\b", spec.text)
            } else {
                spec.text.clone()
            };
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(!spec.case_sensitive)
                .build()?;
            return Ok(Matcher::Pattern(regex));
        }

        if spec.whole_word {
            let pattern = format!(r"\b{}\b", regex::escape(&spec.text));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(!spec.case_sensitive)
                .build()?;
            return Ok(Matcher::Pattern(regex));
        }

        let needle = if spec.case_sensitive {
            spec.text.clone()
        } else {
            spec.text.to_lowercase()
        };
        Ok(Matcher::Substring {
            needle,
            case_sensitive: spec.case_sensitive,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Substring {
                needle,
                case_sensitive,
            } => {
                if *case_sensitive {
                    text.contains(needle.as_str())
                } else {
                    text.to_lowercase().contains(needle.as_str())
                }
            }
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }
}

/// fnmatch-style options shared by the glob filters and the ignore rules:
/// case-sensitive, `*` crosses separators, leading dots are not special.
pub const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

pub fn compile_globs(globs: &[String]) -> Result<Vec<Pattern>> {
    globs
        .iter()
        .map(|g| {
            Pattern::new(g).map_err(|source| GrepperError::Glob {
                pattern: g.clone(),
                source,
            })
        })
        .collect()
}

pub fn matches_any(name: &str, patterns: &[Pattern]) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_with(name, GLOB_OPTIONS))
}
