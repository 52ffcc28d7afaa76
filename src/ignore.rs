//! Small `.gitignore` subset used to filter traversal.
//!
//! Supported dialect:
//! - blank lines and `#` comments are skipped
//! - a leading `!` negates the rule
//! - patterns containing `/` match the root-relative posix path
//! - patterns without `/` match the final path component
//! - patterns ending with `/` apply to directories only
//!
//! Rules are evaluated in file order and the last matching rule wins.

use crate::matcher::GLOB_OPTIONS;
use glob::Pattern;
use std::fmt;
use std::fs;
use std::path::Path;

/// One parsed ignore line. Directory-only patterns are expanded to
/// `pat/**` at parse time so they also cover everything beneath the
/// directory; the expansion is one-way, but [`fmt::Display`] restores the
/// `pat/` source form for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoreRule {
    pattern: Pattern,
    negated: bool,
    dir_only: bool,
}

impl IgnoreRule {
    /// Parses a single line. Returns `None` for blanks, comments, bare `!`
    /// and patterns `glob` cannot compile (malformed character classes).
    fn from_line(line: &str) -> Option<IgnoreRule> {
        let mut line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let negated = line.starts_with('!');
        if negated {
            line = line[1..].trim();
            if line.is_empty() {
                return None;
            }
        }
        let dir_only = line.ends_with('/');
        let mut text = line.trim_end_matches('/').to_string();
        if dir_only {
            text.push_str("/**");
        }
        let pattern = Pattern::new(&text).ok()?;
        Some(IgnoreRule {
            pattern,
            negated,
            dir_only,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn dir_only(&self) -> bool {
        self.dir_only
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.pattern.as_str();
        let text = if self.dir_only {
            text.strip_suffix("/**").unwrap_or(text)
        } else {
            text
        };
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(text)?;
        if self.dir_only {
            f.write_str("/")?;
        }
        Ok(())
    }
}

pub fn parse_rules(contents: &str) -> Vec<IgnoreRule> {
    contents.lines().filter_map(IgnoreRule::from_line).collect()
}

/// Reads `root/.gitignore`. A missing or unreadable file means no rules.
pub fn load_rules(root: &Path) -> Vec<IgnoreRule> {
    match fs::read(root.join(".gitignore")) {
        Ok(bytes) => parse_rules(&String::from_utf8_lossy(&bytes)),
        Err(_) => Vec::new(),
    }
}

/// Evaluates a root-relative posix path against the rules. Returns true
/// when the path is ignored; paths no rule matches are never ignored.
pub fn is_ignored(rel_posix: &str, is_dir: bool, rules: &[IgnoreRule]) -> bool {
    if rules.is_empty() {
        return false;
    }
    let name = match rel_posix.rfind('/') {
        Some(i) => &rel_posix[i + 1..],
        None => rel_posix,
    };
    let mut ignored = false;
    for rule in rules {
        if rule.dir_only && !is_dir {
            continue;
        }
        let target = if rule.pattern.as_str().contains('/') {
            rel_posix
        } else {
            name
        };
        if rule.pattern.matches_with(target, GLOB_OPTIONS) {
            ignored = !rule.negated;
        }
    }
    ignored
}

/// Joins the components of `path` relative to `base` with `/`, regardless
/// of platform separator. `None` when `path` is not under `base`.
pub fn rel_posix(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
