//! Rule tables for the orthography engine.
//!
//! A rule file is line oriented:
//!
//! ```text
//! # comment
//! #!mode pattern
//! = ch'ol
//! t' -> ty'
//! _an -> _añ
//! ```
//!
//! Lines starting with `=` declare an exception (the second whitespace
//! separated token). Every other non-comment line is `<old> -> <new>`, with
//! underscores standing for spaces. Order in the file is application order.
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

const SEPARATOR: &str = " -> ";
const MODE_PRAGMA: &str = "#!mode";

/// Upper bound on exceptions per table; each needs its own placeholder.
pub const MAX_EXCEPTIONS: usize = 0xFFFD;

/// Errors produced while loading a rule table.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// Error reading the rule file
    #[error("Failed to read rule file '{0}'")]
    Io(String, #[source] std::io::Error),

    /// Line is not of the form `<old> -> <new>`
    #[error("Malformed rule on line {line}: {text:?}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// the offending line
        text: String,
    },

    /// Exception line without a token after `=`
    #[error("Empty exception on line {0}")]
    EmptyException(usize),

    /// More exceptions than there are placeholders for
    #[error("More than {} exceptions", MAX_EXCEPTIONS)]
    TooManyExceptions,

    /// Rule with nothing to match
    #[error("Rule on line {0} has an empty left-hand side")]
    EmptyPattern(usize),

    /// `#!mode` pragma naming an unknown mode
    #[error("Unknown rule mode {1:?} on line {0}")]
    UnknownMode(usize, String),

    /// Left-hand side is not a valid regular expression
    #[error("Invalid pattern on line {line}")]
    InvalidPattern {
        /// 1-based line number
        line: usize,
        /// what the regex compiler reported
        #[source]
        source: regex::Error,
    },
}

/// How the left-hand side of every rule in a table is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    /// Plain substring replacement.
    Literal,
    /// Regular expression replacement, for context-sensitive rules.
    Pattern,
}

impl Default for RuleMode {
    fn default() -> Self {
        RuleMode::Literal
    }
}

impl FromStr for RuleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(RuleMode::Literal),
            "pattern" | "regex" => Ok(RuleMode::Pattern),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Pattern(Regex),
}

/// One `old -> new` rewrite.
#[derive(Debug, Clone)]
pub struct Rule {
    source: String,
    target: String,
    matcher: Matcher,
}

impl Rule {
    fn new(source: String, target: String, mode: RuleMode, line: usize) -> Result<Rule, RuleError> {
        if source.is_empty() {
            return Err(RuleError::EmptyPattern(line));
        }

        let (matcher, target) = match mode {
            RuleMode::Literal => (Matcher::Literal(source.clone()), target),
            RuleMode::Pattern => {
                let re = Regex::new(&source)
                    .map_err(|source| RuleError::InvalidPattern { line, source })?;
                (Matcher::Pattern(re), group_refs(&target))
            }
        };

        Ok(Rule {
            source,
            target,
            matcher,
        })
    }

    /// the text being replaced, as written in the rule file
    pub fn source(&self) -> &str {
        &self.source
    }

    /// the replacement
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Rewrites every match of this rule in `text`.
    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Matcher::Literal(s) => text.replace(s.as_str(), &self.target),
            Matcher::Pattern(re) => re.replace_all(text, self.target.as_str()).into_owned(),
        }
    }
}

/// Rewrites a `\1`-style replacement into `regex` syntax. Group numbers
/// may have several digits, `\\` is a literal backslash and `$` is
/// always literal.
fn group_refs(target: &str) -> String {
    let mut out = String::with_capacity(target.len());
    let mut chars = target.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '$' => out.push_str("$$"),
            '\\' if chars.peek().map_or(false, char::is_ascii_digit) => {
                out.push_str("${");
                while let Some(d) = chars.next_if(char::is_ascii_digit) {
                    out.push(d);
                }
                out.push('}');
            }
            '\\' if chars.peek() == Some(&'\\') => {
                out.push('\\');
                chars.next();
            }
            _ => out.push(ch),
        }
    }

    out
}

fn spaces(s: &str) -> String {
    s.trim().replace('_', " ")
}

/// An ordered rule table together with its exception list.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    mode: RuleMode,
    rules: Vec<Rule>,
    exceptions: Vec<String>,
}

impl RuleTable {
    /// Parses a rule file, honouring any `#!mode` pragma in it.
    pub fn parse(text: &str) -> Result<RuleTable, RuleError> {
        Self::parse_impl(text, None)
    }

    /// Parses a rule file with the mode fixed by the caller. Pragmas in
    /// the file are ignored.
    pub fn parse_with_mode(text: &str, mode: RuleMode) -> Result<RuleTable, RuleError> {
        Self::parse_impl(text, Some(mode))
    }

    /// Reads and parses the rule file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P, mode: Option<RuleMode>) -> Result<RuleTable, RuleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Io(path.display().to_string(), e))?;
        let table = Self::parse_impl(&text, mode)?;

        log::debug!(
            "Loaded {} rules and {} exceptions from {} ({:?})",
            table.rules.len(),
            table.exceptions.len(),
            path.display(),
            table.mode
        );

        Ok(table)
    }

    fn parse_impl(text: &str, forced: Option<RuleMode>) -> Result<RuleTable, RuleError> {
        let mut mode = forced.unwrap_or_default();

        // The mode has to be known before the first rule is compiled.
        if forced.is_none() {
            for (i, line) in text.lines().enumerate() {
                if let Some(rest) = line.strip_prefix(MODE_PRAGMA) {
                    mode = rest
                        .trim()
                        .parse()
                        .map_err(|m| RuleError::UnknownMode(i + 1, m))?;
                }
            }
        }

        let mut rules = vec![];
        let mut exceptions = vec![];

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;

            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            if line.starts_with('=') {
                match line.split_whitespace().nth(1) {
                    Some(exc) => exceptions.push(exc.replace('_', " ")),
                    None => return Err(RuleError::EmptyException(line_no)),
                }
                continue;
            }

            let (old, new) = match line.split_once(SEPARATOR) {
                Some((old, new)) if !new.contains(SEPARATOR) => (old, new),
                _ => {
                    return Err(RuleError::Malformed {
                        line: line_no,
                        text: line.to_string(),
                    })
                }
            };

            rules.push(Rule::new(spaces(old), spaces(new), mode, line_no)?);
        }

        if exceptions.len() > MAX_EXCEPTIONS {
            return Err(RuleError::TooManyExceptions);
        }

        Ok(RuleTable {
            mode,
            rules,
            exceptions,
        })
    }

    /// the matching strategy of this table
    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    /// rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// literal strings shielded from the rules
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromStr for RuleTable {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<RuleTable, RuleError> {
        RuleTable::parse(s)
    }
}
