//! Expected conversions used to check a rule table.
//!
//! The case file holds pairs of non-blank lines, old spelling first and the
//! expected new spelling second. Pairs are usually separated by a blank
//! line; lines starting with `#` are comments.
//!
//! ```text
//! # t' is always palatalized
//! t'an
//! ty'añ
//!
//! Ch'ol
//! Ch'ol
//! ```
use serde::{Deserialize, Serialize};

use crate::orthography::Orthography;

/// One expected conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionCase {
    /// text in the old orthography
    pub input: String,
    /// what the engine should produce
    pub expected: String,
}

/// Result of running one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome<'a> {
    /// the case that was run
    pub case: &'a ConversionCase,
    /// what the engine produced
    pub actual: String,
}

impl CaseOutcome<'_> {
    /// True when the engine produced the expected text.
    pub fn passed(&self) -> bool {
        self.actual == self.case.expected
    }
}

/// Parses a case file. A dangling odd line at the end is ignored.
pub fn parse_cases(text: &str) -> Vec<ConversionCase> {
    let mut cases = vec![];
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        if line.starts_with('#') {
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match pending.take() {
            None => pending = Some(line),
            Some(input) => cases.push(ConversionCase {
                input: input.to_string(),
                expected: line.to_string(),
            }),
        }
    }

    if let Some(line) = pending {
        log::warn!("ignoring unpaired case line {:?}", line);
    }

    cases
}

/// Converts every case input and pairs it with its result.
pub fn run_cases<'a>(engine: &Orthography, cases: &'a [ConversionCase]) -> Vec<CaseOutcome<'a>> {
    cases
        .iter()
        .map(|case| CaseOutcome {
            case,
            actual: engine.convert(&case.input),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTable;

    #[test]
    fn pairs_lines() {
        let cases = parse_cases("# comment\nt'an\nty'añ\n\n\n  Ch'ol \nCh'ol\n\nlast\n");
        assert_eq!(
            cases,
            vec![
                ConversionCase {
                    input: "t'an".into(),
                    expected: "ty'añ".into()
                },
                ConversionCase {
                    input: "Ch'ol".into(),
                    expected: "Ch'ol".into()
                },
            ]
        );
    }

    #[test]
    fn runs_against_engine() {
        let engine = Orthography::new(RuleTable::parse("t' -> ty'\nan -> añ\n").unwrap());
        let cases = parse_cases("t'an\nty'añ\n\nt'ok\nt'ok\n");
        let outcomes = run_cases(&engine, &cases);
        assert!(outcomes[0].passed());
        assert!(!outcomes[1].passed());
        assert_eq!(outcomes[1].actual, "ty'ok");
    }
}
