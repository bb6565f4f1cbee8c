//! Rewrites Ch'ol text from the old orthography into the revised one.
//!
//! Conversion works on a lowercased copy of the input so that every rule
//! only has to be written once. Capitalization of the first letter is put
//! back at the end; mixed case inside a word is not preserved.
//!
//! Exceptions are swapped for single private-use characters while the rules
//! run. In pattern mode such a character is a non-word character: `.` and
//! `\S` match it and `\b` sees a boundary next to it, so pattern rules that
//! may touch an exception should stick to letter classes.
use std::path::Path;

use crate::case::{capitalize, is_first_upper, lower_case};
use crate::rules::{RuleError, RuleMode, RuleTable};

/// First code point of the placeholder range (Supplementary Private Use
/// Area-A). Dictionary text and rule output never contain these.
const PLACEHOLDER_BASE: u32 = 0xF0000;

/// The orthography engine. Immutable once built; share it by reference.
#[derive(Debug, Clone)]
pub struct Orthography {
    table: RuleTable,
    placeholders: Vec<String>,
}

impl Orthography {
    /// Builds an engine around a parsed rule table.
    pub fn new(table: RuleTable) -> Orthography {
        let placeholders = (0..table.exceptions().len())
            .map(|ix| placeholder(ix).to_string())
            .collect();

        Orthography {
            table,
            placeholders,
        }
    }

    /// Loads the rule file at `path`. `mode` overrides any pragma in it.
    pub fn from_path<P: AsRef<Path>>(path: P, mode: Option<RuleMode>) -> Result<Orthography, RuleError> {
        RuleTable::from_path(path, mode).map(Orthography::new)
    }

    /// The rule table this engine applies.
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Converts `text`, capitalizing the result if `text` starts with an
    /// uppercase letter.
    #[inline]
    pub fn convert(&self, text: &str) -> String {
        self.convert_with(text, false)
    }

    /// Converts `text`. The result is capitalized when `capitalize` is set
    /// or when `text` starts with an uppercase letter.
    pub fn convert_with(&self, text: &str, capitalize_result: bool) -> String {
        let capitalize_result = capitalize_result || is_first_upper(text);

        // The leading space lets word-initial rules (`_x -> _y`) match the
        // first word too.
        let mut result = format!(" {}", lower_case(text).replace('_', " "));

        for (exc, ph) in self.table.exceptions().iter().zip(&self.placeholders) {
            result = result.replace(exc.as_str(), ph);
        }

        for rule in self.table.rules() {
            result = rule.apply(&result);
        }

        for (exc, ph) in self.table.exceptions().iter().zip(&self.placeholders) {
            result = result.replace(ph.as_str(), exc);
        }

        let result = result.trim();
        log::trace!("convert: {:?} -> {:?}", text, result);

        if capitalize_result {
            capitalize(result)
        } else {
            result.to_string()
        }
    }
}

// `RuleTable` caps the exception count at `MAX_EXCEPTIONS`, so the code
// point always stays inside the private use plane.
fn placeholder(ix: usize) -> char {
    char::from_u32(PLACEHOLDER_BASE + ix as u32).unwrap_or('\u{FFFD}')
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
# sample of the dataset rules
= chol
= p'ej_ch'a
t' -> ty'
_an -> _añ
an_ -> añ_
an -> añ
ts -> tz
";

    fn engine() -> Orthography {
        Orthography::new(RULES.parse().unwrap())
    }

    #[test]
    fn converts_dataset_example() {
        assert_eq!(engine().convert("t'an"), "ty'añ");
    }

    #[test]
    fn keeps_capitalization_intent() {
        let e = engine();
        assert_eq!(e.convert("T'an"), "Ty'añ");
        assert_eq!(e.convert("T'AN"), "Ty'añ");
        assert_eq!(e.convert_with("t'an", true), "Ty'añ");
        assert_eq!(e.convert_with("T'an", false), "Ty'añ");
    }

    #[test]
    fn empty_input() {
        assert_eq!(engine().convert(""), "");
        assert_eq!(engine().convert_with("", true), "");
    }

    #[test]
    fn underscores_become_spaces() {
        assert_eq!(engine().convert("t'an_ts'ok"), "ty'añ tz'ok");
    }

    #[test]
    fn exceptions_are_untouched() {
        let e = engine();
        for exc in e.table().exceptions() {
            assert_eq!(&e.convert(exc), exc);
        }
        assert_eq!(e.convert("Chol"), "Chol");
        assert_eq!(e.convert("tsan chol"), "tzañ chol");
    }

    #[test]
    fn exception_restored_after_rules() {
        let table: RuleTable = "= tan\nt -> d\nan -> on\n".parse().unwrap();
        let e = Orthography::new(table);
        assert_eq!(e.convert("tan tin"), "tan din");
    }

    #[test]
    fn rules_apply_once_in_order() {
        let table: RuleTable = "a -> b\nb -> c\n".parse().unwrap();
        assert_eq!(Orthography::new(table).convert("ab"), "cc");

        let table: RuleTable = "b -> c\na -> b\n".parse().unwrap();
        assert_eq!(Orthography::new(table).convert("ab"), "bc");
    }

    #[test]
    fn converted_text_is_stable() {
        let e = engine();
        let once = e.convert("t'an");
        assert_eq!(e.convert(&once), once);
    }

    #[test]
    fn many_exceptions_do_not_clash() {
        let mut rules = String::new();
        for i in 0..12 {
            rules.push_str(&format!("= k{}a\n", i));
        }
        rules.push_str("a -> e\n1 -> 7\n");
        let e = Orthography::new(rules.parse().unwrap());
        assert_eq!(e.convert("k1a k11a ba 1"), "k1a k11a be 7");
    }

    #[test]
    fn pattern_rules_see_context() {
        let table = RuleTable::parse_with_mode(
            "([aeiou])j\\b -> \\1h\n^ j -> _x\n",
            RuleMode::Pattern,
        )
        .unwrap();
        let e = Orthography::new(table);
        assert_eq!(e.convert("jajaj"), "xajah");
    }

    #[test]
    fn exceptions_survive_pattern_rules() {
        let table =
            RuleTable::parse_with_mode("= tan\nt([aeiou]) -> d\\1\n\\bk -> q\n", RuleMode::Pattern)
                .unwrap();
        let e = Orthography::new(table);
        assert_eq!(e.convert("tan tin kan"), "tan din qan");
        assert_eq!(e.convert("Tan"), "Tan");
    }

    #[test]
    fn loads_rules_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "#!mode pattern\n= chol\nt' -> ty'\n").unwrap();

        let e = Orthography::from_path(&path, None).unwrap();
        assert_eq!(e.table().mode(), RuleMode::Pattern);
        assert_eq!(e.convert("t'an chol"), "ty'an chol");
    }

    #[test]
    fn malformed_rule_file_builds_no_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "t' -> ty'\nan => añ\n").unwrap();

        match Orthography::from_path(&path, None) {
            Err(RuleError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_rule_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        match Orthography::from_path(&path, Some(RuleMode::Literal)) {
            Err(RuleError::Io(name, _)) => assert_eq!(name, path.display().to_string()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
