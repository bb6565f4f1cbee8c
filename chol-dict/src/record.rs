//! MDF records: blank-line separated groups of `\code content` lines.
use std::io::BufRead;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Datestamp flag written by the dictionary software. Has no content.
pub const DATESTAMP_CODE: &str = "\\_DateStampHasFourDigitYear";

/// Modifier letter used for the glottal stop in older files.
pub const SALTILLO: char = '\u{A78C}';

/// Which half of the bilingual dictionary a source file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Ch'ol headwords with Spanish glosses.
    CholToSpanish,
    /// Spanish headwords with Ch'ol translations. Codes carry a trailing `i`.
    SpanishToChol,
}

impl Direction {
    /// Codes whose content is written in Ch'ol for this direction.
    pub fn chol_codes(self) -> &'static [&'static str] {
        match self {
            Direction::CholToSpanish => &[
                "\\lx", "\\oi", "\\re", "\\su", "\\vdl", "\\vp", "\\fbl", "\\alf",
            ],
            Direction::SpanishToChol => &["\\tli", "\\tsi", "\\oi"],
        }
    }

    /// True when fields with `code` hold Ch'ol text.
    pub fn is_chol(self, code: &str) -> bool {
        self.chol_codes().contains(&code)
    }

    /// Code of the headword field.
    pub fn headword_code(self) -> &'static str {
        match self {
            Direction::CholToSpanish => "\\lx",
            Direction::SpanishToChol => "\\lxi",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chol-to-spanish" | "ch-sp" | "chol" => Ok(Direction::CholToSpanish),
            "spanish-to-chol" | "sp-ch" | "spanish" => Ok(Direction::SpanishToChol),
            other => Err(format!("unknown direction {:?}", other)),
        }
    }
}

/// One tagged line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// field marker including the backslash, e.g. `\lx`
    pub code: SmolStr,
    /// the rest of the line
    pub content: String,
}

impl Field {
    /// Splits a raw line into its code and whitespace-joined content.
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Field> {
        let mut tokens = line.split_whitespace();
        let code = tokens.next()?;

        Some(Field {
            code: code.into(),
            content: tokens.join(" "),
        })
    }

    /// True when the field has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replaces the saltillo with a plain apostrophe.
    pub fn normalize_apostrophes(&mut self) {
        if self.content.contains(SALTILLO) {
            self.content = self.content.replace(SALTILLO, "'");
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.content.is_empty() {
            f.write_str(&self.code)
        } else {
            write!(f, "{} {}", self.code, self.content)
        }
    }
}

/// One dictionary entry, kept as its trimmed source lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    lines: Vec<String>,
    /// 1-based line number of the first line in the source file.
    pub line: usize,
}

impl Record {
    /// Builds a record from its lines and the line it starts on.
    pub fn new(lines: Vec<String>, line: usize) -> Record {
        Record { lines, line }
    }

    /// The trimmed source lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The lines parsed as fields.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.lines.iter().filter_map(|l| Field::parse(l))
    }

    /// True when the record has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The second token of the first line, which is the headword for
    /// ordinary entries.
    pub fn headword(&self) -> Option<&str> {
        self.lines.first()?.split_whitespace().nth(1)
    }
}

/// Splits `reader` into records. Consecutive blank lines never produce an
/// empty record, and a trailing record without a final blank line is kept.
pub fn read_records<R: BufRead>(reader: R) -> std::io::Result<Vec<Record>> {
    let mut records = vec![];
    let mut current = Record::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }

        if current.is_empty() {
            current.line = i + 1;
        }
        current.lines.push(line.to_string());
    }

    if !current.is_empty() {
        records.push(current);
    }

    Ok(records)
}
