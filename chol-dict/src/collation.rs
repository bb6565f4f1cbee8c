//! Re-alphabetization of dictionary records.
//!
//! Records are grouped under the section letter current when they end. A
//! section letter comes from an `\alf` marker, or, in the Spanish half, from
//! the first letter of each `\lxi` headword. Ch'ol sections are then sorted
//! by headword; Spanish sections keep file order but get fresh letter
//! headers.
use std::io::{BufRead, Write};

use hashbrown::HashMap;
use itertools::Itertools;
use smol_str::SmolStr;
use unic_segment::Graphemes;

use crate::case::{lower_case, upper_case};
use crate::error::ConvertError;
use crate::record::{read_records, Direction, Record};

/// Collation order of the Ch'ol alphabet. Digraphs and glottalized
/// consonants are letters of their own.
pub const CHOL_ALPHABET: &[&str] = &[
    "a", "ä", "b", "ch", "ch'", "d", "e", "g", "i", "j", "k", "k'", "l", "m", "n", "ñ", "o", "p",
    "p'", "q", "q'", "r", "s", "t", "ts", "ts'", "ty", "ty'", "u", "w", "x", "x'", "y",
];

/// Collation order of the Spanish half.
pub const SPANISH_ALPHABET: &[&str] = &[
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
];

const ALPHABET_MARKER: &str = "\\alf";

static VOWEL_FOLDS: &[(char, char)] = &[
    ('á', 'a'),
    ('é', 'e'),
    ('í', 'i'),
    ('ó', 'o'),
    ('ú', 'u'),
    ('ü', 'u'),
];

/// Collation alphabet for a direction.
pub fn alphabet(direction: Direction) -> &'static [&'static str] {
    match direction {
        Direction::CholToSpanish => CHOL_ALPHABET,
        Direction::SpanishToChol => SPANISH_ALPHABET,
    }
}

/// Key used to order Ch'ol records inside a section: the headword,
/// lowercased, without `*`, `-` or `'`, and with `ä` read as `a`.
pub fn sort_key(record: &Record) -> String {
    let base = lower_case(record.headword().unwrap_or(""));
    base.chars()
        .filter(|c| !matches!(c, '*' | '-' | '\''))
        .map(|c| if c == 'ä' { 'a' } else { c })
        .collect()
}

/// Lowercased first letter of a Spanish headword with accents removed.
fn spanish_initial(headword: &str) -> Option<String> {
    // A whole grapheme, so decomposed accents come along with their base
    // letter and are dropped with it.
    let first = Graphemes::new(headword).next()?;
    let base = lower_case(first).chars().next()?;
    let base = VOWEL_FOLDS
        .iter()
        .find(|(accented, _)| *accented == base)
        .map(|(_, plain)| *plain)
        .unwrap_or(base);

    Some(base.to_string())
}

/// One section of the re-ordered dictionary.
#[derive(Debug, Clone)]
pub struct Bucket {
    /// `None` for material before the first section letter.
    pub letter: Option<SmolStr>,
    /// records in output order
    pub records: Vec<Record>,
}

impl Bucket {
    /// Synthetic header lines written before the section, if any.
    pub fn marker_lines(&self, direction: Direction) -> Option<[String; 2]> {
        match (direction, &self.letter) {
            (Direction::SpanishToChol, Some(letter)) if !self.records.is_empty() => {
                let upper = upper_case(letter);
                Some([
                    format!("{} {}", direction.headword_code(), upper),
                    format!("{} {}", ALPHABET_MARKER, upper),
                ])
            }
            _ => None,
        }
    }
}

/// Records grouped into sections, in collation order with the header first.
#[derive(Debug, Clone)]
pub struct Alphabetized {
    /// half of the dictionary the records come from
    pub direction: Direction,
    /// header bucket first, then one bucket per letter
    pub buckets: Vec<Bucket>,
}

impl Alphabetized {
    /// Writes the sections as an MDF file.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for bucket in self.buckets.iter().filter(|b| !b.records.is_empty()) {
            if let Some(markers) = bucket.marker_lines(self.direction) {
                write!(out, "{}\n\n", markers.iter().join("\n"))?;
            }

            for record in &bucket.records {
                write!(out, "{}\n\n", record.lines().iter().join("\n"))?;
            }
        }

        Ok(())
    }

    /// All records in output order, without synthetic markers.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.buckets.iter().flat_map(|b| b.records.iter())
    }
}

/// Groups `records` into sections and orders them.
pub fn alphabetize(records: Vec<Record>, direction: Direction) -> Result<Alphabetized, ConvertError> {
    let letters = alphabet(direction);
    let index: HashMap<&str, usize> = letters.iter().enumerate().map(|(i, l)| (*l, i + 1)).collect();

    let mut buckets: Vec<Bucket> = std::iter::once(None)
        .chain(letters.iter().map(|l| Some(SmolStr::new(l))))
        .map(|letter| Bucket {
            letter,
            records: vec![],
        })
        .collect();

    let mut current = 0;

    for record in records {
        for line in record.lines() {
            let letter = if direction == Direction::SpanishToChol
                && line.starts_with(direction.headword_code())
            {
                line.split_whitespace().nth(1).and_then(spanish_initial)
            } else if line.starts_with(ALPHABET_MARKER) {
                // An empty marker leaves the current section unchanged.
                line.split_whitespace().skip(1).last().map(lower_case)
            } else {
                None
            };

            if let Some(letter) = letter {
                current = *index.get(letter.as_str()).ok_or_else(|| ConvertError::UnknownLetter {
                    letter: letter.clone(),
                    line: record.line,
                })?;
            }
        }

        buckets[current].records.push(record);
    }

    if direction == Direction::CholToSpanish {
        for bucket in buckets.iter_mut().skip(1) {
            bucket.records.sort_by_cached_key(sort_key);
        }
    }

    log::debug!(
        "Alphabetized {} records into {} sections",
        buckets.iter().map(|b| b.records.len()).sum::<usize>(),
        buckets.iter().filter(|b| !b.records.is_empty()).count()
    );

    Ok(Alphabetized { direction, buckets })
}

/// Reads an MDF file, re-orders it and writes the result.
pub fn realphabetize<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    direction: Direction,
) -> Result<(), ConvertError> {
    let records = read_records(reader)?;
    alphabetize(records, direction)?.write_to(out)?;
    Ok(())
}
