//! LaTeX emission for dictionary fields.
//!
//! Every printable field becomes a single command invocation,
//! `\command{content}`. The commands themselves are defined in the document
//! header.
use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::case::is_all_caps;
use crate::error::ConvertError;

/// Bookkeeping fields that never reach the printed dictionary.
pub const SKIP_CODES: &[&str] = &[
    "\\_sh",
    "\\_DateStampHasFourDigitYear",
    "\\dt",
    "\\dib",
    "\\pie",
    "\\nt",
];

/// Headwords of the section marker entries for multi-letter graphemes.
/// Single letters are caught by being all caps.
pub const LETTER_HEADWORDS: &[&str] = &["Ch", "Ch'", "Ty", "Ty'", "Ts", "Ts'"];

/// Suffix marking the Spanish-to-Ch'ol variant of a field code.
pub const REVERSE_SUFFIX: char = 'i';

const HEADWORD_TAG: &str = "lx";

static COMMANDS: &[(&str, &str)] = &[
    ("lx", "entry"),
    ("mt", "maintitle"),
    ("alf", "alphaletter"),
    ("ac", "onedefinition"),
    ("hm", "defsuperscript"),
    ("dd", "nontranslationdef"),
    ("cg", "partofspeech"),
    ("tl", "spanishtranslation"),
    ("ca", "clarification"),
    ("o", "cholexample"),
    ("to", "exampletranslation"),
    ("vdn", "dialectvariant"),
    ("vdl", "dialectword"),
    ("re", "alsosee"),
    ("nd", "relevantdialect"),
    ("cu", "culturalinformation"),
    ("su", "secondaryentry"),
    ("cs", "secondpartofspeech"),
    ("ts", "secondtranslation"),
    ("vp", "variation"),
    ("fgn", "conjugationtense"),
    ("fbl", "conjugationverb"),
    ("fgl", "otherconjugation"),
];

static SUPERSCRIPTS: &[(char, &str)] = &[
    ('¹', "\\textsuperscript{1}"),
    ('²', "\\textsuperscript{2}"),
    ('³', "\\textsuperscript{3}"),
];

/// Strips the escape and the reverse-direction suffix: `\lxi` and `\lx`
/// both become `lx`.
pub fn bare_tag(code: &str) -> &str {
    let tag = code.trim_start_matches('\\');
    tag.strip_suffix(REVERSE_SUFFIX).unwrap_or(tag)
}

/// Section markers are structural and are not typeset as entries.
pub fn is_letter_marker(content: &str) -> bool {
    is_all_caps(content) || LETTER_HEADWORDS.contains(&content)
}

fn latex_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());

    for ch in content.chars() {
        match SUPERSCRIPTS.iter().find(|(s, _)| *s == ch) {
            Some((_, cmd)) => out.push_str(cmd),
            None if ch == '_' => out.push(' '),
            None => out.push(ch),
        }
    }

    out
}

/// Maps field tags to LaTeX commands.
#[derive(Debug, Clone)]
pub struct Typesetter {
    commands: HashMap<SmolStr, SmolStr>,
}

impl Default for Typesetter {
    fn default() -> Self {
        Typesetter {
            commands: COMMANDS
                .iter()
                .map(|(tag, cmd)| (SmolStr::new(tag), SmolStr::new(cmd)))
                .collect(),
        }
    }
}

impl Typesetter {
    /// Typesetter with the built-in command table.
    pub fn new() -> Typesetter {
        Self::default()
    }

    /// True for bookkeeping codes that are never printed.
    #[inline(always)]
    pub fn is_skipped(&self, code: &str) -> bool {
        SKIP_CODES.contains(&code)
    }

    /// Command name for a bare tag.
    pub fn command(&self, tag: &str) -> Result<&str, ConvertError> {
        self.commands
            .get(tag)
            .map(SmolStr::as_str)
            .ok_or_else(|| ConvertError::UnknownTag(tag.into()))
    }

    /// Renders one field, or `None` if the field is not printed.
    pub fn to_latex(&self, code: &str, content: &str) -> Result<Option<String>, ConvertError> {
        if self.is_skipped(code) {
            return Ok(None);
        }

        let tag = bare_tag(code);

        if tag == HEADWORD_TAG && is_letter_marker(content) {
            log::trace!("skipping section marker {} {}", code, content);
            return Ok(None);
        }

        let command = self.command(tag)?;
        Ok(Some(format!("\\{}{{{}}}", command, latex_content(content))))
    }

    /// Title line separating the two halves of the dictionary.
    pub fn divider(&self, title: &str) -> Result<String, ConvertError> {
        Ok(format!("\\{}{{{}}}\n", self.command("mt")?, title))
    }
}
