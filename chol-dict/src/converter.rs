//! Line-by-line conversion of MDF sources.
use std::io::{BufRead, Write};

use crate::config::{ConfigError, DictionaryConfig};
use crate::error::ConvertError;
use crate::orthography::Orthography;
use crate::record::{Direction, Field, DATESTAMP_CODE};
use crate::typeset::Typesetter;

/// Which transformations a pass applies to each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertMode {
    /// rewrite Ch'ol fields into the new orthography
    pub orthography: bool,
    /// emit LaTeX instead of MDF
    pub latex: bool,
}

impl ConvertMode {
    /// Update the orthography, keep the MDF format.
    pub const ORTHOGRAPHY: ConvertMode = ConvertMode {
        orthography: true,
        latex: false,
    };

    /// Typeset a source that is already in the new orthography.
    pub const TYPESET: ConvertMode = ConvertMode {
        orthography: false,
        latex: true,
    };

    /// Both at once.
    pub const FULL: ConvertMode = ConvertMode {
        orthography: true,
        latex: true,
    };
}

/// Literal text framing the typeset dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// preamble, up to and including `\begin{document}`
    pub header: String,
    /// written after the Spanish half
    pub closing: String,
    /// title between the two halves
    pub spanish_title: String,
}

impl Document {
    /// Reads the header file named in `config`.
    pub fn from_config(config: &DictionaryConfig) -> Result<Document, ConfigError> {
        Ok(Document {
            header: config.read_latex_header()?,
            closing: config.latex_closing.clone(),
            spanish_title: config.spanish_title.clone(),
        })
    }
}

/// Converts source lines with one engine and one typesetter.
pub struct SourceConverter<'a> {
    orthography: &'a Orthography,
    typesetter: Typesetter,
}

impl<'a> SourceConverter<'a> {
    /// Wraps `orthography` with the default typesetter.
    pub fn new(orthography: &'a Orthography) -> SourceConverter<'a> {
        SourceConverter {
            orthography,
            typesetter: Typesetter::new(),
        }
    }

    /// The engine used for Ch'ol fields.
    pub fn orthography(&self) -> &Orthography {
        self.orthography
    }

    /// Converts one source line. `Ok(None)` means the line produces no
    /// output: it was blank, or it is not printed in LaTeX.
    pub fn convert_line(
        &self,
        line: &str,
        direction: Direction,
        mode: ConvertMode,
    ) -> Result<Option<String>, ConvertError> {
        let mut field = match Field::parse(line) {
            Some(field) => field,
            None => return Ok(None),
        };

        if field.code == DATESTAMP_CODE || field.is_empty() {
            return Ok(if mode.latex {
                None
            } else {
                Some(field.code.to_string())
            });
        }

        field.normalize_apostrophes();

        if mode.orthography && direction.is_chol(&field.code) {
            field.content = self.orthography.convert(&field.content);
        }

        if mode.latex {
            self.typesetter.to_latex(&field.code, &field.content)
        } else {
            Ok(Some(field.to_string()))
        }
    }

    /// Streams a whole source file through [`convert_line`]. Blank lines are
    /// copied as they are.
    ///
    /// [`convert_line`]: SourceConverter::convert_line
    pub fn convert_source<R: BufRead, W: Write>(
        &self,
        reader: R,
        out: &mut W,
        direction: Direction,
        mode: ConvertMode,
    ) -> Result<(), ConvertError> {
        let mut written = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                writeln!(out, "{}", line)?;
                continue;
            }

            let converted = self
                .convert_line(&line, direction, mode)
                .map_err(|e| ConvertError::Line {
                    line: i + 1,
                    source: Box::new(e),
                })?;

            if let Some(converted) = converted {
                writeln!(out, "{}", converted)?;
                written += 1;
            }
        }

        log::debug!("{:?} pass over {:?} source wrote {} fields", mode, direction, written);
        Ok(())
    }

    /// Writes the complete LaTeX dictionary: header, Ch'ol–Spanish half,
    /// title of the Spanish half, Spanish–Ch'ol half, closing.
    pub fn write_document<R1, R2, W>(
        &self,
        document: &Document,
        chol_to_spanish: R1,
        spanish_to_chol: R2,
        out: &mut W,
    ) -> Result<(), ConvertError>
    where
        R1: BufRead,
        R2: BufRead,
        W: Write,
    {
        writeln!(out, "{}", document.header)?;
        self.convert_source(chol_to_spanish, out, Direction::CholToSpanish, ConvertMode::TYPESET)?;
        writeln!(out, "{}", self.typesetter.divider(&document.spanish_title)?)?;
        self.convert_source(spanish_to_chol, out, Direction::SpanishToChol, ConvertMode::TYPESET)?;
        write!(out, "{}", document.closing)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTable;

    const RULES: &str = "t' -> ty'\nan -> añ\nts -> tz\n";

    fn engine() -> Orthography {
        Orthography::new(RuleTable::parse(RULES).unwrap())
    }

    fn line(conv: &SourceConverter, text: &str, mode: ConvertMode) -> Option<String> {
        conv.convert_line(text, Direction::CholToSpanish, mode).unwrap()
    }

    #[test]
    fn plain_and_latex_example() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);

        assert_eq!(
            line(&conv, "\\oi t'an\n", ConvertMode::ORTHOGRAPHY).as_deref(),
            Some("\\oi ty'añ")
        );

        let latex = line(&conv, "\\oi t'an\n", ConvertMode::FULL).unwrap();
        assert!(latex.starts_with('\\'));
        assert!(latex.ends_with('}'));
        assert_eq!(latex, "\\cholexample{ty'añ}");
    }

    #[test]
    fn non_chol_fields_are_left_alone() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        assert_eq!(
            line(&conv, "\\ge t'an", ConvertMode::ORTHOGRAPHY).as_deref(),
            Some("\\ge t'an")
        );
        assert_eq!(
            conv.convert_line("\\lx t'an", Direction::SpanishToChol, ConvertMode::ORTHOGRAPHY)
                .unwrap()
                .as_deref(),
            Some("\\lx t'an")
        );
        assert_eq!(
            conv.convert_line("\\tli t'an", Direction::SpanishToChol, ConvertMode::ORTHOGRAPHY)
                .unwrap()
                .as_deref(),
            Some("\\tli ty'añ")
        );
    }

    #[test]
    fn typeset_mode_does_not_convert() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        assert_eq!(
            line(&conv, "\\lx t'an", ConvertMode::TYPESET).as_deref(),
            Some("\\entry{t'an}")
        );
    }

    #[test]
    fn saltillo_is_normalized_everywhere() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        assert_eq!(
            line(&conv, "\\ge aꞌb", ConvertMode::ORTHOGRAPHY).as_deref(),
            Some("\\ge a'b")
        );
        assert_eq!(
            line(&conv, "\\lx tꞌan", ConvertMode::ORTHOGRAPHY).as_deref(),
            Some("\\lx ty'añ")
        );
    }

    #[test]
    fn empty_and_datestamp_fields() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);

        assert_eq!(
            line(&conv, DATESTAMP_CODE, ConvertMode::ORTHOGRAPHY).as_deref(),
            Some(DATESTAMP_CODE)
        );
        assert_eq!(line(&conv, DATESTAMP_CODE, ConvertMode::TYPESET), None);

        assert_eq!(line(&conv, "\\nt   ", ConvertMode::ORTHOGRAPHY).as_deref(), Some("\\nt"));
        assert_eq!(line(&conv, "\\cu", ConvertMode::TYPESET), None);
        assert_eq!(line(&conv, "   ", ConvertMode::ORTHOGRAPHY), None);
    }

    #[test]
    fn uppercase_headword_only_dropped_in_latex() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        assert_eq!(line(&conv, "\\lx TY'", ConvertMode::ORTHOGRAPHY).as_deref(), Some("\\lx Ty'"));
        assert_eq!(line(&conv, "\\lx TY'", ConvertMode::TYPESET), None);
        assert_eq!(line(&conv, "\\lx A", ConvertMode::ORTHOGRAPHY).as_deref(), Some("\\lx A"));
        assert_eq!(line(&conv, "\\lx A", ConvertMode::FULL), None);
    }

    #[test]
    fn unknown_tag_aborts_with_line_number() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        let mut out = vec![];
        let err = conv
            .convert_source(
                "\\lx a\n\n\\qq b\n".as_bytes(),
                &mut out,
                Direction::CholToSpanish,
                ConvertMode::TYPESET,
            )
            .unwrap_err();

        match err {
            ConvertError::Line { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(*source, ConvertError::UnknownTag(ref t) if t == "qq"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn source_keeps_blank_lines() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        let mut out = vec![];
        conv.convert_source(
            "\\_sh v3.0\n\\_DateStampHasFourDigitYear\n\n\\lx t'an\n\\ge word\n\n".as_bytes(),
            &mut out,
            Direction::CholToSpanish,
            ConvertMode::ORTHOGRAPHY,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\\_sh v3.0\n\\_DateStampHasFourDigitYear\n\n\\lx ty'añ\n\\ge word\n\n"
        );
    }

    #[test]
    fn document_layout() {
        let engine = engine();
        let conv = SourceConverter::new(&engine);
        let doc = Document {
            header: "\\begin{document}".to_string(),
            closing: "\\end{document}".to_string(),
            spanish_title: "ESPAÑOL – CH'OL".to_string(),
        };
        let mut out = vec![];
        conv.write_document(
            &doc,
            "\\_sh v3.0\n\n\\lx A\n\\alf A\n\n\\lx ajaw\n\\tl señor\n".as_bytes(),
            "\\lxi señor\n\\tli ajaw\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\\begin{document}\n\
             \n\
             \\alphaletter{A}\n\
             \n\
             \\entry{ajaw}\n\
             \\spanishtranslation{señor}\n\
             \\maintitle{ESPAÑOL – CH'OL}\n\
             \n\
             \\entry{señor}\n\
             \\spanishtranslation{ajaw}\n\
             \\end{document}"
        );
    }
}
