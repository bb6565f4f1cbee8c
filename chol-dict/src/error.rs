//! Errors raised while converting, typesetting or re-ordering a source file.
use smol_str::SmolStr;

use crate::rules::RuleError;

/// Errors that can occur while processing dictionary sources.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// I/O error while reading a source or writing output
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Error loading the rule table
    #[error("Failed to load conversion rules")]
    Rules(#[from] RuleError),

    /// Field tag with no typesetting command; the source vocabulary and the
    /// command table disagree
    #[error("No typesetting command for tag '{0}'")]
    UnknownTag(SmolStr),

    /// Error on a specific line of a source file
    #[error("Line {line}")]
    Line {
        /// 1-based line number
        line: usize,
        /// what went wrong on that line
        #[source]
        source: Box<ConvertError>,
    },

    /// Section letter that is not part of the collation alphabet
    #[error("Unknown alphabet letter {letter:?} in record starting on line {line}")]
    UnknownLetter {
        /// the letter as read, lowercased
        letter: String,
        /// first line of the record
        line: usize,
    },
}
