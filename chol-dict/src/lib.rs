/*! Orthography conversion and typesetting for the Ch'ol–Spanish dictionary.

The dictionary sources are MDF files: records separated by blank lines,
one `\code content` field per line. This library

- rewrites Ch'ol text from the old orthography into the revised one using an
  ordered, exception-aware rule table ([`orthography`], [`rules`]),
- re-orders records under the Ch'ol or Spanish alphabet ([`collation`]),
- turns records into LaTeX commands for print ([`typeset`], [`converter`]).

# Usage examples

```no_run
use chol_dict::converter::{ConvertMode, SourceConverter};
use chol_dict::orthography::Orthography;
use chol_dict::record::Direction;

let engine = Orthography::from_path("conversion_rules.txt", None)?;
assert_eq!(engine.convert("t'an"), "ty'añ");

let conv = SourceConverter::new(&engine);
let line = conv.convert_line("\\oi t'an", Direction::CholToSpanish, ConvertMode::ORTHOGRAPHY)?;
assert_eq!(line.as_deref(), Some("\\oi ty'añ"));
# Ok::<(), Box<dyn std::error::Error>>(())
```

The `chol-dict` binary in the same repository wires these together into
the full build of the printed dictionary.
*/

#![warn(missing_docs)]
pub mod cases;
pub mod collation;
pub mod config;
pub mod converter;
pub mod error;
pub mod orthography;
pub mod record;
pub mod rules;
pub mod typeset;

pub(crate) mod case;

pub use crate::error::ConvertError;

/// Initialises `env_logger` for library users without a logger of their own.
#[cfg(feature = "logging")]
pub fn enable_logging() {
    let _ = env_logger::try_init();
}
