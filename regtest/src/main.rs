/*! Regression testing for orthography rule tables

Runs a list of expected conversions through a rule table and reports every
word whose result differs. Given an older rule table as well, it marks the
words the older table got right as regressions. Can be used in automated
scripts to cap the amount of breakage a rule change may introduce.

# Usage examples

It's a command-line tool:
```console
$ cargo run -- --rules conversion_rules.txt --cases cases.tsv --threshold 0.05
```
will expect fewer than 5 % of the cases to come out wrong.

Case files are either tab-separated (`.tsv`, old spelling then expected new
spelling) or the plain two-lines-per-case format read by
`chol_dict::cases::parse_cases`.
*/

use std::error::Error;
use std::path::{Path, PathBuf};

use chol_dict::cases::{parse_cases, run_cases, ConversionCase};
use chol_dict::orthography::Orthography;
use chol_dict::rules::RuleMode;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "RULEFILE")]
    rules: PathBuf,
    #[arg(short, long, value_name = "OLDRULEFILE")]
    old: Option<PathBuf>,
    #[arg(short, long, value_name = "CASEFILE")]
    cases: PathBuf,
    #[arg(short, long, value_name = "THOLD")]
    threshold: f32,
    #[arg(short, long)]
    pattern: bool,
}

fn load_cases(path: &Path) -> Result<Vec<ConversionCase>, Box<dyn Error>> {
    if path.extension().and_then(|x| x.to_str()) != Some("tsv") {
        return Ok(parse_cases(&std::fs::read_to_string(path)?));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            r.get(0).and_then(|x| {
                r.get(1).map(|y| ConversionCase {
                    input: x.trim().to_string(),
                    expected: y.trim().to_string(),
                })
            })
        })
        .collect())
}

fn main() -> Result<(), Box<dyn Error>> {
    chol_dict::enable_logging();

    let cli = Cli::parse();
    let mode = if cli.pattern { Some(RuleMode::Pattern) } else { None };
    let engine = Orthography::from_path(&cli.rules, mode)?;
    let old_engine = match &cli.old {
        Some(path) => Some(Orthography::from_path(path, mode)?),
        None => None,
    };
    let cases = load_cases(&cli.cases)?;

    if cases.is_empty() {
        Err(format!("Could not find any cases from {}", cli.cases.display()))?
    }

    let mut mismatches = 0;
    for outcome in run_cases(&engine, &cases) {
        if outcome.passed() {
            print!(".");
            continue;
        }

        let case = outcome.case;
        let was_right = old_engine
            .as_ref()
            .map(|old| old.convert(&case.input) == case.expected)
            .unwrap_or(false);
        if was_right {
            println!(
                "REGRESSION: {} -> {} was right, now {}",
                case.input, case.expected, outcome.actual
            );
        } else {
            println!("Mismatch: {} -> {} got {}", case.input, case.expected, outcome.actual);
        }
        mismatches += 1;
    }
    println!();

    let rate = mismatches as f32 / cases.len() as f32;
    if cli.threshold > rate {
        Ok(())
    } else {
        Err(format!("mismatches more than threshold {} >= {}", rate, cli.threshold))?
    }
}
