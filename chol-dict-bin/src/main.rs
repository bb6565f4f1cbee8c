use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use gumdrop::Options;
use serde::Serialize;

use chol_dict::collation::realphabetize;
use chol_dict::config::DictionaryConfig;
use chol_dict::converter::{ConvertMode, Document, SourceConverter};
use chol_dict::orthography::Orthography;
use chol_dict::record::Direction;
use chol_dict::rules::RuleMode;

trait OutputWriter {
    fn write_conversion(&mut self, input: &str, output: &str);
    fn finish(&mut self) -> anyhow::Result<()>;
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_conversion(&mut self, input: &str, output: &str) {
        println!("{}\t\t{}", input, output);
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct Conversion {
    input: String,
    output: String,
    changed: bool,
}

#[derive(Default, Serialize)]
struct JsonWriter {
    results: Vec<Conversion>,
}

impl OutputWriter for JsonWriter {
    fn write_conversion(&mut self, input: &str, output: &str) {
        self.results.push(Conversion {
            input: input.to_owned(),
            output: output.to_owned(),
            changed: input != output,
        });
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "convert words or phrases into the new orthography")]
    Word(WordArgs),

    #[options(help = "convert an MDF source file into the new orthography")]
    Convert(ConvertArgs),

    #[options(help = "re-order the records of an MDF source file")]
    Alphabetize(AlphabetizeArgs),

    #[options(help = "typeset both halves of the dictionary as one LaTeX document")]
    Latex(LatexArgs),

    #[options(help = "convert, re-order and typeset both source files")]
    Build(BuildArgs),
}

#[derive(Debug, Options)]
struct WordArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(short = "C", help = "capitalize every result")]
    capitalize: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[options(help = "conversion rule file (overrides the configuration)")]
    rules: Option<PathBuf>,

    #[options(no_short, help = "treat rules as regular expressions")]
    pattern: bool,

    #[options(free, help = "words to be converted")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct ConvertArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "chol-to-spanish or spanish-to-chol", default = "chol-to-spanish")]
    direction: Direction,

    #[options(no_short, help = "emit LaTeX instead of MDF")]
    latex: bool,

    #[options(help = "output file (default: stdout)")]
    output: Option<PathBuf>,

    #[options(help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[options(help = "conversion rule file (overrides the configuration)")]
    rules: Option<PathBuf>,

    #[options(no_short, help = "treat rules as regular expressions")]
    pattern: bool,

    #[options(free, help = "MDF source file")]
    input: Vec<PathBuf>,
}

#[derive(Debug, Options)]
struct AlphabetizeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "source is the Spanish–Ch'ol half")]
    spanish: bool,

    #[options(help = "output file (default: stdout)")]
    output: Option<PathBuf>,

    #[options(free, help = "MDF source file")]
    input: Vec<PathBuf>,
}

#[derive(Debug, Options)]
struct LatexArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, help = "Ch'ol–Spanish source, already converted", required)]
    chol: PathBuf,

    #[options(no_short, help = "Spanish–Ch'ol source, already converted", required)]
    spanish: PathBuf,

    #[options(no_short, help = "LaTeX header file (overrides the configuration)")]
    header: Option<PathBuf>,

    #[options(help = "output file (default: stdout)")]
    output: Option<PathBuf>,

    #[options(help = "JSON configuration file")]
    config: Option<PathBuf>,
}

#[derive(Debug, Options)]
struct BuildArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, help = "original Ch'ol–Spanish source", required)]
    chol: PathBuf,

    #[options(no_short, help = "original Spanish–Ch'ol source", required)]
    spanish: PathBuf,

    #[options(help = "directory for updated sources and the LaTeX document", required)]
    output_dir: PathBuf,

    #[options(no_short, help = "LaTeX header file (overrides the configuration)")]
    header: Option<PathBuf>,

    #[options(help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[options(help = "conversion rule file (overrides the configuration)")]
    rules: Option<PathBuf>,

    #[options(no_short, help = "treat rules as regular expressions")]
    pattern: bool,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DictionaryConfig> {
    match path {
        Some(path) => DictionaryConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(DictionaryConfig::default()),
    }
}

fn load_engine(config: &DictionaryConfig, rules: Option<PathBuf>, pattern: bool) -> anyhow::Result<Orthography> {
    let path = rules.unwrap_or_else(|| config.rules.clone());
    let mode = if pattern { Some(RuleMode::Pattern) } else { config.rule_mode };

    Orthography::from_path(&path, mode)
        .with_context(|| format!("loading conversion rules {}", path.display()))
}

fn open_input(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

fn single_input(mut inputs: Vec<PathBuf>) -> anyhow::Result<PathBuf> {
    match inputs.len() {
        1 => Ok(inputs.remove(0)),
        0 => anyhow::bail!("missing input file"),
        n => anyhow::bail!("expected one input file, got {}", n),
    }
}

fn word(args: WordArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let engine = load_engine(&config, args.rules, args.pattern)?;

    let words: Vec<String> = if args.inputs.is_empty() {
        eprintln!("Reading from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        args.inputs
    };

    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::default())
    } else {
        Box::new(StdoutWriter)
    };

    for word in &words {
        let converted = engine.convert_with(word, args.capitalize);
        writer.write_conversion(word, &converted);
    }

    writer.finish()
}

fn convert_file(
    conv: &SourceConverter,
    input: &Path,
    output: Option<&Path>,
    direction: Direction,
    mode: ConvertMode,
) -> anyhow::Result<()> {
    log::info!("Converting {} ({:?})", input.display(), direction);
    let mut out = create_output(output)?;
    conv.convert_source(open_input(input)?, &mut out, direction, mode)
        .with_context(|| format!("converting {}", input.display()))?;
    out.flush()?;
    Ok(())
}

fn alphabetize_file(input: &Path, output: Option<&Path>, direction: Direction) -> anyhow::Result<()> {
    log::info!("Re-alphabetizing {} ({:?})", input.display(), direction);
    let mut out = create_output(output)?;
    realphabetize(open_input(input)?, &mut out, direction)
        .with_context(|| format!("re-alphabetizing {}", input.display()))?;
    out.flush()?;
    Ok(())
}

fn typeset_files(
    conv: &SourceConverter,
    document: &Document,
    chol: &Path,
    spanish: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    log::info!("Typesetting {} and {}", chol.display(), spanish.display());
    let mut out = create_output(output)?;
    conv.write_document(document, open_input(chol)?, open_input(spanish)?, &mut out)
        .context("typesetting the dictionary")?;
    out.flush()?;
    Ok(())
}

fn load_document(config: &mut DictionaryConfig, header: Option<PathBuf>) -> anyhow::Result<Document> {
    if let Some(header) = header {
        config.latex_header = header;
    }

    Document::from_config(config).context("loading the LaTeX header")
}

fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let engine = load_engine(&config, args.rules, args.pattern)?;
    let conv = SourceConverter::new(&engine);
    let mode = if args.latex {
        ConvertMode::FULL
    } else {
        ConvertMode::ORTHOGRAPHY
    };

    convert_file(&conv, &single_input(args.input)?, args.output.as_deref(), args.direction, mode)
}

fn alphabetize(args: AlphabetizeArgs) -> anyhow::Result<()> {
    let direction = if args.spanish {
        Direction::SpanishToChol
    } else {
        Direction::CholToSpanish
    };

    alphabetize_file(&single_input(args.input)?, args.output.as_deref(), direction)
}

fn latex(args: LatexArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let document = load_document(&mut config, args.header)?;
    // Sources are already converted; the rule table is never consulted.
    let engine = Orthography::new(Default::default());
    let conv = SourceConverter::new(&engine);

    typeset_files(&conv, &document, &args.chol, &args.spanish, args.output.as_deref())
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let engine = load_engine(&config, args.rules, args.pattern)?;
    let document = load_document(&mut config, args.header)?;
    let conv = SourceConverter::new(&engine);
    let dir = args.output_dir;

    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let halves = [
        (args.chol, Direction::CholToSpanish, "chol_to_sp"),
        (args.spanish, Direction::SpanishToChol, "sp_to_chol"),
    ];

    let mut realpha = vec![];
    for (source, direction, stem) in halves.iter() {
        let updated = dir.join(format!("{}.txt", stem));
        convert_file(&conv, source, Some(&updated), *direction, ConvertMode::ORTHOGRAPHY)?;

        let ordered = dir.join(format!("{}_realpha.txt", stem));
        alphabetize_file(&updated, Some(&ordered), *direction)?;
        realpha.push(ordered);
    }

    let target = dir.join("updated-chol-dictionary.tex");
    typeset_files(&conv, &document, &realpha[0], &realpha[1], Some(&target))?;
    eprintln!("Wrote {}", target.display());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => {
            eprintln!("Usage: chol-dict [OPTIONS] COMMAND [ARGS]\n\n{}", Args::usage());
            if let Some(commands) = Args::command_list() {
                eprintln!("\nAvailable commands:\n{}", commands);
            }
            anyhow::bail!("no command given")
        }
        Some(Command::Word(args)) => word(args),
        Some(Command::Convert(args)) => convert(args),
        Some(Command::Alphabetize(args)) => alphabetize(args),
        Some(Command::Latex(args)) => latex(args),
        Some(Command::Build(args)) => build(args),
    }
}
