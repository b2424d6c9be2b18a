use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use compound_splitter::{
    Evaluation, Language, Lexicon, Splitter, SplitterConfig, VectorStore, evaluate,
};

const DEFAULT_LANG: &str = "de";
const DEFAULT_LEX_DIR: &str = "lex";

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    init_tracing(args.verbose);

    let language: Language = args
        .lang
        .parse()
        .with_context(|| format!("configuring language {:?}", args.lang))?;
    let mut config = SplitterConfig::new(language);
    config.force_split = args.force_split.unwrap_or(config.force_split);
    config.use_stopwords = args.use_stopwords.unwrap_or(config.use_stopwords);
    config.min_freq = args.min_freq.unwrap_or(config.min_freq);
    config.limit = args.limit.or(config.limit);
    if let Some(raw) = &args.ranking {
        config.rankings = SplitterConfig::parse_rankings(raw)?;
    }
    if let Some(raw) = &args.cleaning {
        config.cleanings = SplitterConfig::parse_cleanings(raw)?;
    }
    config.inspect = args.inspect.as_ref().map(|word| word.to_lowercase());
    info!("rankings: {:?}", config.rankings);
    info!("cleanings: {:?}", config.cleanings);

    let lex_dir = args
        .lex_dir
        .clone()
        .or_else(|| env::var("LEX_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEX_DIR));

    let start = Instant::now();
    let lexicon = Lexicon::load(&lex_dir, &config)
        .with_context(|| format!("loading lexicon from {}", lex_dir.display()))?;
    // The store is only consulted (and thus only required) when the
    // configured rankings include semantic similarity.
    let vectors = if config.wants_vectors() {
        let path = lex_dir.join(format!("{}.vectors.json", language.code()));
        Some(VectorStore::load(&path).context("loading vector store")?)
    } else {
        None
    };
    info!("lexicon ready in {} ms", start.elapsed().as_millis());

    let splitter = Splitter::new(config, lexicon, vectors);

    if args.evaluate {
        let Some(gold_path) = args.files.first() else {
            bail!("--evaluate requires a gold file argument");
        };
        let report = evaluate(&splitter, gold_path)?;
        if args.print_wrong {
            for miss in &report.mispredictions {
                println!("{} {} {}", miss.original, miss.gold, miss.predicted);
            }
        }
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_summary(&report);
        }
        return Ok(());
    }

    run_batch(&splitter, &args.files)
}

/// Print the five headline figures as rounded percentages plus the
/// error-type breakdown.
fn print_summary(report: &Evaluation) {
    let pct = |x: f64| ((x + 0.001) * 100.0).round() as i64;
    println!(
        ".{} .{} .{} .{} .{} under={} over={} wrong={}",
        pct(report.precision),
        pct(report.recall),
        pct(report.accuracy),
        pct(report.quasi_f),
        pct(report.coverage),
        report.errors.under,
        report.errors.over,
        report.errors.wrong,
    );
}

/// Split one word per input line, printing `word<TAB>split`. Reads the given
/// files in order, or stdin when none; stops at the first blank line.
fn run_batch(splitter: &Splitter, files: &[PathBuf]) -> anyhow::Result<()> {
    if files.is_empty() {
        let stdin = io::stdin();
        return split_lines(splitter, stdin.lock().lines());
    }
    for path in files {
        let file =
            File::open(path).with_context(|| format!("opening input {}", path.display()))?;
        split_lines(splitter, BufReader::new(file).lines())?;
    }
    Ok(())
}

fn split_lines(
    splitter: &Splitter,
    lines: impl Iterator<Item = io::Result<String>>,
) -> anyhow::Result<()> {
    for line in lines {
        let line = line.context("reading input line")?;
        let word = line.trim();
        if word.is_empty() {
            break;
        }
        println!("{word}\t{}", splitter.split_rendered(word));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Args {
    lang: String,
    lex_dir: Option<PathBuf>,
    min_freq: Option<u64>,
    limit: Option<usize>,
    force_split: Option<bool>,
    use_stopwords: Option<bool>,
    ranking: Option<String>,
    cleaning: Option<String>,
    inspect: Option<String>,
    evaluate: bool,
    print_wrong: bool,
    json: bool,
    verbose: u8,
    files: Vec<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut parsed = Args {
        lang: DEFAULT_LANG.to_string(),
        ..Args::default()
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => parsed.verbose = parsed.verbose.saturating_add(1),
            "-f" | "--force-split" => parsed.force_split = Some(true),
            "--no-force-split" => parsed.force_split = Some(false),
            "--stopwords" => parsed.use_stopwords = Some(true),
            "--no-stopwords" => parsed.use_stopwords = Some(false),
            "--evaluate" => parsed.evaluate = true,
            "-W" | "--print-wrong" => parsed.print_wrong = true,
            "--json" => parsed.json = true,
            "-L" | "--lang" => parsed.lang = expect_value(&arg, args.next())?,
            "-M" | "--min-freq" => {
                parsed.min_freq = Some(expect_value(&arg, args.next())?.parse()?)
            }
            "-l" | "--limit" => parsed.limit = Some(expect_value(&arg, args.next())?.parse()?),
            "--ranking" => parsed.ranking = Some(expect_value(&arg, args.next())?),
            "--cleaning" => parsed.cleaning = Some(expect_value(&arg, args.next())?),
            "--inspect" => parsed.inspect = Some(expect_value(&arg, args.next())?),
            "--lex-dir" => parsed.lex_dir = Some(PathBuf::from(expect_value(&arg, args.next())?)),
            _ => {
                if let Some(value) = arg.strip_prefix("--lang=") {
                    parsed.lang = value.to_string();
                } else if let Some(value) = arg.strip_prefix("--min-freq=") {
                    parsed.min_freq = Some(value.parse()?);
                } else if let Some(value) = arg.strip_prefix("--limit=") {
                    parsed.limit = Some(value.parse()?);
                } else if let Some(value) = arg.strip_prefix("--ranking=") {
                    parsed.ranking = Some(value.to_string());
                } else if let Some(value) = arg.strip_prefix("--cleaning=") {
                    parsed.cleaning = Some(value.to_string());
                } else if let Some(value) = arg.strip_prefix("--inspect=") {
                    parsed.inspect = Some(value.to_string());
                } else if let Some(value) = arg.strip_prefix("--lex-dir=") {
                    parsed.lex_dir = Some(PathBuf::from(value));
                } else if arg.starts_with('-') && arg.len() > 1 {
                    bail!("unknown option: {arg}");
                } else {
                    parsed.files.push(PathBuf::from(arg));
                }
            }
        }
    }
    Ok(parsed)
}

fn expect_value(flag: &str, value: Option<String>) -> anyhow::Result<String> {
    value.with_context(|| format!("{flag} requires a value"))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
