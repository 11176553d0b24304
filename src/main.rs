use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};

use wiktionary_tree::fetch::split_lines;
use wiktionary_tree::{
    Config, DirectoryFetcher, DumpFetcher, Fetcher, MemoryFetcher, Pipeline, Section,
    TableTransliterator,
};

#[derive(Parser)]
#[command(name = "wiktionary-tree")]
#[command(about = "Turn a Wiktionary article into a structured JSON entry")]
#[command(group(ArgGroup::new("source").required(true).multiple(true).args(["pages", "dump", "input"])))]
struct Args {
    /// Article title, e.g. "palabra"
    title: String,

    /// Directory of saved pages (<title>.wikitext or <title>.json)
    #[arg(long, conflicts_with = "dump")]
    pages: Option<PathBuf>,

    /// MediaWiki XML dump (.xml or .xml.bz2)
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Wikitext file for the article itself; subpages still come from --pages or --dump
    #[arg(long)]
    input: Option<PathBuf>,

    /// YAML table of IPA transcriptions (language -> word -> ipa)
    #[arg(long)]
    transliterations: Option<PathBuf>,

    /// YAML configuration (taxonomy, max_subpage_depth, splice_policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Quiet mode - no progress spinner
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap(),
    );
    pb
}

fn fetcher(args: &Args, progress: &ProgressBar) -> Box<dyn Fetcher> {
    if let Some(pages) = &args.pages {
        Box::new(DirectoryFetcher::new(pages))
    } else if let Some(dump) = &args.dump {
        Box::new(DumpFetcher::new(dump).with_progress(progress.clone()))
    } else {
        Box::new(MemoryFetcher::new())
    }
}

fn write_entry(entry: &Section, args: &Args) -> Result<()> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    if args.compact {
        serde_json::to_writer(&mut writer, entry)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, entry)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn no_entry_message(title: &str) -> String {
    format!("No entry found for {}", title)
}

/// The entry for `args.title`, or `None` when no source has it.
fn lookup(args: &Args, progress: &ProgressBar) -> Result<Option<Section>> {
    let config = match &args.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };
    debug!("Splice policy: {:?}", config.splice_policy);

    let mut pipeline = Pipeline::new(fetcher(args, progress)).with_config(config);
    if let Some(path) = &args.transliterations {
        pipeline = pipeline.with_transliterator(TableTransliterator::from_yaml_file(path)?);
    }

    let entry = match &args.input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some(pipeline.process_lines(&args.title, &split_lines(&text))?)
        }
        None => pipeline.process(&args.title)?,
    };
    Ok(entry)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let progress = spinner(args.quiet);
    let entry = lookup(&args, &progress)?;
    progress.finish_and_clear();

    let Some(entry) = entry else {
        eprintln!("{}", no_entry_message(&args.title));
        std::process::exit(1);
    };

    write_entry(&entry, &args)?;
    if let Some(path) = &args.output {
        if !args.quiet {
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}
