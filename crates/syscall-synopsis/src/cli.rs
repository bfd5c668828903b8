use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use syscall_synopsis::{
    BatchReport, LookupResult, PageDirectory, PageSource, Settings,
    config::{LibraryKind, LibrarySpec, MAX_CONCURRENCY, MIN_CONCURRENCY},
};

#[derive(Parser, Debug)]
#[command(name = "syscall-synopsis", version, about)]
pub struct Args {
    /// Settings file; defaults to the nearest `syscall-synopsis.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Read pre-rendered pages from this directory instead of running `man`.
    #[arg(long, global = true)]
    pub pages_dir: Option<PathBuf>,

    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve call names and print their declarations.
    Lookup {
        #[arg(required = true)]
        names: Vec<String>,

        #[arg(long)]
        json: bool,
    },
    /// Resolve a list of call names concurrently and write the results as JSON.
    Batch {
        /// File with one call name per line; defaults to every page in `--pages-dir`.
        #[arg(long)]
        names: Option<PathBuf>,

        /// Output file, stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Lookups in flight at once.
        #[arg(long, short)]
        jobs: Option<usize>,
    },
    /// Parse a single declaration line.
    Parse {
        declaration: String,

        #[arg(long)]
        json: bool,
    },
    /// Report which environments provide a function for each resolved call name.
    Availability {
        /// JSON written by `batch`.
        #[arg(long)]
        definitions: PathBuf,

        /// Shared object probed with `nm`, as `name=path`.
        #[arg(long = "library", value_parser = parse_named_path)]
        libraries: Vec<(String, PathBuf)>,

        /// Symbol list file (one name per line), as `name=path`.
        #[arg(long = "symbols", value_parser = parse_named_path)]
        symbol_lists: Vec<(String, PathBuf)>,

        /// Environment precedence, first match wins.
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<String>>,

        #[arg(long)]
        json: bool,
    },
}

fn parse_named_path(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        },
        _ => Err(format!("expected `name=path`, got `{value}`")),
    }
}

pub fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to resolve the working directory")?;
            Settings::discover(&cwd)?
        },
    };
    Ok(settings)
}

pub fn page_source(
    args: &Args,
    settings: &Settings,
) -> PageSource {
    match &args.pages_dir {
        Some(dir) => PageSource::Directory(PageDirectory::new(dir, settings.manual.section.clone())),
        None => PageSource::Man(settings.manual.man_command()),
    }
}

pub fn apply_jobs(
    settings: &mut Settings,
    jobs: Option<usize>,
) {
    if let Some(jobs) = jobs {
        settings.lookup.concurrency = jobs.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY);
    }
}

/// Call names from a file, or every page of the page directory.
pub fn batch_call_names(
    names: Option<&Path>,
    args: &Args,
    settings: &Settings,
) -> anyhow::Result<Vec<String>> {
    if let Some(path) = names {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read call names from `{}`", path.display()))?;
        return Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect());
    }

    let Some(dir) = &args.pages_dir else {
        bail!("`batch` needs `--names` or `--pages-dir`");
    };
    Ok(PageDirectory::new(dir, settings.manual.section.clone()).call_names())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionsFile {
    Report(BatchReport),
    Results(Vec<LookupResult>),
}

/// Call names of every result in a file written by `batch`.
pub fn read_definition_names(path: &Path) -> anyhow::Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))?;
    let file: DefinitionsFile =
        serde_json::from_str(&content).with_context(|| format!("`{}` is not a batch result file", path.display()))?;
    let results = match file {
        DefinitionsFile::Report(report) => report.results,
        DefinitionsFile::Results(results) => results,
    };
    Ok(results.into_iter().map(|result| result.call_name).collect())
}

/// Configured libraries followed by those given on the command line.
pub fn library_specs(
    settings: &Settings,
    libraries: &[(String, PathBuf)],
    symbol_lists: &[(String, PathBuf)],
) -> Vec<LibrarySpec> {
    let from_args = libraries
        .iter()
        .map(|lib| (lib, LibraryKind::SharedObject))
        .chain(symbol_lists.iter().map(|lib| (lib, LibraryKind::SymbolList)))
        .map(|((name, path), kind)| LibrarySpec {
            name: name.clone(),
            path: path.display().to_string(),
            kind,
        });

    let mut specs: Vec<LibrarySpec> = settings.availability.libraries.clone();
    for spec in from_args {
        specs.retain(|existing| existing.name != spec.name);
        specs.push(spec);
    }
    specs
}
