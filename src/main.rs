use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use env_logger::Builder;
use log::LevelFilter;
use misspellings::checker::suggestions::SuggestionResolver;
use misspellings::cli::output;
use misspellings::walk::{self, FileSet};
use misspellings::{script, Config, Dictionary};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;

/// Nothing found
const EXIT_CLEAN: i32 = 0;
/// Configuration or I/O failure
const EXIT_FAILURE: i32 = 1;
/// Misspellings found, output pipe closed, or interrupted
const EXIT_FOUND: i32 = 2;

/// Set once the correction script exists, so an interrupt can say it is partial.
static SCRIPT_STARTED: OnceLock<PathBuf> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "misspellings")]
#[command(version, about = "Find commonly misspelled words in source files", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// File containing a list of files to check, one per line ("-" for stdin)
    #[arg(short = 'f', value_name = "FILE")]
    file_list: Option<PathBuf>,

    /// Plain-text misspelling list ("misspelling->correction" per line)
    #[arg(short = 'm', long, value_name = "FILE")]
    misspelling_file: Option<PathBuf>,

    /// JSON misspelling list
    #[arg(short = 'j', long, value_name = "FILE", conflicts_with = "misspelling_file")]
    json_file: Option<PathBuf>,

    /// Print the misspelling list and exit
    #[arg(short, long)]
    dump: bool,

    /// Write a shell script that applies corrections, prompting when ambiguous
    #[arg(short, long, value_name = "FILE")]
    script_output: Option<PathBuf>,

    /// Also write all findings to this file
    #[arg(long, value_name = "FILE")]
    export_file: Option<PathBuf>,

    /// Skip paths matching this regex (repeatable)
    #[arg(long, value_name = "REGEX")]
    exclude: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    watch_for_interrupt();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) if is_broken_pipe(&e) => process::exit(EXIT_FOUND),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "misspellings", &mut io::stdout());
        return Ok(EXIT_CLEAN);
    }

    let config = Config::load(
        cli.misspelling_file.clone(),
        cli.json_file.clone(),
        cli.exclude.clone(),
    )?;

    let source = config.dictionary_source();
    let dictionary = Dictionary::load(&source)
        .with_context(|| format!("Failed to load misspelling list: {:?}", source))?;
    log::info!("loaded {} misspellings", dictionary.len());

    let stdout = io::stdout();
    let stderr = io::stderr();

    if cli.dump {
        output::dump(&dictionary, &mut stdout.lock())?;
        return Ok(EXIT_CLEAN);
    }

    let mut args = Vec::new();
    if let Some(list) = &cli.file_list {
        args = walk::read_file_list(list)
            .with_context(|| format!("Failed to read file list: {}", list.display()))?;
    }
    args.extend(cli.files.iter().cloned());
    if args.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "no files to check: pass FILES or -f FILE",
            )
            .exit();
    }

    let files = FileSet::new(&config.exclude_patterns, config.include_hidden())?.resolve(&args);

    // Refuse an existing script before anything else is written.
    let script_file = match &cli.script_output {
        Some(script_path) => {
            let file = script::create_script(script_path)?;
            let _ = SCRIPT_STARTED.set(script_path.clone());
            Some((script_path, file))
        }
        None => None,
    };

    if let Some(export_path) = &cli.export_file {
        let file = File::create(export_path)
            .with_context(|| format!("Failed to create export file: {}", export_path.display()))?;
        output::export(&files, &dictionary, &mut BufWriter::new(file))?;
    }

    if let Some((script_path, mut file)) = script_file {
        let colored = !cli.no_color && stdout.is_terminal();
        let mut resolver =
            SuggestionResolver::new(io::stdin().lock(), stdout.lock()).colored(colored);

        // stderr stays unlocked so the interrupt watcher can still print
        let summary = script::write_script(
            &files,
            &dictionary,
            &mut resolver,
            &mut file,
            &mut io::stderr(),
        )?;
        output::print_script_summary(
            &mut stderr.lock(),
            &summary,
            script_path,
            !cli.no_color && stderr.is_terminal(),
        )?;
        return Ok(EXIT_CLEAN);
    }

    let found_any = output::report(&files, &dictionary, &mut stdout.lock(), &mut stderr.lock())?;
    Ok(if found_any { EXIT_FOUND } else { EXIT_CLEAN })
}

/// Exit with `EXIT_FOUND` on Ctrl-C, including while blocked on a prompt.
///
/// A correction script that was already started keeps the blocks written so
/// far; a note on stderr says so.
fn watch_for_interrupt() {
    std::thread::spawn(|| {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::warn!("interrupt handler unavailable: {}", e);
                return;
            }
        };

        if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
            if let Some(script_path) = SCRIPT_STARTED.get() {
                eprintln!(
                    "\nInterrupted: {} holds only the corrections chosen so far",
                    script_path.display()
                );
            }
            process::exit(EXIT_FOUND);
        }
    });
}

fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
