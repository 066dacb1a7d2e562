//! # Tunelist
//!
//! Searches a list of dance tunes and builds sets whose keys flow from one
//! tune to the next.
//!
//! ## Usage
//!
//! ```bash
//! # Every reel in D major
//! tunelist search reel in d
//!
//! # Jigs in E minor easier than three stars, by title
//! tunelist search jig in em '*l3' --title kesh
//!
//! # A set of four starting with Drowsy Maggie
//! tunelist set -t drowsy maggie -n 4 -p 1
//!
//! # Read the list straight from a spreadsheet export
//! TUNELIST_SOURCE='https://docs.google.com/spreadsheets/d/<id>/export?format=csv' tunelist search reel
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` usage error, `2` nothing to build from, `3` the list,
//! weights or config could not be loaded.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tunelist::cli::{self, Args};
use tunelist::config::Settings;
use tunelist::error::{TuneError, EXIT_LOAD, EXIT_OK, EXIT_USAGE};
use tunelist::sequence::SetOptions;
use tunelist::tune::TuneRecord;
use tunelist::{completion, query, TuneList};

/// Logging is controlled through `RUST_LOG`:
/// - `RUST_LOG=debug tunelist set -t kesh` shows every key drawn
/// - `RUST_LOG=tunelist::loader=trace tunelist search reel`
fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_OK };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            report_error(&e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run(args: Args) -> Result<()> {
    if let cli::Command::Completion { shell } = &args.command {
        let mut cmd = Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        return Ok(());
    }

    let mut settings = Settings::load(args.config.as_deref()).context("Could not load settings")?;
    if let Some(source) = args.source {
        settings.source = source;
    }

    match args.command {
        cli::Command::Search { query, title, json } => {
            let title = title.map(|text| query::parse_title(&text).unwrap_or(text));
            info!("Searching {} for {query:?}", settings.source);

            let list = TuneList::from_settings(&settings)?;
            let found = list.search(&query, title.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                print_tunes(&found);
            }
        }
        cli::Command::Set { title, length, position, pick, weights } => {
            if weights.is_some() {
                settings.weights = weights;
            }
            let options = SetOptions {
                length: length.unwrap_or(settings.set_length),
                position,
                difficulty: None,
                max_attempts: settings.max_attempts,
            };
            info!("Building a set of {} from {:?}", options.length, title.join(" "));

            let list = TuneList::from_settings(&settings)?;
            let set = build_set(&list, &title, pick, &options)?;
            for tune in &set {
                println!("{}", tune.display_line());
            }
        }
        cli::Command::Completion { .. } => {}
    }

    Ok(())
}

/// Builds the set, asking on stdin whenever the title is ambiguous.
fn build_set(list: &TuneList, title: &[String], pick: Option<usize>, options: &SetOptions) -> Result<Vec<TuneRecord>> {
    let mut rng = rand::thread_rng();
    let mut pick = pick;

    loop {
        match list.random_set_from_title(&mut rng, title, pick, options) {
            Err(TuneError::AmbiguousSelection { title, candidates, choice }) => {
                let stdin = io::stdin();
                let chosen = prompt_choice(&mut stdin.lock(), &mut io::stdout(), &candidates, choice)?;
                let Some(chosen) = chosen else {
                    return Err(TuneError::AmbiguousSelection { title, candidates, choice }.into());
                };
                debug!("User picked candidate {chosen}");
                pick = Some(chosen);
            }
            other => return Ok(other?),
        }
    }
}

/// Lists `candidates` and reads a 1-based choice, asking again until the
/// answer is in range. `None` once input runs out.
fn prompt_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    candidates: &[TuneRecord],
    previous: Option<usize>,
) -> io::Result<Option<usize>> {
    if let Some(previous) = previous {
        writeln!(output, "There is no tune number {previous}.")?;
    }
    writeln!(output, "Several tunes match:")?;
    for (number, tune) in candidates.iter().enumerate() {
        writeln!(output, "  {}. {}", number + 1, tune.display_line())?;
    }

    loop {
        write!(output, "Choose a tune (1-{}): ", candidates.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=candidates.len()).contains(&choice) => return Ok(Some(choice)),
            _ => writeln!(output, "Please enter a number between 1 and {}.", candidates.len())?,
        }
    }
}

fn print_tunes(tunes: &[&TuneRecord]) {
    if tunes.is_empty() {
        println!("Nothing found.");
        return;
    }
    for tune in tunes {
        println!("{}", tune.display_line());
    }
}

fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<TuneError>() {
        Some(e) => e.exit_code(),
        None if error.downcast_ref::<io::Error>().is_some() => EXIT_LOAD,
        None => EXIT_USAGE,
    }
}

fn report_error(error: &anyhow::Error) {
    eprintln!("Error: {error}");
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }

    match error.downcast_ref::<TuneError>() {
        Some(TuneError::Load { .. }) => {
            eprintln!();
            eprintln!("Point tunelist at your list with --source, TUNELIST_SOURCE or");
            eprintln!("`source` in the config file.");
        }
        Some(TuneError::CandidatePoolExhausted { .. }) => {
            eprintln!();
            eprintln!("Try a shorter set, a looser difficulty, or more tunes of this dance.");
        }
        _ => {}
    }
}
