//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `tunelist` binary.
//!
//! ## Commands
//!
//! - `search`: List tunes matching a dance, key and difficulty
//! - `set`: Build a set of tunes around a seed tune
//! - `completion`: Print a shell completion script
//!
//! ## Examples
//!
//! ```bash
//! tunelist search reel in d
//! tunelist search jig in em '*l3'
//! tunelist set -t drowsy maggie '*=2' -n 4 -p 1
//! tunelist --source https://example.com/tunes.csv search hornpipe
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Top-level arguments.
///
/// The global flags override the matching entries of the config file.
#[derive(Parser, Debug)]
#[command(name = "tunelist")]
#[command(about = "Tunelist: search your dance tunes and build sets that flow by key")]
#[command(version)]
pub struct Args {
    /// Tune list to read: a CSV path or an http(s) URL
    ///
    /// Overrides `source` from the config file. Defaults to `list.csv` in
    /// the current directory.
    #[arg(long, global = true, env = "TUNELIST_SOURCE", value_hint = clap::ValueHint::AnyPath)]
    pub source: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "TUNELIST_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the tune list
    ///
    /// The query is a dance, optionally followed by `in <key>` and a
    /// difficulty:
    ///
    ///   reel               every reel
    ///   reel in d          reels in D major (d, dmaj, dmajor, d+)
    ///   jig in em *l3      jigs in E minor easier than three stars
    ///   reel *g1           reels harder than one star
    ///
    /// A difficulty is `*` followed by `=`, `l` (less) or `g` (greater) and a
    /// single digit. Quote it so the shell leaves the `*` alone.
    Search {
        /// Dance, `in`, key and difficulty tokens
        #[arg(value_name = "QUERY")]
        query: Vec<String>,

        /// Only tunes whose title contains this text
        ///
        /// Quotes inside the value are stripped, so `--title "'the kesh'"`
        /// works as well as `--title "the kesh"`.
        #[arg(long, value_hint = clap::ValueHint::Other)]
        title: Option<String>,

        /// Print matches as JSON instead of one line per tune
        #[arg(long)]
        json: bool,
    },

    /// Build a set around a tune
    ///
    /// Finds the tune by title, places it in the set and fills the other
    /// slots with tunes of the same dance whose keys are drawn from the key
    /// weight table. A trailing difficulty token (e.g. `*l3`) restricts the
    /// added tunes.
    Set {
        /// Title words of the seed tune, optionally ending in a difficulty
        #[arg(short = 't', long = "title", required = true, num_args = 1.., value_hint = clap::ValueHint::Other)]
        title: Vec<String>,

        /// Number of tunes in the set
        ///
        /// Defaults to `set_length` from the config file (3).
        #[arg(short = 'n', long)]
        length: Option<usize>,

        /// 1-based slot of the seed tune; random when omitted
        #[arg(short = 'p', long)]
        position: Option<usize>,

        /// Which of several matching titles to use (1-based)
        ///
        /// Without it, several matches are listed and you are asked to choose.
        #[arg(long)]
        pick: Option<usize>,

        /// JSON key weight table replacing the built-in one
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        weights: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Usage: tunelist completion bash > ~/.local/share/bash-completion/completions/tunelist
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
