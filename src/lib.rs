//! Search a list of dance tunes and build sets that flow by key.
//!
//! Core modules:
//! - [`tune`] - Tune records and the in-memory table
//! - [`query`] - Query tokens: dance, key and difficulty
//! - [`filter`] - Matching tunes against a query
//! - [`weights`] - Key-to-key transition weights and weighted picks
//! - [`sequence`] - Set generation around a seed tune
//!
//! ### Supporting Modules
//!
//! - [`loader`] - Reading the list from a CSV file or URL
//! - [`config`] - TOML settings
//! - [`error`] - The [`TuneError`] type and exit codes
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use tunelist::{Settings, SetOptions, TuneList};
//!
//! let settings = Settings::load(None)?;
//! let list = TuneList::from_settings(&settings)?;
//!
//! // Reels in D major, harder than one star
//! for tune in list.search(&["reel", "in", "d", "*g1"], None)? {
//!     println!("{}", tune.display_line());
//! }
//!
//! // A set of three with Drowsy Maggie first
//! let seed = list.select_seed("drowsy maggie", None)?.clone();
//! let options = SetOptions { position: Some(1), ..SetOptions::default() };
//! let set = list.random_set(&mut rand::thread_rng(), &seed, &options)?;
//! println!("Built a set of {} tunes", set.len());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Keys
//!
//! A key is a letter plus a mode suffix. Major spellings are `d`, `dmaj`,
//! `dmajor` and `d+`; minor ones are `dm`, `dmin`, `dminor`, `ddor` and
//! `ddorian`. Searching for any spelling finds tunes written with any other
//! spelling of the same mode.
//!
//! ## Set Generation
//!
//! The seed tune takes its slot, then the slots after it are filled by
//! drawing each next key from the weights of the previous tune's key. The
//! slots before it are filled walking backwards, favouring keys that commonly
//! lead into the current first tune. A tune is never used twice in a set.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod query;
pub mod sequence;
pub mod tune;
pub mod tune_list;
pub mod weights;

pub use config::Settings;
pub use error::{Result, TuneError};
pub use sequence::{SetGenerator, SetOptions};
pub use tune::{TuneRecord, TuneTable};
pub use tune_list::TuneList;
pub use weights::TransitionWeights;
