//! # Tune List Loader
//!
//! Reads the tune list from wherever it lives and hands the rows to
//! [`TuneTable::from_rows`].
//!
//! ## Sources
//!
//! - **Local**: any path, relative paths resolved against the working
//!   directory.
//! - **Remote**: anything starting with `http` or `ftp`. HTTP(S) is fetched
//!   with one blocking request, e.g. a spreadsheet exported as CSV:
//!   `https://docs.google.com/spreadsheets/d/<id>/export?format=csv`.
//!   FTP is recognised but not supported.

use crate::error::{Result, TuneError};
use crate::tune::{ColumnLayout, TuneTable};
use lazy_static::lazy_static;
use path_absolutize::Absolutize;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref REMOTE: Regex = Regex::new(r"(?i)^(http|ftp)").expect("valid remote pattern");
}

/// Where the tune list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// Classifies a configured location.
    #[must_use]
    pub fn detect(location: &str) -> Self {
        let location = location.trim();
        if REMOTE.is_match(location) {
            Source::Remote(location.to_string())
        } else {
            Source::Local(PathBuf::from(location))
        }
    }

    /// Human-readable form for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Source::Local(path) => path.display().to_string(),
            Source::Remote(url) => url.clone(),
        }
    }
}

/// How to split the rows of a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub columns: ColumnLayout,
    /// Skip the first row.
    pub has_headers: bool,
}

/// Loads and builds the tune table in one go; nothing is kept on failure.
pub fn load_table(location: &str, options: &LoadOptions) -> Result<TuneTable> {
    let source = Source::detect(location);
    log::debug!("Loading tune list from {source:?}");

    let text = match &source {
        Source::Local(path) => read_local(path)?,
        Source::Remote(url) => fetch_remote(url)?,
    };

    let rows = split_rows(&source.describe(), &text, options.has_headers)?;
    TuneTable::from_rows(&source.describe(), rows, &options.columns)
}

fn read_local(path: &Path) -> Result<String> {
    let absolute = path
        .absolutize()
        .map_err(|e| TuneError::load(path.display().to_string(), e))?;
    let shown = absolute.display().to_string();

    let mut file = File::open(&absolute).map_err(|e| TuneError::load(&shown, e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| TuneError::load(&shown, e))?;
    Ok(text)
}

fn fetch_remote(url: &str) -> Result<String> {
    if !url.to_ascii_lowercase().starts_with("http") {
        return Err(TuneError::load(url, "only http and https sources can be fetched"));
    }

    log::info!("Fetching tune list from {url}");
    ureq::get(url)
        .call()
        .map_err(|e| TuneError::load(url, e))?
        .body_mut()
        .read_to_string()
        .map_err(|e| TuneError::load(url, e))
}

/// Splits CSV text into rows of cells. Rows may differ in length.
pub fn split_rows(origin: &str, text: &str, has_headers: bool) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|cells| cells.iter().map(str::to_string).collect())
                .map_err(|e| TuneError::load(origin, e))
        })
        .collect()
}
