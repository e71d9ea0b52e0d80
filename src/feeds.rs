use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error, Diagnostic)]
pub enum FeedsError {
    #[error("I/O error within feeds domain")]
    #[diagnostic(code(pagefeed::feeds::io))]
    Io(#[from] IoError),

    #[error("Unable to parse feed list at '{path}': {source}")]
    #[diagnostic(
        code(pagefeed::feeds::parse_json),
        help("The feed list must be a json array of objects")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feed record #{index} in '{path}' {violation}")]
    #[diagnostic(
        code(pagefeed::feeds::schema),
        help("Every feed record must be an object with a string \"url\" field")
    )]
    Schema {
        path: PathBuf,
        index: usize,
        violation: SchemaViolation,
    },

    #[error("Unable to serialize feed list: {source}")]
    #[diagnostic(code(pagefeed::feeds::serialize))]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("is not an object")]
    NotAnObject,
    #[error("has no \"url\" field")]
    MissingUrl,
    #[error("has a \"url\" field that is not a string")]
    UrlNotString,
}

/// One object of the feed list. Keys other than `url` are carried through untouched and in
/// their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedRecord(Map<String, Value>);
impl FeedRecord {
    pub fn url(&self) -> &str {
        self.0.get("url").and_then(Value::as_str).unwrap_or_default()
    }
}
impl TryFrom<Value> for FeedRecord {
    type Error = SchemaViolation;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(SchemaViolation::NotAnObject);
        };

        match fields.get("url") {
            None => Err(SchemaViolation::MissingUrl),
            Some(Value::String(_)) => Ok(Self(fields)),
            Some(_) => Err(SchemaViolation::UrlNotString),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    pub kept: usize,
    /// urls of the dropped records, in file order
    pub removed: Vec<String>,
}

/// Parses `content` (read from `path`) as a list of [`FeedRecord`].
pub fn parse(path: &Path, content: &str) -> Result<Vec<FeedRecord>, FeedsError> {
    let values: Vec<Value> = serde_json::from_str(content).map_err(|err| FeedsError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            FeedRecord::try_from(value).map_err(|violation| FeedsError::Schema {
                path: path.to_path_buf(),
                index,
                violation,
            })
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<FeedRecord>, FeedsError> {
    let content = fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    parse(path, &content)
}

/// Splits `records` into the ones to keep and the ones whose url contains `excluded`.
/// Relative order is preserved on both sides.
pub fn partition(records: Vec<FeedRecord>, excluded: &str) -> (Vec<FeedRecord>, Vec<FeedRecord>) {
    records
        .into_iter()
        .partition(|record| !record.url().contains(excluded))
}

/// Serializes `records` with a four space indent. Non-ascii text is written as is.
pub fn to_json(records: &[FeedRecord]) -> Result<Vec<u8>, FeedsError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));

    records
        .serialize(&mut serializer)
        .map_err(|err| FeedsError::Serialize { source: err })?;

    Ok(buffer)
}

/// Overwrites `path` with `records`. The previous content is not backed up and the write is
/// not atomic.
pub fn save(path: &Path, records: &[FeedRecord]) -> Result<(), FeedsError> {
    let json = to_json(records)?;

    fs::write(path, json)
        .map_err(|error| IoError::new(FileOperation::Write, path.to_path_buf(), error))?;

    Ok(())
}

/// Removes every feed whose url contains `excluded` from the list stored at `path`.
///
/// # Errors
///
/// Returns a [`FeedsError`] if:
///
/// - The file cannot be read or written.
/// - The file is not a json array.
/// - A record is not an object with a string `url`. The file is left untouched.
pub fn filter_feeds(path: &Path, excluded: &str) -> Result<FilterReport, FeedsError> {
    let records = load(path)?;

    let (kept, removed) = partition(records, excluded);

    for record in &removed {
        log::debug!("dropping feed {}", record.url());
    }

    save(path, &kept)?;

    Ok(FilterReport {
        kept: kept.len(),
        removed: removed.iter().map(|r| r.url().to_string()).collect(),
    })
}
