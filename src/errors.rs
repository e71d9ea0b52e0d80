use miette::Diagnostic;
use thiserror::Error;

/// What pagefeed was doing to a path when the filesystem refused.
#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading")]
    Read,
    #[error("writing")]
    Write,
    #[error("copying the page template to")]
    Copy,
    #[error("listing the page directories of")]
    ListDir,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error while {operation} '{path}'")]
#[diagnostic(
    code(pagefeed::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: std::path::PathBuf, source: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source,
        }
    }
}
