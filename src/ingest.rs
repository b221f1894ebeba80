//! Document ingestion.
//!
//! Turns a contract file (or a directory of them) into plain text for the
//! scanner. Only plain-text formats are readable here; binary formats are
//! rejected with an error naming the condition so the user can re-export.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Contracts shorter than this are rejected before scanning; they are too
/// short to be a real agreement and would produce misleading flags.
pub const MIN_CONTRACT_LENGTH: usize = 50;

/// Extensions read as plain text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "text"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} files require text extraction; export the contract as plain text (.txt) and retry")]
    BinaryFormat(String),

    #[error("unsupported file type '.{0}'; supported: .txt, .md, .text")]
    UnsupportedFileType(String),

    #[error("file has no extension; supported: .txt, .md, .text")]
    NoExtension,

    #[error("contract text is too short to analyze ({length} characters, minimum {MIN_CONTRACT_LENGTH})")]
    TooShort { length: usize },
}

/// Read a contract file into plain text and validate its length.
pub fn read_contract_text(path: &Path) -> Result<String, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or(IngestError::NoExtension)?;

    match ext.as_str() {
        e if TEXT_EXTENSIONS.contains(&e) => {}
        "pdf" => return Err(IngestError::BinaryFormat("PDF".to_string())),
        "docx" | "doc" => return Err(IngestError::BinaryFormat("Word".to_string())),
        other => return Err(IngestError::UnsupportedFileType(other.to_string())),
    }

    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.trim().to_string();

    validate_length(&text)?;
    Ok(text)
}

/// Reject contract text below the minimum length. Counts Unicode scalar
/// values, not bytes.
pub fn validate_length(text: &str) -> Result<(), IngestError> {
    let length = text.chars().count();
    if length < MIN_CONTRACT_LENGTH {
        return Err(IngestError::TooShort { length });
    }
    Ok(())
}

/// Collect every supported contract file under a directory, sorted for
/// deterministic scan order.
pub fn collect_contract_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
