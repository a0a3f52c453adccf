//! Error handling for TSF decoding operations.
//!
//! Every structural violation in a TSF file maps to exactly one variant.
//! Decode failures abort the whole decode; no partial table is returned.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid meta-data specification at line {line}: '{content}'")]
    InvalidMetadataSpecification { line: usize, content: String },

    #[error("Invalid attribute type '{attribute_type}' for attribute '{name}' at line {line}")]
    InvalidAttributeType {
        line: usize,
        name: String,
        attribute_type: String,
    },

    #[error("Invalid value '{value}' for {directive} at line {line}")]
    InvalidMetadata {
        line: usize,
        directive: String,
        value: String,
    },

    #[error("Missing @data section")]
    MissingDataSection,

    #[error("Missing attribute section: attributes must be declared before @data")]
    MissingAttributeSection,

    #[error("Missing series information under @data section")]
    MissingSeriesInformation,

    #[error("Missing attributes/values in series at line {line}: expected {expected} fields, found {found}")]
    MissingAttributesOrValues {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("All series values are missing at line {line}")]
    AllValuesMissing { line: usize },

    #[error("Invalid value '{value}' for '{field}' at line {line}")]
    InvalidAttributeValues {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Attribute '{attribute}' is a date but no @frequency was declared (line {line})")]
    MissingFrequency { line: usize, attribute: String },

    #[error("Invalid frequency '{label}'")]
    InvalidFrequency { label: String },

    #[error("Invalid timestamp '{value}' for attribute '{attribute}' at line {line}: {reason}")]
    InvalidTimestampFormat {
        line: usize,
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("Key '{key}' is not a declared attribute")]
    InvalidKey { key: String },

    #[error("Index '{index}' is not a declared attribute")]
    InvalidIndex { index: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },
}

/// Fieldless view of [`TsfError`] for matching on the failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Polars,
    FileNotFound,
    InvalidMetadataSpecification,
    InvalidAttributeType,
    InvalidMetadata,
    MissingDataSection,
    MissingAttributeSection,
    MissingSeriesInformation,
    MissingAttributesOrValues,
    AllValuesMissing,
    InvalidAttributeValues,
    MissingFrequency,
    InvalidFrequency,
    InvalidTimestampFormat,
    InvalidKey,
    InvalidIndex,
    Configuration,
    ProcessingFailed,
}

impl TsfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TsfError::Io(_) => ErrorKind::Io,
            TsfError::Polars(_) => ErrorKind::Polars,
            TsfError::FileNotFound { .. } => ErrorKind::FileNotFound,
            TsfError::InvalidMetadataSpecification { .. } => {
                ErrorKind::InvalidMetadataSpecification
            }
            TsfError::InvalidAttributeType { .. } => ErrorKind::InvalidAttributeType,
            TsfError::InvalidMetadata { .. } => ErrorKind::InvalidMetadata,
            TsfError::MissingDataSection => ErrorKind::MissingDataSection,
            TsfError::MissingAttributeSection => ErrorKind::MissingAttributeSection,
            TsfError::MissingSeriesInformation => ErrorKind::MissingSeriesInformation,
            TsfError::MissingAttributesOrValues { .. } => ErrorKind::MissingAttributesOrValues,
            TsfError::AllValuesMissing { .. } => ErrorKind::AllValuesMissing,
            TsfError::InvalidAttributeValues { .. } => ErrorKind::InvalidAttributeValues,
            TsfError::MissingFrequency { .. } => ErrorKind::MissingFrequency,
            TsfError::InvalidFrequency { .. } => ErrorKind::InvalidFrequency,
            TsfError::InvalidTimestampFormat { .. } => ErrorKind::InvalidTimestampFormat,
            TsfError::InvalidKey { .. } => ErrorKind::InvalidKey,
            TsfError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            TsfError::Configuration { .. } => ErrorKind::Configuration,
            TsfError::ProcessingFailed { .. } => ErrorKind::ProcessingFailed,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TsfError>;
