use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use crate::domain::Study;

#[derive(Debug, Error, Diagnostic)]
pub enum ProteomeError {
    #[error("input not found: {0}")]
    #[diagnostic(help("check the study paths in brain-proteome.json"))]
    MissingInput(Utf8PathBuf),

    #[error("sheet {sheet:?} not found in {path}")]
    MissingSheet { path: Utf8PathBuf, sheet: String },

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("{context}: missing column {column:?}")]
    MissingColumn { context: String, column: String },

    #[error("{study}: brain part label {label:?} is not in the vocabulary")]
    #[diagnostic(help("add the label to the study's vocabulary aliases in brain-proteome.json"))]
    UnmappedLabel { study: Study, label: String },

    #[error("invalid brain part: {0}")]
    InvalidBrainPart(String),

    #[error("invalid study: {0}")]
    InvalidStudy(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("failed to render chart: {0}")]
    Render(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl From<rusqlite::Error> for ProteomeError {
    fn from(err: rusqlite::Error) -> Self {
        ProteomeError::Store(err.to_string())
    }
}
