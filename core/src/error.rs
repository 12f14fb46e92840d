use thiserror::Error;

#[derive(Error, Debug)]
pub enum HempError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No source file found (tried: {tried})")]
    SourceNotFound { tried: String },

    #[error("Workbook '{path}' has no worksheets")]
    EmptyWorkbook { path: String },

    #[error("Chain '{id}' not found")]
    UnknownChain { id: String },

    #[error("Unknown slot '{name}' (expected main, sub1 or sub2)")]
    UnknownSlot { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type HempResult<T> = Result<T, HempError>;
