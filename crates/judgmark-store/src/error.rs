use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not a schema field: {0}")]
    UnknownField(String),

    #[error("export directory not found: {0}")]
    ExportDirNotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
