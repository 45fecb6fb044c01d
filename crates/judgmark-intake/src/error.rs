use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a word document: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed document.xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{}", crate::ENCODING_ERROR_MESSAGE)]
    Encoding,
}
