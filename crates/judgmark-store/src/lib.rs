//! Session layer: the current extraction result, its edits, and CSV export.

mod error;
pub use error::StoreError;

mod export;
pub use export::{EXPORT_PREFIX, export_file_name, write_csv};

mod session;
pub use session::Session;
