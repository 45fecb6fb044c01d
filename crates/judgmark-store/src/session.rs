//! Per-user session: what the form shows and what has been exported.
//!
//! Each interactive surface owns its own [`Session`], so concurrent users never
//! see or export each other's results.

use std::path::{Path, PathBuf};

use judgmark_core::{ExtractionResult, is_schema_field};
use tracing::{debug, info};

use crate::{StoreError, write_csv};

#[derive(Debug, Default)]
pub struct Session {
    input: String,
    current: ExtractionResult,
    exports: Vec<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Judgment text currently in the input box.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn current(&self) -> &ExtractionResult {
        &self.current
    }

    /// Make `result` the current result, discarding the previous one.
    pub fn replace(&mut self, result: ExtractionResult) {
        debug!(fields = result.len(), "replacing current result");
        self.current = result;
    }

    /// Empty the input box and the table. Export files are left alone.
    pub fn clear(&mut self) {
        self.input.clear();
        self.current = ExtractionResult::new();
        info!("session cleared");
    }

    /// Edit one table cell. Returns the previous value, if the field was present.
    pub fn edit(&mut self, field: &str, value: impl Into<String>) -> Result<Option<String>, StoreError> {
        if !is_schema_field(field) {
            return Err(StoreError::UnknownField(field.to_string()));
        }
        Ok(self.current.insert(field, value))
    }

    /// Export the current result to the system temp directory.
    pub fn export(&mut self) -> Result<PathBuf, StoreError> {
        self.export_to(&std::env::temp_dir())
    }

    pub fn export_to(&mut self, dir: &Path) -> Result<PathBuf, StoreError> {
        let path = write_csv(&self.current, dir)?;
        self.exports.push(path.clone());
        Ok(path)
    }

    /// Files exported from this session, oldest first.
    pub fn exports(&self) -> &[PathBuf] {
        &self.exports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Session {
        let mut session = Session::new();
        session.set_input("被告人张某驾驶小型轿车……");
        let mut result = ExtractionResult::new();
        result.insert("肇事人", "张某");
        result.insert("车辆品牌和车型", "大众牌小型轿车");
        session.replace(result);
        session
    }

    fn line_count(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn export_has_one_row_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = populated();
        let path = session.export_to(dir.path()).unwrap();
        assert_eq!(line_count(&path), session.current().len());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "肇事人,张某\n车辆品牌和车型,大众牌小型轿车\n"
        );
    }

    #[test]
    fn clear_then_export_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = populated();
        session.clear();
        assert_eq!(session.input(), "");
        assert!(session.current().is_empty());

        let path = session.export_to(dir.path()).unwrap();
        assert_eq!(line_count(&path), 0);
    }

    #[test]
    fn replace_discards_previous_result() {
        let mut session = populated();
        let mut next = ExtractionResult::new();
        next.insert("性别", "女");
        session.replace(next);
        assert_eq!(session.current().len(), 1);
        assert_eq!(session.current().get("肇事人"), None);
    }

    #[test]
    fn edit_updates_cell() {
        let mut session = populated();
        let prev = session.edit("肇事人", "李某").unwrap();
        assert_eq!(prev.as_deref(), Some("张某"));
        assert_eq!(session.current().get("肇事人"), Some("李某"));

        assert_eq!(session.edit("酒精", "醉酒").unwrap(), None);
        assert_eq!(session.current().rows().last().unwrap().0, "酒精");
    }

    #[test]
    fn edit_rejects_unknown_field() {
        let mut session = populated();
        let err = session.edit("法官", "王某").unwrap_err();
        assert!(matches!(err, StoreError::UnknownField(f) if f == "法官"));
    }

    #[test]
    fn export_history_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = populated();
        let first = session.export_to(dir.path()).unwrap();
        session.clear();
        let second = session.export_to(dir.path()).unwrap();

        assert_eq!(session.exports(), [first.clone(), second.clone()]);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = populated();
        let b = populated();
        a.clear();
        assert!(a.current().is_empty());
        assert_eq!(b.current().len(), 2);
    }
}
