/*!
 * The capability set every file-system source offers to adapters and views
 */

use std::path::{Path, PathBuf};

use crate::types::{FileInfo, ModelIndex, RoleNames, Value};

/// A hierarchical, read-only provider of file-system entries
pub trait FileSystemSource {
    /// Displayable value of `role` for the entry at `index`
    fn data(&self, index: &ModelIndex, role: i32) -> Value;

    /// Metadata of the entry at `index`; `None` for invalid indexes
    fn file_info(&self, index: &ModelIndex) -> Option<FileInfo>;

    /// Absolute path of the entry at `index`
    fn file_path(&self, index: &ModelIndex) -> Option<PathBuf> {
        self.file_info(index).map(|info| info.path)
    }

    /// Index of the entry at `path`, invalid when it is not part of the tree
    fn index_of(&self, path: &Path) -> ModelIndex;

    /// Field identifiers and the names views bind them by
    fn role_names(&self) -> RoleNames;

    /// Child `row` of `parent`; an invalid parent means the top level
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Parent of `index`, invalid for top-level entries
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// Number of children below `parent`
    fn row_count(&self, parent: &ModelIndex) -> usize;

    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// The directory of interest
    fn root_path(&self) -> PathBuf;
}
