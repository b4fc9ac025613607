/*!
 * Core types and data structures shared by the models and the view layer
 */

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use strum::Display;

/// Field identifiers understood by the models.
///
/// Values follow the usual item-model numbering so that view descriptions
/// written against other toolkits keep working.
pub mod role {
    /// Name column text
    pub const DISPLAY: i32 = 0;
    /// Icon name
    pub const DECORATION: i32 = 1;
    pub const EDIT: i32 = 2;
    pub const TOOL_TIP: i32 = 3;
    pub const STATUS_TIP: i32 = 4;
    pub const WHATS_THIS: i32 = 5;

    /// First identifier available to models
    pub const USER: i32 = 0x0100;

    pub const FILE_ICON: i32 = DECORATION;
    pub const FILE_PATH: i32 = USER + 1;
    pub const FILE_NAME: i32 = USER + 2;
    pub const FILE_PERMISSIONS: i32 = USER + 3;

    /// Human readable size; start of the display adapter's reserved range
    pub const SIZE: i32 = USER + 4;
    pub const DISPLAYABLE_FILE_PERMISSIONS: i32 = USER + 5;
    pub const LAST_MODIFIED: i32 = USER + 6;
    pub const URL_STRING: i32 = USER + 7;
}

/// Mapping from field identifier to the name a view binds it by
pub type RoleNames = BTreeMap<i32, String>;

/// Handle to one entry of a hierarchical source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    node: Option<usize>,
}

impl ModelIndex {
    /// Create an index pointing at a source node
    pub fn new(row: usize, column: usize, node: usize) -> Self {
        Self {
            row,
            column,
            node: Some(node),
        }
    }

    /// An index that points nowhere
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Source-internal node id
    pub fn node(&self) -> Option<usize> {
        self.node
    }

    /// Same entry, different column
    pub fn sibling_at_column(&self, column: usize) -> Self {
        Self { column, ..*self }
    }
}

impl fmt::Display for ModelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "row = {} column = {}", self.row, self.column)
        } else {
            write!(f, "<invalid>")
        }
    }
}

/// A displayable value produced by a model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// No value for this index and role
    #[default]
    Empty,
    Text(String),
    Number(u64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(text) => f.write_str(text),
            Value::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

/// Kind of a filesystem entry, named after the icon used for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
    Symlink,
    Other,
}

/// Metadata about a filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute path
    pub path: PathBuf,
    /// Entry name, `/` for the filesystem root
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Permission bits (`mode & 0o777`)
    pub permissions: u32,
    /// Last modification time, if the platform reports one
    pub modified: Option<SystemTime>,
    /// The entry itself is a symbolic link
    pub is_symlink: bool,
    pub is_dir: bool,
    pub is_file: bool,
}

impl FileInfo {
    /// Read metadata for `path`.
    ///
    /// `is_symlink` always describes the entry itself. With `resolve_symlinks`
    /// the remaining fields describe the link target, or the link itself when
    /// the target is missing.
    pub fn from_path(path: &Path, resolve_symlinks: bool) -> io::Result<Self> {
        let link_metadata = fs::symlink_metadata(path)?;
        let is_symlink = link_metadata.file_type().is_symlink();
        let metadata = if is_symlink && resolve_symlinks {
            fs::metadata(path).unwrap_or(link_metadata)
        } else {
            link_metadata
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            permissions: metadata.permissions().mode() & 0o777,
            modified: metadata.modified().ok(),
            is_symlink,
            is_dir: metadata.is_dir(),
            is_file: metadata.is_file(),
        })
    }

    /// Icon kind for this entry
    pub fn kind(&self) -> EntryKind {
        if self.is_dir {
            EntryKind::Folder
        } else if self.is_file {
            EntryKind::File
        } else if self.is_symlink {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }

    /// File extension, if any
    pub fn suffix(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
    }
}
