/*!
 * Lazily loaded tree of the host file system
 */

use std::cell::RefCell;
use std::cmp::Ordering;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use glob_match::glob_match;
use log::{debug, warn};
use once_cell::sync::Lazy;
use walkdir::WalkDir;

use crate::model::FileSystemSource;
use crate::types::{role, FileInfo, ModelIndex, RoleNames, Value};
use crate::utils::{format_file_size, type_description};

/// Name, size, type and date modified
const COLUMN_COUNT: usize = 4;

/// Node id of the invisible root whose only child is `/`
const ROOT: usize = 0;

/// Format of the built-in date modified column
const DATE_MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Role names every file-system source exposes
static BASE_ROLE_NAMES: Lazy<RoleNames> = Lazy::new(|| {
    [
        (role::DISPLAY, "display"),
        (role::FILE_ICON, "fileIcon"),
        (role::EDIT, "edit"),
        (role::TOOL_TIP, "toolTip"),
        (role::STATUS_TIP, "statusTip"),
        (role::WHATS_THIS, "whatsThis"),
        (role::FILE_PATH, "filePath"),
        (role::FILE_NAME, "fileName"),
        (role::FILE_PERMISSIONS, "filePermissions"),
    ]
    .into_iter()
    .map(|(role, name)| (role, name.to_string()))
    .collect()
});

/// A single entry in the node arena
#[derive(Debug)]
struct FsNode {
    /// `None` only for the invisible root
    info: Option<FileInfo>,
    parent: Option<usize>,
    /// Position below the parent
    row: usize,
    /// `None` until the directory has been read
    children: Option<Vec<usize>>,
}

impl FsNode {
    fn root() -> Self {
        Self {
            info: None,
            parent: None,
            row: 0,
            children: None,
        }
    }
}

/// File-system source backed by the host file system.
///
/// The tree starts at `/`; directories are read on first access, one level
/// at a time. Hidden entries and files rejected by the name filters are not
/// listed, but an entry looked up by path is always added to the tree.
#[derive(Debug)]
pub struct FileSystemModel {
    nodes: RefCell<Vec<FsNode>>,
    root_path: PathBuf,
    resolve_symlinks: bool,
    show_hidden: bool,
    name_filters: Vec<String>,
}

impl Default for FileSystemModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemModel {
    /// Create a model rooted at `/` that resolves symlinks
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![FsNode::root()]),
            root_path: PathBuf::from("/"),
            resolve_symlinks: true,
            show_hidden: false,
            name_filters: Vec::new(),
        }
    }

    /// Set the directory of interest and return its index
    pub fn set_root_path(&mut self, path: impl AsRef<Path>) -> ModelIndex {
        self.root_path = absolute(path.as_ref()).unwrap_or_else(|| path.as_ref().to_path_buf());
        self.index_of(&self.root_path)
    }

    /// Describe symlinks by their targets
    pub fn set_resolve_symlinks(&mut self, enable: bool) {
        if self.resolve_symlinks != enable {
            self.resolve_symlinks = enable;
            self.reset();
        }
    }

    /// List entries whose name starts with a dot
    pub fn set_show_hidden(&mut self, enable: bool) {
        if self.show_hidden != enable {
            self.show_hidden = enable;
            self.reset();
        }
    }

    /// Glob patterns a file name has to match to be listed
    pub fn name_filters(&self) -> &[String] {
        &self.name_filters
    }

    /// Hide files matching none of `filters`; an empty list shows everything
    pub fn set_name_filters(&mut self, filters: Vec<String>) {
        if self.name_filters != filters {
            self.name_filters = filters;
            self.reset();
        }
    }

    /// Drop every loaded directory
    fn reset(&mut self) {
        *self.nodes.get_mut() = vec![FsNode::root()];
    }

    /// Whether an entry is listed in its directory
    fn accepts(&self, info: &FileInfo) -> bool {
        if !self.show_hidden && info.name.starts_with('.') {
            return false;
        }
        if info.is_dir || self.name_filters.is_empty() {
            return true;
        }
        self.name_filters
            .iter()
            .any(|pattern| glob_match(pattern, &info.name))
    }

    /// Read the entries of a directory, folders first then by name
    fn read_children(&self, dir: &Path) -> Vec<FileInfo> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            match entry {
                Ok(entry) => match FileInfo::from_path(entry.path(), self.resolve_symlinks) {
                    Ok(info) if self.accepts(&info) => entries.push(info),
                    Ok(_) => {}
                    Err(e) => warn!("Error reading metadata of {}: {}", entry.path().display(), e),
                },
                Err(e) => warn!("Error reading directory {}: {}", dir.display(), e),
            }
        }

        entries.sort_by(entry_order);
        entries
    }

    /// Load the children of a node if that has not happened yet
    fn ensure_children(&self, id: usize) {
        let dir = {
            let nodes = self.nodes.borrow();
            let Some(node) = nodes.get(id) else {
                return;
            };
            if node.children.is_some() {
                return;
            }
            node.info.as_ref().map(|info| (info.path.clone(), is_expandable(info)))
        };

        let entries = match dir {
            None => match FileInfo::from_path(Path::new("/"), self.resolve_symlinks) {
                Ok(info) => vec![info],
                Err(e) => {
                    warn!("Error reading metadata of /: {}", e);
                    Vec::new()
                }
            },
            Some((path, true)) => self.read_children(&path),
            Some((_, false)) => Vec::new(),
        };

        let mut nodes = self.nodes.borrow_mut();
        let mut ids = Vec::with_capacity(entries.len());
        for (row, info) in entries.into_iter().enumerate() {
            ids.push(nodes.len());
            nodes.push(FsNode {
                info: Some(info),
                parent: Some(id),
                row,
                children: None,
            });
        }
        debug!("Loaded {} entries below node {}", ids.len(), id);
        nodes[id].children = Some(ids);
    }

    /// Child of `id` called `name`, added to the tree when it exists on disk
    /// but is not listed
    fn find_child(&self, id: usize, name: &str) -> Option<usize> {
        self.ensure_children(id);
        let listed = {
            let nodes = self.nodes.borrow();
            nodes[id].children.as_ref().and_then(|children| {
                children.iter().copied().find(|&child| {
                    nodes[child]
                        .info
                        .as_ref()
                        .map_or(false, |info| info.name == name)
                })
            })
        };
        listed.or_else(|| self.insert_child(id, name))
    }

    /// Add the entry `name` below the directory node `id`
    fn insert_child(&self, id: usize, name: &str) -> Option<usize> {
        let dir = self.nodes.borrow()[id].info.as_ref()?.path.clone();
        let info = FileInfo::from_path(&dir.join(name), self.resolve_symlinks).ok()?;

        let mut nodes = self.nodes.borrow_mut();
        let child = nodes.len();
        nodes.push(FsNode {
            info: Some(info),
            parent: Some(id),
            row: 0,
            children: None,
        });

        let mut siblings = nodes[id].children.take().unwrap_or_default();
        siblings.push(child);
        siblings.sort_by(|&a, &b| match (&nodes[a].info, &nodes[b].info) {
            (Some(a), Some(b)) => entry_order(a, b),
            _ => Ordering::Equal,
        });
        for (row, &sibling) in siblings.iter().enumerate() {
            nodes[sibling].row = row;
        }
        nodes[id].children = Some(siblings);
        Some(child)
    }

    /// Node id behind a valid index
    fn node_id(&self, index: &ModelIndex) -> Option<usize> {
        index
            .node()
            .filter(|&id| id != ROOT && id < self.nodes.borrow().len())
    }

    /// Node id whose children an index refers to
    fn parent_id(&self, parent: &ModelIndex) -> Option<usize> {
        if !parent.is_valid() {
            return Some(ROOT);
        }
        if parent.column() != 0 {
            return None;
        }
        self.node_id(parent)
    }
}

impl FileSystemSource for FileSystemModel {
    fn data(&self, index: &ModelIndex, role: i32) -> Value {
        let Some(info) = self.file_info(index) else {
            return Value::Empty;
        };

        match role {
            role::DISPLAY | role::EDIT => match index.column() {
                0 => Value::Text(info.name),
                1 if info.is_file => Value::Text(format_file_size(info.size)),
                1 => Value::Text(String::new()),
                2 => Value::Text(type_description(&info)),
                3 => info.modified.map_or(Value::Empty, |modified| {
                    Value::Text(
                        DateTime::<Local>::from(modified)
                            .format(DATE_MODIFIED_FORMAT)
                            .to_string(),
                    )
                }),
                _ => Value::Empty,
            },
            role::FILE_ICON => Value::Text(info.kind().to_string()),
            role::FILE_PATH => Value::Text(info.path.to_string_lossy().to_string()),
            role::FILE_NAME => Value::Text(info.name),
            role::FILE_PERMISSIONS => Value::Number(u64::from(info.permissions)),
            _ => Value::Empty,
        }
    }

    fn file_info(&self, index: &ModelIndex) -> Option<FileInfo> {
        let id = self.node_id(index)?;
        self.nodes.borrow()[id].info.clone()
    }

    fn index_of(&self, path: &Path) -> ModelIndex {
        let Some(path) = absolute(path) else {
            return ModelIndex::invalid();
        };

        let mut current = ROOT;
        for component in path.components() {
            let name = match component {
                Component::RootDir => "/".to_string(),
                Component::Normal(name) => name.to_string_lossy().to_string(),
                Component::ParentDir => {
                    if let Some(parent) = self.nodes.borrow()[current].parent {
                        if parent != ROOT {
                            current = parent;
                        }
                    }
                    continue;
                }
                Component::CurDir | Component::Prefix(_) => continue,
            };

            match self.find_child(current, &name) {
                Some(child) => current = child,
                None => return ModelIndex::invalid(),
            }
        }

        if current == ROOT {
            return ModelIndex::invalid();
        }
        let row = self.nodes.borrow()[current].row;
        ModelIndex::new(row, 0, current)
    }

    fn role_names(&self) -> RoleNames {
        BASE_ROLE_NAMES.clone()
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= COLUMN_COUNT {
            return ModelIndex::invalid();
        }
        let Some(parent_id) = self.parent_id(parent) else {
            return ModelIndex::invalid();
        };

        self.ensure_children(parent_id);
        let nodes = self.nodes.borrow();
        nodes[parent_id]
            .children
            .as_ref()
            .and_then(|children| children.get(row))
            .map_or_else(ModelIndex::invalid, |&child| {
                ModelIndex::new(row, column, child)
            })
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let Some(id) = self.node_id(index) else {
            return ModelIndex::invalid();
        };

        let nodes = self.nodes.borrow();
        match nodes[id].parent {
            Some(parent) if parent != ROOT => ModelIndex::new(nodes[parent].row, 0, parent),
            _ => ModelIndex::invalid(),
        }
    }

    fn row_count(&self, parent: &ModelIndex) -> usize {
        let Some(parent_id) = self.parent_id(parent) else {
            return 0;
        };

        self.ensure_children(parent_id);
        self.nodes.borrow()[parent_id]
            .children
            .as_ref()
            .map_or(0, Vec::len)
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() && parent.column() != 0 {
            0
        } else {
            COLUMN_COUNT
        }
    }

    fn root_path(&self) -> PathBuf {
        self.root_path.clone()
    }
}

/// Folders first, then by name
fn entry_order(a: &FileInfo, b: &FileInfo) -> Ordering {
    b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name))
}

/// Folders and symlinks to folders can be expanded whether or not symlinks
/// are resolved
fn is_expandable(info: &FileInfo) -> bool {
    info.is_dir || (info.is_symlink && fs::metadata(&info.path).map_or(false, |m| m.is_dir()))
}

/// Resolve a relative path against the current directory
fn absolute(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else {
        env::current_dir().ok().map(|cwd| cwd.join(path))
    }
}
