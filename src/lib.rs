/*!
 * fsbrowse - Browse a directory tree with derived display columns
 *
 * This library wraps a lazily loaded file-system tree in a display adapter
 * that adds human-readable size, permission, modification time and URL
 * fields, and binds it to a declarative view description.
 */

pub mod config;
pub mod display;
pub mod error;
pub mod fs_model;
pub mod model;
pub mod types;
pub mod utils;
pub mod view;


// Re-export main components for easier access
pub use config::Config;
pub use display::{permission_string, size_string, DisplayFileSystemModel};
pub use error::{FsBrowseError, Result};
pub use fs_model::FileSystemModel;
pub use model::FileSystemSource;
pub use types::{role, EntryKind, FileInfo, ModelIndex, RoleNames, Value};
pub use utils::format_file_size;
pub use view::{TreeView, ViewContext, ViewEngine};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
