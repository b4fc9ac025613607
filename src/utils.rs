/*!
 * Utility functions for fsbrowse
 */

use crate::types::{EntryKind, FileInfo};

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Describe the type of an entry for the type column
pub fn type_description(info: &FileInfo) -> String {
    match info.kind() {
        EntryKind::Folder => "Folder".to_string(),
        EntryKind::File => match info.suffix() {
            Some(suffix) if !suffix.is_empty() => format!("{} File", suffix),
            _ => "File".to_string(),
        },
        EntryKind::Symlink => "Symlink".to_string(),
        EntryKind::Other => "Unknown".to_string(),
    }
}
