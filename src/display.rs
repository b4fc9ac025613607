/*!
 * Display adapter adding human-readable columns to a file-system source
 *
 * The adapter answers four derived roles itself (size, permission string,
 * modification time and file URL) and forwards every other request to the
 * wrapped source unchanged.
 */

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Locale};
use log::{debug, warn};
use url::Url;

use crate::model::FileSystemSource;
use crate::types::{role, FileInfo, ModelIndex, RoleNames, Value};

/// Locale date and time, the default for the last modified column
pub const SHORT_DATE_TIME_FORMAT: &str = "%x %X";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Size column text: whole mebibytes above 10M, whole kibibytes above 10K,
/// plain bytes otherwise, nothing for non-files
pub fn size_string(info: &FileInfo) -> String {
    if !info.is_file {
        return String::new();
    }

    let size = info.size;
    if size > 10 * MIB {
        format!("{}M", size / MIB)
    } else if size > 10 * KIB {
        format!("{}K", size / KIB)
    } else {
        size.to_string()
    }
}

/// Long-listing permission column, e.g. `drwxr-xr-x`
pub fn permission_string(info: &FileInfo) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    let kind = if info.is_symlink {
        'l'
    } else if info.is_dir {
        'd'
    } else {
        '-'
    };

    std::iter::once(kind)
        .chain(FLAGS.iter().map(|&(bit, flag)| {
            if info.permissions & bit != 0 {
                flag
            } else {
                '-'
            }
        }))
        .collect()
}

/// Modification time in `format` for `locale`; empty when unknown or when
/// `format` is not a valid strftime string
pub fn last_modified_string(info: &FileInfo, format: &str, locale: Locale) -> String {
    let Some(modified) = info.modified else {
        return String::new();
    };

    let mut text = String::new();
    let formatted = DateTime::<Local>::from(modified).format_localized(format, locale);
    if write!(text, "{}", formatted).is_err() {
        warn!("Invalid date format: {}", format);
        return String::new();
    }
    text
}

/// Locale named by a tag such as `de-DE` or `de_DE.UTF-8`
pub fn locale_from_tag(tag: &str) -> Option<Locale> {
    let name = tag
        .split(|c: char| c == '.' || c == '@')
        .next()?
        .replace('-', "_");
    Locale::try_from(name.as_str()).ok()
}

/// Locale of the host, `POSIX` when it is unknown or unsupported
pub fn host_locale() -> Locale {
    sys_locale::get_locale()
        .and_then(|tag| locale_from_tag(&tag))
        .unwrap_or(Locale::POSIX)
}

/// `file://` URL of an absolute path, empty when it has no URL form
pub fn url_string(path: &Path) -> String {
    Url::from_file_path(path)
        .map(|url| url.to_string())
        .unwrap_or_default()
}

/// File-system source decorator exposing derived display roles
#[derive(Debug)]
pub struct DisplayFileSystemModel<S> {
    source: S,
    date_format: String,
    locale: Locale,
}

impl<S: FileSystemSource> DisplayFileSystemModel<S> {
    /// Wrap `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            date_format: SHORT_DATE_TIME_FORMAT.to_string(),
            locale: host_locale(),
        }
    }

    /// Use `format` (chrono syntax) for the last modified role
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Format the last modified role for `locale` instead of the host locale
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Answer one of the derived roles, `None` to fall through to the source
    fn derived_data(&self, index: &ModelIndex, role: i32) -> Option<Value> {
        let text = match role {
            role::SIZE => self
                .source
                .file_info(index)
                .map(|info| size_string(&info)),
            role::DISPLAYABLE_FILE_PERMISSIONS => self
                .source
                .file_info(index)
                .map(|info| permission_string(&info)),
            role::LAST_MODIFIED => self
                .source
                .file_info(index)
                .map(|info| last_modified_string(&info, &self.date_format, self.locale)),
            role::URL_STRING => self.source.file_path(index).map(|path| url_string(&path)),
            _ => return None,
        };
        Some(Value::Text(text.unwrap_or_default()))
    }
}

impl<S: FileSystemSource> FileSystemSource for DisplayFileSystemModel<S> {
    fn data(&self, index: &ModelIndex, role: i32) -> Value {
        let derived = if index.is_valid() && role >= role::SIZE {
            self.derived_data(index, role)
        } else {
            None
        };

        let value = derived.unwrap_or_else(|| self.source.data(index, role));
        debug!("data({}, role = {}) = {:?}", index, role, value);
        value
    }

    fn file_info(&self, index: &ModelIndex) -> Option<FileInfo> {
        self.source.file_info(index)
    }

    fn file_path(&self, index: &ModelIndex) -> Option<PathBuf> {
        self.source.file_path(index)
    }

    fn index_of(&self, path: &Path) -> ModelIndex {
        self.source.index_of(path)
    }

    fn role_names(&self) -> RoleNames {
        let mut names = self.source.role_names();
        names.insert(role::SIZE, "size".to_string());
        names.insert(
            role::DISPLAYABLE_FILE_PERMISSIONS,
            "displayableFilePermissions".to_string(),
        );
        names.insert(role::LAST_MODIFIED, "lastModified".to_string());
        names
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        self.source.index(row, column, parent)
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        self.source.parent(index)
    }

    fn row_count(&self, parent: &ModelIndex) -> usize {
        self.source.row_count(parent)
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        self.source.column_count(parent)
    }

    fn root_path(&self) -> PathBuf {
        self.source.root_path()
    }
}
