/*!
 * Configuration handling for fsbrowse
 */

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::display::SHORT_DATE_TIME_FORMAT;
use crate::error::Result;
use crate::{bail, ensure, error};

/// Command-line arguments for fsbrowse
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "fsbrowse",
    version = crate::VERSION,
    about = "Browse a directory tree with size, permission and modification columns",
    long_about = "Shows the file system below a root directory (your home directory by default) as a tree, laid out by a declarative view description."
)]
pub struct Args {
    /// Directory to show (defaults to the home directory)
    pub root: Option<String>,

    /// View description file (JSON); the built-in view is used when omitted
    #[clap(long)]
    pub view: Option<String>,

    /// Describe symbolic links by their targets
    #[clap(long, action = ArgAction::Set, default_value_t = true)]
    pub resolve_symlinks: bool,

    /// List entries whose name starts with a dot
    #[clap(long)]
    pub show_hidden: bool,

    /// Comma-separated list of file name patterns to show (folders are always shown)
    #[clap(long, value_delimiter = ',')]
    pub name_filters: Vec<String>,

    /// Format of the last modified column (strftime syntax)
    #[clap(long, default_value = SHORT_DATE_TIME_FORMAT)]
    pub date_format: String,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory of interest
    pub root_path: PathBuf,

    /// View description file, `None` for the built-in view; a file that
    /// cannot be read is reported by the view engine
    pub view_file: Option<PathBuf>,

    /// Whether symlinks are described by their targets
    pub resolve_symlinks: bool,

    /// Whether dot entries are listed
    pub show_hidden: bool,

    /// File name patterns to show
    pub name_filters: Vec<String>,

    /// Format of the last modified column
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("/"),
            view_file: None,
            resolve_symlinks: true,
            show_hidden: false,
            name_filters: Vec::new(),
            date_format: SHORT_DATE_TIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let root_path = match args.root {
            Some(root) => PathBuf::from(root),
            None => dirs::home_dir()
                .ok_or_else(|| error!(Config, "Cannot determine the home directory"))?,
        };

        Ok(Self {
            root_path,
            view_file: args.view.map(PathBuf::from),
            resolve_symlinks: args.resolve_symlinks,
            show_hidden: args.show_hidden,
            name_filters: args
                .name_filters
                .into_iter()
                .filter(|pattern| !pattern.is_empty())
                .collect(),
            date_format: args.date_format,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.root_path.exists() {
            bail!(PathNotFound, "{}", self.root_path.display());
        }
        ensure!(
            self.root_path.is_dir(),
            Config,
            "Root is not a directory: {}",
            self.root_path.display()
        );

        ensure!(
            !StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)),
            InvalidArgument,
            "Invalid date format: {}",
            self.date_format
        );

        Ok(())
    }
}
