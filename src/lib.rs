//! TidyKit - everyday file management from the terminal

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod menu;
pub mod ops;
pub mod organize;
pub mod search;
pub mod storage;
pub mod validate;

// Re-exports for easy access
pub use archive::{compress, extract};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{OpError, OpResult};
pub use menu::MenuAction;
pub use organize::{Classifier, OrganizeOptions, OrganizeReport};
pub use search::{SearchFilters, SearchReport};
pub use validate::{validate_path, PathKind, Validation};

pub mod colors {
    use colored::Color;

    pub const HEADER: Color = Color::TrueColor { r: 157, g: 77, b: 255 };
    pub const PATH: Color = Color::TrueColor { r: 77, g: 195, b: 255 };
    pub const SUCCESS: Color = Color::TrueColor { r: 77, g: 255, b: 157 };
    pub const WARNING: Color = Color::TrueColor { r: 255, g: 217, b: 61 };
}

/// Current version of TidyKit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File size (MB) above which a compression advisory is printed
pub const DEFAULT_COMPRESS_SUGGEST_MB: u64 = 50;

/// Default name of the bundle directory created under an organized folder
pub const DEFAULT_BUNDLE_DIR: &str = "Compressed";

/// Width of the textual usage bar in the storage report
pub const USAGE_BAR_WIDTH: usize = 20;
