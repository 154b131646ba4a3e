pub mod load;
pub mod types;

pub use types::{
    ARCHIVE_SUFFIXES, Category, CategoryTable, Config, IgnoredFolders, OrganizerSettings,
};
