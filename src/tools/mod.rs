mod archive_unpacker;
mod file_mover;
mod name_normalizer;
mod path_validator;

pub use archive_unpacker::{ArchiveFormat, ArchiveUnpacker, Unpacker, split_archive_name};
pub use file_mover::{is_collision, move_file, path_occupied};
pub use name_normalizer::normalize_name;
pub use path_validator::{ensure_directory_exists, is_empty_dir, validate_directory_exists};
