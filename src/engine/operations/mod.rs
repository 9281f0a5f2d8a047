mod file_ops;

pub use file_ops::{create_directory, move_file, path_occupied, remove_tree, FileOpError};
