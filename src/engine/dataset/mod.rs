mod discovery;
mod split;

pub use discovery::{discover_labels, list_images, ImageExtensions};
pub use split::DatasetSplit;
