mod settings;
mod split_config;

pub use settings::Settings;
pub use split_config::SplitConfig;
