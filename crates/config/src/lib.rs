mod config;
mod error;
mod files;
mod loader;

pub use config::{DocumentsConfig, GraphQLConfig, ProjectConfig, DEFAULT_PROJECT};
pub use error::{ConfigError, Result};
pub use files::find_files;
pub use loader::{find_config, load_config, load_config_from_str};
