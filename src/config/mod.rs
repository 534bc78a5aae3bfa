//! Configuration management

mod defaults;
mod settings;

pub use defaults::{initialize, initialize_json, InitDefaults};
pub(crate) use settings::{read_json, write_json};
pub use settings::{default_config_path, load_config_state, save_config, ConfigError};
