pub mod svs;

pub use svs::{load_svs_config, parse_svs_config, RulesConfig, StreamConfig, SvsConfig, ToolsConfig};
