pub mod app_config;
pub mod asset;
pub mod brief;
pub mod config;
pub mod error;
pub mod verdict;

pub use app_config::{AppConfig, Environment, SinkKind};
pub use asset::AssetRecord;
pub use brief::{parse_brief, CampaignBrief};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{BriefError, ConfigError};
pub use verdict::SufficiencyVerdict;
