pub mod app_config;
pub mod config;
pub mod error;
pub mod funnel;
pub mod profile;
pub mod recipients;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, RecipientError};
pub use funnel::{Stage, UnknownVariant, Variant, VariantMode};
pub use profile::BrandingProfile;
pub use recipients::{load_recipients, parse_recipients, variant_distribution, Recipient};
