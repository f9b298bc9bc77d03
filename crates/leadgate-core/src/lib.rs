pub mod app_config;
pub mod brands;
pub mod config;
pub mod leads;
pub mod phone;

pub use app_config::{AppConfig, Environment};
pub use brands::{BrandConfig, BrandRegistry, Coverage, CtaText, PhoneNumbers, DEFAULT_BRAND};
pub use config::{load_app_config, load_app_config_from_env};
pub use leads::{
    Attribution, LeadData, LeadField, LeadRecord, LeadSubmission, LeadSummary,
    LeadValidationError, REQUIRED_LEAD_FIELDS, SERVICE_TYPES,
};
pub use phone::{format_phone_number, phone_for_source, phone_link};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brands file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("brand validation failed: {0}")]
    Validation(String),
}
