//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::ConfigError;
pub use site::I18nConfig;
pub use site::SiteConfig;
