//! Configuration module

mod site;

pub use site::AnalyticsConfig;
pub use site::CommentsConfig;
pub use site::HighlightConfig;
pub use site::LocaleConfig;
pub use site::LocaleMetadata;
pub use site::NewsletterConfig;
pub use site::SiteConfig;
pub use site::SocialConfig;
