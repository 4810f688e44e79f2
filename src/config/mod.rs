//! Configuration module

mod site;

pub use site::CmsConfig;
pub use site::ContactConfig;
pub use site::OrganizationConfig;
pub use site::SiteConfig;
pub use site::VerificationConfig;
