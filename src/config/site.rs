//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub language: String,

    // URL
    pub url: String,
    pub logo: String,
    pub og_image: String,
    pub twitter_handle: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Home page
    pub featured_limit: usize,

    #[serde(default)]
    pub organization: OrganizationConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub cms: CmsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Nova Works".to_string(),
            tagline: "Creative Agency & Digital Solutions".to_string(),
            description: "Nova Works is a creative agency specializing in web design, development, branding, and digital solutions. We create exceptional digital experiences that drive results.".to_string(),
            keywords: vec![
                "creative agency".to_string(),
                "web design".to_string(),
                "web development".to_string(),
                "branding".to_string(),
                "digital solutions".to_string(),
                "UI/UX design".to_string(),
            ],
            language: "en".to_string(),

            url: "https://novaworks.com".to_string(),
            logo: "/logo.png".to_string(),
            og_image: "/og-image.jpg".to_string(),
            twitter_handle: "@novaworks".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            featured_limit: 3,

            organization: OrganizationConfig::default(),
            contact: ContactConfig::default(),
            verification: VerificationConfig::default(),
            cms: CmsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("COSMIC_BUCKET_SLUG") {
            self.cms.bucket_slug = v;
        }
        if let Some(v) = get("COSMIC_READ_KEY") {
            self.cms.read_key = v;
        }
        if let Some(v) = get("COSMIC_WRITE_KEY") {
            self.cms.write_key = Some(v);
        }
        if let Some(v) = get("SITE_URL") {
            self.url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("GOOGLE_SITE_VERIFICATION") {
            self.verification.google = Some(v);
        }
    }

    /// Short organization name used in fallbacks ("Nova Works Team")
    pub fn team_name(&self) -> String {
        format!("{} Team", self.title)
    }

    /// Absolute URL of the site logo
    pub fn logo_url(&self) -> String {
        crate::helpers::absolute_url(self, &self.logo)
    }
}

/// Facts about the organization published as structured data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationConfig {
    pub description: String,
    pub same_as: Vec<String>,
    pub telephone: String,
    pub contact_type: String,
    pub area_served: String,
    pub available_language: String,
    pub address_country: String,
    pub address_region: String,
    pub founding_date: String,
    pub founder: String,
    pub number_of_employees: String,
    pub knows_about: Vec<String>,
    pub service_area: String,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            description: "Creative agency specializing in web design, development, branding, and digital solutions".to_string(),
            same_as: vec![
                "https://twitter.com/novaworks".to_string(),
                "https://linkedin.com/company/novaworks".to_string(),
                "https://instagram.com/novaworks".to_string(),
            ],
            telephone: "+1-555-0123".to_string(),
            contact_type: "customer service".to_string(),
            area_served: "US".to_string(),
            available_language: "English".to_string(),
            address_country: "US".to_string(),
            address_region: "CA".to_string(),
            founding_date: "2020-01-01".to_string(),
            founder: "Nova Works Team".to_string(),
            number_of_employees: "10-50".to_string(),
            knows_about: [
                "Web Design",
                "Web Development",
                "Branding",
                "UI/UX Design",
                "Digital Marketing",
                "E-commerce Development",
                "Mobile App Development",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            service_area: "Worldwide".to_string(),
        }
    }
}

/// Contact details shown on the contact page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub address: Vec<String>,
    pub office_hours: Vec<String>,
    pub services: Vec<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            emails: owned(&["hello@novaworks.com", "projects@novaworks.com"]),
            phones: owned(&["+1 (555) 123-4567", "+1 (555) 987-6543"]),
            address: owned(&["123 Creative Street", "Design District", "New York, NY 10001"]),
            office_hours: owned(&[
                "Monday - Friday: 9:00 AM - 6:00 PM",
                "Saturday: 10:00 AM - 4:00 PM",
                "Sunday: Closed",
            ]),
            services: owned(&[
                "Brand Identity",
                "Web Design",
                "Development",
                "UI/UX Design",
                "Mobile Apps",
                "Strategy",
            ]),
        }
    }
}

/// Search engine verification tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub google: Option<String>,
}

/// Headless CMS bucket and client settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub api_url: String,
    pub bucket_slug: String,
    pub read_key: String,
    /// Configured for parity with the CMS SDK; never sent on read paths
    pub write_key: Option<String>,
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// JSON fixtures file used instead of the remote bucket
    pub fixtures: Option<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.cosmicjs.com/v3".to_string(),
            bucket_slug: String::new(),
            read_key: String::new(),
            write_key: None,
            timeout_secs: 10,
            retry_attempts: 2,
            retry_delay_ms: 200,
            retry_max_delay_ms: 2000,
            fixtures: None,
        }
    }
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("api_url", &self.api_url)
            .field("bucket_slug", &self.bucket_slug)
            .field("read_key", &redact(&self.read_key))
            .field("write_key", &self.write_key.as_deref().map(redact))
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("fixtures", &self.fixtures)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
