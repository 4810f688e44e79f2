//! novaworks: server-rendered agency website backed by the Cosmic headless CMS
//!
//! Projects, blog posts and team members are fetched from a CMS bucket (or a
//! local fixtures file), rendered with embedded Tera templates, and served
//! over HTTP or exported as static files. Every page carries meta tags and
//! schema.org JSON-LD.

pub mod cms;
pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod seo;
pub mod server;
pub mod templates;
pub mod theme;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cms::{ContentSource, MemorySource};
use content::ContentRepository;
use generator::PageRenderer;

/// The main site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (export) directory
    pub public_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
}

/// Where content comes from
#[derive(Clone)]
pub enum Backend {
    /// The remote CMS bucket
    Remote(Arc<dyn ContentSource>),
    /// A local fixtures file, reloadable in place
    Fixtures(Arc<MemorySource>),
}

impl Backend {
    pub fn source(&self) -> Arc<dyn ContentSource> {
        match self {
            Backend::Remote(source) => source.clone(),
            Backend::Fixtures(source) => source.clone() as Arc<dyn ContentSource>,
        }
    }

    pub fn fixtures(&self) -> Option<&Arc<MemorySource>> {
        match self {
            Backend::Fixtures(source) => Some(source),
            Backend::Remote(_) => None,
        }
    }
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` if present
    ///
    /// Environment overrides are applied on top of the file.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();
        tracing::debug!("Loaded config: {:?}", config);

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already-built configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        }
    }

    /// Pick the content backend
    ///
    /// An explicit fixtures file wins over `cms.fixtures` in the config; with
    /// neither, the remote bucket is used.
    pub fn backend(&self, fixtures: Option<&Path>) -> Result<Backend> {
        let fixtures = fixtures
            .map(Path::to_path_buf)
            .or_else(|| self.config.cms.fixtures.as_ref().map(PathBuf::from))
            .map(|path| {
                if path.is_absolute() {
                    path
                } else {
                    self.base_dir.join(path)
                }
            });

        match fixtures {
            Some(path) => {
                let source = MemorySource::load(&path)?;
                tracing::info!("Loaded {} objects from {:?}", source.len(), path);
                Ok(Backend::Fixtures(Arc::new(source)))
            }
            None => Ok(Backend::Remote(cms::connect(&self.config.cms)?)),
        }
    }

    /// Content accessors over a source
    pub fn repository(&self, source: Arc<dyn ContentSource>) -> ContentRepository {
        ContentRepository::new(source, self.config.featured_limit)
    }

    /// Page renderer over a source
    pub fn renderer(&self, source: Arc<dyn ContentSource>) -> Result<PageRenderer> {
        PageRenderer::new(Arc::new(self.config.clone()), self.repository(source))
    }

    /// Export the static site
    pub async fn generate(&self, fixtures: Option<&Path>) -> Result<()> {
        commands::generate::run(self, fixtures).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Test Studio\npublic_dir: out\ncms:\n  fixtures: content.json\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Test Studio");
        assert_eq!(site.public_dir, dir.path().join("out"));
        assert_eq!(site.static_dir, dir.path().join("static"));
    }

    #[test]
    fn test_backend_prefers_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("content.json"), crate::testing::SAMPLE_CONTENT).unwrap();

        let mut config = config::SiteConfig::default();
        config.cms.fixtures = Some("content.json".to_string());
        let site = Site::with_config(dir.path().to_path_buf(), config);

        let backend = site.backend(None).unwrap();
        assert!(backend.fixtures().is_some());
        assert_eq!(backend.source().name(), "memory");
    }

    #[test]
    fn test_backend_without_credentials_fails() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), config::SiteConfig::default());
        assert!(site.backend(None).is_err());
    }
}
