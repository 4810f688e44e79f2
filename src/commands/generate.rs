//! Export the site as static files

use anyhow::Result;
use std::path::Path;

use crate::Site;

/// Render every page into the public directory
pub async fn run(site: &Site, fixtures: Option<&Path>) -> Result<()> {
    let start = std::time::Instant::now();

    let backend = site.backend(fixtures)?;
    let renderer = site.renderer(backend.source())?;
    let summary = renderer.export(&site.public_dir, &site.static_dir).await?;

    let stats = renderer.repository().stats().snapshot();
    tracing::info!(
        "Generated {} pages and {} assets in {:.2}s ({} CMS requests, {} failures)",
        summary.pages,
        summary.assets,
        start.elapsed().as_secs_f64(),
        stats.requests,
        stats.failures
    );

    Ok(())
}
