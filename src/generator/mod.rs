//! Generator module - renders site pages and exports them as static files
//!
//! [`PageRenderer`] is shared by the HTTP server and the static export: both
//! go through the same accessors, builders and templates.

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tera::Context;
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::contact::{ContactForm, FieldError};
use crate::content::{BlogPost, ContentRepository, Fetched, Project};
use crate::helpers::{blog_post_path, project_path};
use crate::seo::{self, Metadata, StaticPage};
use crate::templates::{
    distinct_categories, nav, CategoryView, ContactFormView, LayoutView, PostCard, PostDetail,
    ProjectCard, ProjectDetail, SiteView, TeamCard, TemplateRenderer,
};
use crate::theme::Theme;

/// State of the contact form being shown
#[derive(Debug, Clone, Default)]
pub struct ContactState {
    pub form: ContactForm,
    pub errors: Vec<FieldError>,
    pub submitted: bool,
}

/// Counts reported by a static export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub assets: usize,
}

/// Renders every page of the site to HTML
#[derive(Clone)]
pub struct PageRenderer {
    config: Arc<SiteConfig>,
    repo: ContentRepository,
    templates: Arc<TemplateRenderer>,
}

impl PageRenderer {
    pub fn new(config: Arc<SiteConfig>, repo: ContentRepository) -> Result<Self> {
        Ok(Self {
            config,
            repo,
            templates: Arc::new(TemplateRenderer::new()?),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn repository(&self) -> &ContentRepository {
        &self.repo
    }

    /// Home page: featured projects, posts and team, fetched concurrently
    pub async fn home(&self, theme: Theme) -> Result<String> {
        let (projects, posts, team) = tokio::join!(
            self.repo.featured_projects(),
            self.repo.featured_blog_posts(),
            self.repo.featured_team_members()
        );

        let projects: Vec<ProjectCard> = projects
            .into_list()
            .iter()
            .map(ProjectCard::from)
            .collect();
        let posts: Vec<PostCard> = posts.into_list().iter().map(PostCard::from).collect();
        let team: Vec<TeamCard> = team.into_list().iter().map(TeamCard::from).collect();

        let mut context = Context::new();
        context.insert("projects", &projects);
        context.insert("posts", &posts);
        context.insert("team", &team);

        let meta = StaticPage::Home.metadata(&self.config);
        self.render("home.html", theme, "/", &meta, Vec::new(), context)
    }

    /// All projects
    pub async fn projects(&self, theme: Theme) -> Result<String> {
        let projects = self.repo.projects().await.into_list();
        let categories = project_categories(&projects);
        self.render_projects(theme, "/projects", &projects, categories, None)
    }

    /// Projects in one category; `None` when the category has no projects
    pub async fn projects_in_category(&self, theme: Theme, key: &str) -> Result<Option<String>> {
        let (all, matching) = tokio::join!(
            self.repo.projects(),
            self.repo.projects_by_category(key)
        );
        let matching = matching.into_list();
        let Some(category) = matching
            .iter()
            .find_map(|p| p.metadata.category.as_ref())
            .map(CategoryView::for_projects)
        else {
            return Ok(None);
        };

        let categories = project_categories(&all.into_list());
        let path = category.path.clone();
        self.render_projects(theme, &path, &matching, categories, Some(category))
            .map(Some)
    }

    /// One project; `None` when it does not exist or cannot be fetched
    pub async fn project(&self, theme: Theme, slug: &str) -> Result<Option<String>> {
        match self.repo.project(slug).await.into_option() {
            Some(project) => self.render_project(theme, &project).map(Some),
            None => Ok(None),
        }
    }

    /// All blog posts
    pub async fn blog(&self, theme: Theme) -> Result<String> {
        let posts = self.repo.blog_posts().await.into_list();
        let categories = post_categories(&posts);
        self.render_blog(theme, "/blog", &posts, categories, None)
    }

    /// Blog posts in one category; `None` when the category has no posts
    pub async fn blog_category(&self, theme: Theme, key: &str) -> Result<Option<String>> {
        let (all, matching) = tokio::join!(
            self.repo.blog_posts(),
            self.repo.blog_posts_by_category(key)
        );
        let matching = matching.into_list();
        let Some(category) = matching
            .iter()
            .find_map(|p| p.metadata.category.as_ref())
            .map(CategoryView::for_posts)
        else {
            return Ok(None);
        };

        let categories = post_categories(&all.into_list());
        let path = category.path.clone();
        self.render_blog(theme, &path, &matching, categories, Some(category))
            .map(Some)
    }

    /// One blog post; `None` when it does not exist or cannot be fetched
    pub async fn blog_post(&self, theme: Theme, slug: &str) -> Result<Option<String>> {
        match self.repo.blog_post(slug).await.into_option() {
            Some(post) => self.render_post(theme, &post).map(Some),
            None => Ok(None),
        }
    }

    /// Team page in display order
    pub async fn team(&self, theme: Theme) -> Result<String> {
        let team: Vec<TeamCard> = self
            .repo
            .team_members()
            .await
            .into_list()
            .iter()
            .map(TeamCard::from)
            .collect();

        let mut context = Context::new();
        context.insert("team", &team);

        let meta = StaticPage::Team.metadata(&self.config);
        self.render("team.html", theme, "/team", &meta, Vec::new(), context)
    }

    /// Contact page with the form in the given state
    pub fn contact(&self, theme: Theme, state: &ContactState) -> Result<String> {
        let mut context = Context::new();
        context.insert("form", &ContactFormView::from(&state.form));
        context.insert("errors", &state.errors);
        context.insert("submitted", &state.submitted);
        context.insert("services", &self.config.contact.services);

        let meta = StaticPage::Contact.metadata(&self.config);
        self.render("contact.html", theme, "/contact", &meta, Vec::new(), context)
    }

    /// The 404 page; `what` names the missing thing ("Page", "Post", ...)
    pub fn not_found(&self, theme: Theme, what: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("what", what);

        let meta = seo::not_found_metadata(&self.config, what);
        self.render("not_found.html", theme, "/404", &meta, Vec::new(), context)
    }

    pub async fn sitemap(&self) -> String {
        let urls = seo::sitemap_urls(&self.config, &self.repo).await;
        seo::render_sitemap(&urls)
    }

    pub fn robots(&self) -> String {
        seo::render_robots(&self.config)
    }

    fn render_projects(
        &self,
        theme: Theme,
        path: &str,
        projects: &[Project],
        categories: Vec<CategoryView>,
        category: Option<CategoryView>,
    ) -> Result<String> {
        let cards: Vec<ProjectCard> = projects.iter().map(ProjectCard::from).collect();

        let mut meta = StaticPage::Projects.metadata(&self.config);
        if let Some(category) = &category {
            meta = seo::generate(
                &self.config,
                seo::PageSeo::new(
                    format!("{} Projects", category.label),
                    format!("{} projects from our portfolio.", category.label),
                )
                .canonical(path),
            );
        }

        let mut context = Context::new();
        context.insert("projects", &cards);
        context.insert("categories", &categories);
        context.insert("category", &category);
        self.render("projects.html", theme, path, &meta, Vec::new(), context)
    }

    fn render_project(&self, theme: Theme, project: &Project) -> Result<String> {
        let path = project_path(&project.slug);
        let meta = seo::project_metadata(&self.config, project);
        let schemas = vec![
            seo::to_script_tag(&seo::project_schema(&self.config, project))?,
            seo::to_script_tag(&seo::breadcrumb_schema(
                &self.config,
                &[
                    ("Home", "/"),
                    ("Projects", "/projects"),
                    (project.metadata.name.as_str(), path.as_str()),
                ],
            ))?,
        ];

        let mut context = Context::new();
        context.insert("project", &ProjectDetail::from(project));
        self.render("project.html", theme, &path, &meta, schemas, context)
    }

    fn render_blog(
        &self,
        theme: Theme,
        path: &str,
        posts: &[BlogPost],
        categories: Vec<CategoryView>,
        category: Option<CategoryView>,
    ) -> Result<String> {
        let cards: Vec<PostCard> = posts.iter().map(PostCard::from).collect();

        let mut meta = StaticPage::Blog.metadata(&self.config);
        if let Some(category) = &category {
            meta = seo::generate(
                &self.config,
                seo::PageSeo::new(
                    format!("{} Articles", category.label),
                    format!("Articles about {} from our team.", category.label.to_lowercase()),
                )
                .canonical(path),
            );
        }

        let mut context = Context::new();
        context.insert("posts", &cards);
        context.insert("categories", &categories);
        context.insert("category", &category);
        self.render("blog.html", theme, path, &meta, Vec::new(), context)
    }

    fn render_post(&self, theme: Theme, post: &BlogPost) -> Result<String> {
        let path = blog_post_path(&post.slug);
        let meta = seo::blog_post_metadata(&self.config, post);
        let schemas = vec![
            seo::to_script_tag(&seo::blog_post_schema(&self.config, post))?,
            seo::to_script_tag(&seo::breadcrumb_schema(
                &self.config,
                &[("Home", "/"), ("Blog", "/blog"), (post.metadata.title.as_str(), path.as_str())],
            ))?,
        ];

        let mut context = Context::new();
        context.insert("post", &PostDetail::from(post));
        self.render("post.html", theme, &path, &meta, schemas, context)
    }

    fn layout(
        &self,
        theme: Theme,
        path: &str,
        meta: &Metadata,
        page_schemas: Vec<String>,
    ) -> Result<LayoutView> {
        let mut structured_data = vec![
            seo::to_script_tag(&seo::organization_schema(&self.config))?,
            seo::to_script_tag(&seo::website_schema(&self.config))?,
        ];
        structured_data.extend(page_schemas);

        Ok(LayoutView {
            site: SiteView::new(&self.config),
            head: meta.render_head(),
            structured_data,
            theme,
            next_theme: theme.toggled(),
            nav: nav(path),
            path: path.to_string(),
        })
    }

    fn render(
        &self,
        template: &str,
        theme: Theme,
        path: &str,
        meta: &Metadata,
        page_schemas: Vec<String>,
        mut context: Context,
    ) -> Result<String> {
        context.insert("page", &self.layout(theme, path, meta, page_schemas)?);
        self.templates
            .render(template, &context)
            .with_context(|| format!("Failed to render {} for {}", template, path))
    }

    /// Export the whole site into `public_dir`
    ///
    /// Fails if a collection cannot be fetched, rather than writing a site
    /// with silently missing pages.
    pub async fn export(&self, public_dir: &Path, static_dir: &Path) -> Result<ExportSummary> {
        fs::create_dir_all(public_dir)?;
        let theme = Theme::default();
        let mut pages = 0;

        let (projects, posts) = tokio::join!(self.repo.projects(), self.repo.blog_posts());
        let projects = required(projects, "projects")?;
        let posts = required(posts, "blog posts")?;

        write_page(public_dir, "/", &self.home(theme).await?)?;
        write_page(public_dir, "/projects", &self.projects(theme).await?)?;
        write_page(public_dir, "/blog", &self.blog(theme).await?)?;
        write_page(public_dir, "/team", &self.team(theme).await?)?;
        write_page(
            public_dir,
            "/contact",
            &self.contact(theme, &ContactState::default())?,
        )?;
        pages += 5;

        for project in &projects {
            let html = self.render_project(theme, project)?;
            if write_page(public_dir, &project_path(&project.slug), &html)? {
                pages += 1;
            }
        }
        for category in project_categories(&projects) {
            if let Some(html) = self.projects_in_category(theme, &category.key).await? {
                if write_page(public_dir, &category.path, &html)? {
                    pages += 1;
                }
            }
        }

        for post in &posts {
            let html = self.render_post(theme, post)?;
            if write_page(public_dir, &blog_post_path(&post.slug), &html)? {
                pages += 1;
            }
        }
        for category in post_categories(&posts) {
            if let Some(html) = self.blog_category(theme, &category.key).await? {
                if write_page(public_dir, &category.path, &html)? {
                    pages += 1;
                }
            }
        }

        fs::write(public_dir.join("404.html"), self.not_found(theme, "Page")?)?;
        fs::write(public_dir.join("sitemap.xml"), self.sitemap().await)?;
        fs::write(public_dir.join("robots.txt"), self.robots())?;
        pages += 1;

        let assets = copy_static_assets(static_dir, &public_dir.join("static"))?;
        tracing::info!("Exported {} pages and {} assets", pages, assets);

        Ok(ExportSummary { pages, assets })
    }
}

fn project_categories(projects: &[Project]) -> Vec<CategoryView> {
    distinct_categories(
        projects.iter().filter_map(|p| p.metadata.category.as_ref()),
        CategoryView::for_projects,
    )
}

fn post_categories(posts: &[BlogPost]) -> Vec<CategoryView> {
    distinct_categories(
        posts.iter().filter_map(|p| p.metadata.category.as_ref()),
        CategoryView::for_posts,
    )
}

fn required<T>(fetched: Fetched<Vec<T>>, what: &str) -> Result<Vec<T>> {
    match fetched {
        Fetched::Found(items) => Ok(items),
        Fetched::Missing => Ok(Vec::new()),
        Fetched::Failed(err) => anyhow::bail!("Failed to fetch {}: {}", what, err),
    }
}

/// Write a page to `{public_dir}{path}/index.html`
///
/// Paths with `.` or `..` segments would land outside their route and are
/// skipped; returns whether the page was written.
fn write_page(public_dir: &Path, path: &str, html: &str) -> Result<bool> {
    let mut dir = public_dir.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            tracing::warn!("Skipping page with unsafe path {:?}", path);
            return Ok(false);
        }
        dir.push(segment);
    }
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("index.html"), html)?;
    tracing::debug!("Wrote {}", path);
    Ok(true)
}

/// Copy static assets, returning the number of files copied
fn copy_static_assets(static_dir: &Path, dest_dir: &Path) -> Result<usize> {
    if !static_dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in WalkDir::new(static_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(static_dir)?;
        let dest = dest_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::MemorySource;
    use crate::testing::{sample_config, sample_repository, FailingSource};

    fn renderer() -> PageRenderer {
        PageRenderer::new(Arc::new(sample_config()), sample_repository()).unwrap()
    }

    fn failing_renderer() -> PageRenderer {
        let repo = ContentRepository::new(Arc::new(FailingSource), 3);
        PageRenderer::new(Arc::new(sample_config()), repo).unwrap()
    }

    #[tokio::test]
    async fn test_home_shows_featured_content() {
        let html = renderer().home(Theme::Dark).await.unwrap();
        assert!(
            html.contains("<title>Nova Works - Creative Agency &amp; Digital Solutions</title>")
        );
        assert!(html.contains(r#"class="dark""#));
        assert!(html.contains("/projects/acme-rebrand"));
        assert!(html.contains("Design Trends 2024"));
        assert!(html.contains("Bo Lindqvist"));
        assert!(!html.contains("Dee Marsh"));
        assert!(html.contains(r#""@type":"Organization""#));
    }

    #[tokio::test]
    async fn test_project_page() {
        let html = renderer()
            .project(Theme::Light, "acme-rebrand")
            .await
            .unwrap()
            .unwrap();
        assert!(html.contains("<title>Acme Rebrand | Nova Works</title>"));
        assert!(html.contains("After Effects"));
        assert!(html.contains("View live project"));
        assert!(html.contains(r#""@type":"CreativeWork""#));
        assert!(html.contains(r#""@type":"BreadcrumbList""#));
        assert!(html.contains(
            "https://imgix.cosmicjs.com/acme-1.jpg?w=800&amp;h=600&amp;fit=crop&amp;auto=format%2Ccompress&amp;fm=webp&amp;q=85"
        ));
    }

    #[tokio::test]
    async fn test_sparse_project_omits_optional_sections() {
        let html = renderer()
            .project(Theme::Dark, "quiet-studio")
            .await
            .unwrap()
            .unwrap();
        assert!(!html.contains("View live project"));
        assert!(!html.contains("<h2>Gallery</h2>"));
        assert!(!html.contains("<h2>Technologies</h2>"));
    }

    #[tokio::test]
    async fn test_missing_and_failed_details_are_none() {
        assert!(renderer().blog_post(Theme::Dark, "nope").await.unwrap().is_none());
        assert!(failing_renderer()
            .blog_post(Theme::Dark, "design-trends-2024")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_blog_post_page() {
        let html = renderer()
            .blog_post(Theme::Dark, "design-trends-2024")
            .await
            .unwrap()
            .unwrap();
        assert!(html.contains("<title>Design Trends 2024 | Nova Works</title>"));
        assert!(html.contains("June 1, 2024"));
        assert!(!html.contains("min read"));
        assert!(html.contains("Ada Park"));
        assert!(html.contains(r#""@type":"BlogPosting""#));
        assert!(!html.contains("timeRequired"));
    }

    #[tokio::test]
    async fn test_empty_states_on_failure() {
        let renderer = failing_renderer();
        assert!(renderer
            .projects(Theme::Dark)
            .await
            .unwrap()
            .contains("No projects available at the moment."));
        assert!(renderer
            .blog(Theme::Dark)
            .await
            .unwrap()
            .contains("No blog posts available at the moment."));
        assert!(renderer
            .team(Theme::Dark)
            .await
            .unwrap()
            .contains("Team information coming soon."));
    }

    #[tokio::test]
    async fn test_category_pages() {
        let renderer = renderer();
        let html = renderer
            .blog_category(Theme::Dark, "design")
            .await
            .unwrap()
            .unwrap();
        assert!(html.contains("Notes from the Studio"));
        assert!(!html.contains("Scaling Design Systems</a></h3>"));

        assert!(renderer
            .projects_in_category(Theme::Dark, "unknown")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_team_in_display_order() {
        let html = renderer().team(Theme::Dark).await.unwrap();
        let bo = html.find("Bo Lindqvist").unwrap();
        let ada = html.find("Ada Park").unwrap();
        let dee = html.find("Dee Marsh").unwrap();
        assert!(bo < ada && ada < dee);
        assert!(html.contains("+1 more"));
    }

    #[tokio::test]
    async fn test_contact_page_states() {
        let renderer = renderer();
        let html = renderer.contact(Theme::Dark, &ContactState::default()).unwrap();
        assert!(html.contains("Brand Identity"));
        assert!(!html.contains("role=\"alert\""));

        let form = ContactForm::parse("name=%3Cb%3EJo&email=bad&message=Hi");
        let errors = form.validate(&renderer.config().contact.services).unwrap_err();
        let state = ContactState {
            form,
            errors,
            submitted: false,
        };
        let html = renderer.contact(Theme::Dark, &state).unwrap();
        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains(r#"value="&lt;b&gt;Jo""#));
    }

    #[tokio::test]
    async fn test_not_found_page() {
        let html = renderer().not_found(Theme::Dark, "Post").unwrap();
        assert!(html.contains("Post Not Found"));
        assert!(html.contains("noindex"));
    }

    #[tokio::test]
    async fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let public_dir = dir.path().join("public");
        let static_dir = dir.path().join("static");
        fs::create_dir_all(static_dir.join("img")).unwrap();
        fs::write(static_dir.join("site.css"), "body{}").unwrap();
        fs::write(static_dir.join("img/logo.png"), "png").unwrap();

        let summary = renderer().export(&public_dir, &static_dir).await.unwrap();
        assert_eq!(summary.assets, 2);
        assert!(summary.pages > 5);

        for page in [
            "index.html",
            "projects/index.html",
            "projects/acme-rebrand/index.html",
            "projects/category/branding/index.html",
            "blog/design-trends-2024/index.html",
            "blog/category/design/index.html",
            "team/index.html",
            "contact/index.html",
            "404.html",
            "sitemap.xml",
            "robots.txt",
            "static/site.css",
            "static/img/logo.png",
        ] {
            assert!(public_dir.join(page).exists(), "{} missing", page);
        }
    }

    #[tokio::test]
    async fn test_export_skips_dot_segment_slugs() {
        let source = MemorySource::from_json(
            r#"{"objects": [{
                "id": "p1", "slug": "..", "title": "Escape", "type": "projects",
                "metadata": {"name": "Escape", "client": "Escape Co", "short_description": "Nope"}
            }]}"#,
        )
        .unwrap();
        let repo = ContentRepository::new(Arc::new(source), 3);
        let renderer = PageRenderer::new(Arc::new(sample_config()), repo).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let public_dir = dir.path().join("public");
        renderer
            .export(&public_dir, &dir.path().join("static"))
            .await
            .unwrap();

        let home = fs::read_to_string(public_dir.join("index.html")).unwrap();
        assert!(!home.contains("Escape Co"));
        assert!(public_dir.join("projects/index.html").exists());
    }

    #[test]
    fn test_write_page_rejects_dot_segments() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!write_page(dir.path(), "/projects/..", "x").unwrap());
        assert!(!write_page(dir.path(), "/blog/./x", "x").unwrap());
        assert!(!dir.path().join("index.html").exists());

        assert!(write_page(dir.path(), "/projects/a.b", "x").unwrap());
        assert!(dir.path().join("projects/a.b/index.html").exists());
    }

    #[tokio::test]
    async fn test_export_fails_when_cms_is_down() {
        let dir = tempfile::tempdir().unwrap();
        let result = failing_renderer()
            .export(&dir.path().join("public"), &dir.path().join("static"))
            .await;
        assert!(result.is_err());
    }
}
