//! The post index: bio, theme toggle and one entry per post.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{Locale, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tera::Context;

use crate::{
    bio::Bio,
    config::Config,
    errors::{CafecitoError, RenderError},
    links,
    posts::{PostSource, PostSummary},
    reading_time::ReadingTimeLabeler,
    seo::{Seo, SeoProps},
    templates::Templates,
    theme::{DARK_MARKER, STORAGE_KEY, ThemeStore, ThemeToggle},
};

pub const DATE_FORMAT: &str = "%B %d, %Y";

/// One entry in the post list, ready for the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub url: String,
    pub title: String,
    pub date: String,
    pub reading_label: String,
    /// Description if set, otherwise the excerpt. Emitted unescaped.
    pub summary: String,
}

impl PostView {
    pub fn new(
        post: &PostSummary,
        base_path: &str,
        date_locale: &str,
        labeler: &ReadingTimeLabeler,
    ) -> Self {
        PostView {
            url: links::post_url(base_path, &post.slug),
            title: post.title.clone(),
            date: post
                .date
                .map(|d| format_date(d, date_locale))
                .unwrap_or_default(),
            reading_label: labeler.label(post.time_to_read as f64),
            summary: post
                .description
                .clone()
                .unwrap_or_else(|| post.excerpt.clone()),
        }
    }
}

/// Formats `date` in `locale`, falling back to English month names when the
/// locale is unknown.
pub fn format_date(date: NaiveDate, locale: &str) -> String {
    match (Locale::try_from(locale), date.and_hms_opt(0, 0, 0)) {
        (Ok(locale), Some(midnight)) => Utc
            .from_utc_datetime(&midnight)
            .format_localized(DATE_FORMAT, locale)
            .to_string(),
        _ => {
            tracing::warn!("Unknown date locale {locale:?}; using default month names");
            date.format(DATE_FORMAT).to_string()
        }
    }
}

pub struct IndexPage<'a> {
    config: &'a Config,
    templates: &'a Templates,
}

impl<'a> IndexPage<'a> {
    pub fn new(config: &'a Config, templates: &'a Templates) -> Self {
        Self { config, templates }
    }

    /// Renders the index. Without posts the page shows the empty state.
    pub fn render<P, S>(&self, source: &P, toggle: &ThemeToggle<S>) -> Result<String, CafecitoError>
    where
        P: PostSource + ?Sized,
        S: ThemeStore,
    {
        let posts = source.posts()?;
        tracing::debug!("Rendering index with {} posts", posts.len());
        let context = self.context(&posts, toggle);
        Ok(self.templates.render("index.html", &context)?)
    }

    /// Renders the index and writes it to `output`, creating parent folders.
    pub fn render_to_file<P, S>(
        &self,
        source: &P,
        toggle: &ThemeToggle<S>,
        output: &Path,
    ) -> Result<PathBuf, CafecitoError>
    where
        P: PostSource + ?Sized,
        S: ThemeStore,
    {
        let html = self.render(source, toggle)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RenderError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(output, html).map_err(|e| RenderError::WriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;
        tracing::info!("Wrote {}", output.display());
        Ok(output.to_path_buf())
    }

    fn context<S: ThemeStore>(&self, posts: &[PostSummary], toggle: &ThemeToggle<S>) -> Context {
        let site = &self.config.site;
        let labeler = self.config.reading_time.labeler();

        let seo_props = if posts.is_empty() {
            SeoProps::titled("All posts")
        } else {
            SeoProps::default()
        };
        let seo_props = SeoProps {
            lang: site.lang.clone(),
            ..seo_props
        };

        let post_views: Vec<PostView> = posts
            .iter()
            .map(|p| {
                PostView::new(
                    p,
                    &self.config.base_path,
                    &self.config.date_locale,
                    &labeler,
                )
            })
            .collect();

        let mut context = Context::new();
        context.insert("site_title", &site.title.clone().unwrap_or_default());
        context.insert("base_path", &self.config.base_path);
        context.insert("content_dir", &self.config.content_dir);
        context.insert("seo", &Seo::new(site).head(&seo_props));
        context.insert("bio", &Bio::from_site(site));
        context.insert("toggle", &toggle.view());
        context.insert("body_class", &toggle.store().attribute());
        context.insert("storage_key", STORAGE_KEY);
        context.insert("dark_marker", DARK_MARKER);
        context.insert("posts", &post_views);
        context
    }
}
