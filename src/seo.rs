//! Document head metadata: title, language and social meta tags.
//!
//! [`Seo::head`] turns per-page [`SeoProps`] plus the site-wide
//! [`SiteMetadata`] into a [`SeoHead`] that the `seo.html` partial prints.
//! Escaping is left to the template engine.

use serde::Serialize;

use crate::config::SiteMetadata;

/// A single `<meta>` tag, keyed by either `name` or `property`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: String,
}

impl MetaTag {
    pub fn name(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            property: None,
            content: content.into(),
        }
    }

    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: None,
            property: Some(property.into()),
            content: content.into(),
        }
    }
}

/// Responsive image descriptor; only the fallback source is used for sharing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSource {
    pub fallback: Option<String>,
}

/// Per-page overrides. Everything defaults to empty, `lang` to `"en"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeoProps {
    pub title: String,
    pub description: String,
    pub lang: String,
    pub meta: Vec<MetaTag>,
    pub image: ImageSource,
}

impl Default for SeoProps {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            lang: "en".to_string(),
            meta: Vec::new(),
            image: ImageSource::default(),
        }
    }
}

impl SeoProps {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Everything the head partial prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoHead {
    pub lang: String,
    pub title: String,
    pub meta: Vec<MetaTag>,
}

pub struct Seo<'a> {
    site: &'a SiteMetadata,
}

impl<'a> Seo<'a> {
    pub fn new(site: &'a SiteMetadata) -> Self {
        Self { site }
    }

    pub fn head(&self, props: &SeoProps) -> SeoHead {
        SeoHead {
            lang: props.lang.clone(),
            title: self.document_title(&props.title),
            meta: self.meta_tags(props),
        }
    }

    /// An empty title falls back to the default title; otherwise the site
    /// title, when known, is appended as `"{title} | {site}"`.
    pub fn document_title(&self, title: &str) -> String {
        if title.is_empty() {
            return self.site.default_title.clone().unwrap_or_default();
        }
        match self.site.title.as_deref() {
            Some(site_title) if !site_title.is_empty() => format!("{title} | {site_title}"),
            _ => title.to_string(),
        }
    }

    fn meta_tags(&self, props: &SeoProps) -> Vec<MetaTag> {
        let description = if props.description.is_empty() {
            self.site.description.clone().unwrap_or_default()
        } else {
            props.description.clone()
        };
        let creator = self.site.social.twitter.clone().unwrap_or_default();

        let mut tags = vec![
            MetaTag::name("description", &description),
            MetaTag::property("og:title", &props.title),
            MetaTag::property("og:description", &description),
            MetaTag::property("og:type", "website"),
            MetaTag::name("twitter:card", "summary"),
            MetaTag::name("twitter:creator", creator),
            MetaTag::name("twitter:title", &props.title),
            MetaTag::name("twitter:description", &description),
        ];
        tags.extend(props.meta.iter().cloned());

        if let Some(src) = &props.image.fallback {
            let image = format!("{}{}", self.site.site_url.as_deref().unwrap_or_default(), src);
            tags.push(MetaTag::property("og:image", &image));
            tags.push(MetaTag::name("twitter:image:src", image));
        }

        tags
    }
}
