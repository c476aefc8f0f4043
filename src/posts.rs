//! Post summaries for the index page.
//!
//! The index only needs a handful of fields per post, so the data layer
//! reads YAML frontmatter and derives slug, excerpt and reading time from
//! the file itself. Post bodies are never rendered here.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use pulldown_cmark::{Event, Parser, TagEnd};
use walkdir::WalkDir;
use yaml_rust2::{Yaml, YamlLoader};

use crate::{config::Config, errors::PostsError, links, reading_time};

/// What the index needs to know about a post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    /// Frontmatter title, or the slug when the post has none.
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub excerpt: String,
    /// Whole minutes, at least one.
    pub time_to_read: u32,
}

/// Read-only source of post summaries.
pub trait PostSource {
    /// All posts, newest first.
    fn posts(&self) -> Result<Vec<PostSummary>, PostsError>;
}

impl PostSource for Vec<PostSummary> {
    fn posts(&self) -> Result<Vec<PostSummary>, PostsError> {
        let mut posts = self.clone();
        sort_posts(&mut posts);
        Ok(posts)
    }
}

/// Slugs claimed by more than one post, e.g. `notes.md` and `notes/index.md`.
pub fn duplicate_slugs(posts: &[PostSummary]) -> Vec<&str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts {
        *counts.entry(post.slug.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter_map(|(slug, n)| (n > 1).then_some(slug))
        .collect()
}

/// Reads markdown posts from a content folder.
#[derive(Debug, Clone)]
pub struct FsPostSource {
    pub content_dir: PathBuf,
    pub markdown_extensions: Vec<String>,
    pub words_per_minute: usize,
    pub excerpt_length: usize,
}

impl FsPostSource {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content_dir: config.content_path(),
            markdown_extensions: config.markdown_extensions.clone(),
            words_per_minute: config.reading_time.words_per_minute,
            excerpt_length: config.reading_time.excerpt_length,
        }
    }

    fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.markdown_extensions.iter().any(|m| m == ext))
    }

    /// Builds the summary for one file.
    pub fn read_post(&self, path: &Path) -> Result<PostSummary, PostsError> {
        let content = fs::read_to_string(path).map_err(|e| PostsError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let relative = path.strip_prefix(&self.content_dir).unwrap_or(path);
        let slug = links::slug_for(relative, "index");
        Ok(summarize(
            &slug,
            &content,
            self.words_per_minute,
            self.excerpt_length,
        ))
    }
}

impl PostSource for FsPostSource {
    fn posts(&self) -> Result<Vec<PostSummary>, PostsError> {
        if !self.content_dir.is_dir() {
            tracing::debug!(
                "Content folder {} does not exist; no posts",
                self.content_dir.display()
            );
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let walker = WalkDir::new(&self.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| PostsError::ScanFailed {
                path: self.content_dir.clone(),
                source: e,
            })?;
            if entry.file_type().is_file() && self.is_markdown(entry.path()) {
                let post = self.read_post(entry.path())?;
                tracing::debug!("Found post {} ({})", post.slug, entry.path().display());
                posts.push(post);
            }
        }

        sort_posts(&mut posts);
        for slug in duplicate_slugs(&posts) {
            tracing::warn!("Several posts share the link {slug}; the index lists each of them");
        }
        Ok(posts)
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Newest first; undated posts last; ties by slug.
pub fn sort_posts(posts: &mut [PostSummary]) {
    posts.sort_by(|a, b| {
        let by_date = match (a.date, b.date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Builds a summary from raw file contents.
pub fn summarize(
    slug: &str,
    content: &str,
    words_per_minute: usize,
    excerpt_length: usize,
) -> PostSummary {
    let (frontmatter, body) = split_frontmatter(content);
    let meta = frontmatter.map(parse_frontmatter).unwrap_or(Yaml::BadValue);

    let text = plain_text(body);
    let words = text.split_whitespace().count();

    PostSummary {
        slug: slug.to_string(),
        title: yaml_string(&meta["title"]).unwrap_or_else(|| slug.to_string()),
        date: yaml_string(&meta["date"]).and_then(|d| parse_date(&d)),
        description: yaml_string(&meta["description"]),
        excerpt: prune(&text, excerpt_length),
        time_to_read: reading_time::estimate_minutes(words, words_per_minute),
    }
}

/// Splits `---` fenced frontmatter from the body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = &rest[offset + line.len()..];
            return (Some(&rest[..offset]), body);
        }
        offset += line.len();
    }
    (None, content)
}

fn parse_frontmatter(raw: &str) -> Yaml {
    match YamlLoader::load_from_str(raw) {
        Ok(mut docs) if !docs.is_empty() => docs.swap_remove(0),
        Ok(_) => Yaml::BadValue,
        Err(e) => {
            tracing::warn!("Ignoring unparseable frontmatter: {e}");
            Yaml::BadValue
        }
    }
}

fn yaml_string(value: &Yaml) -> Option<String> {
    let s = match value {
        Yaml::String(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Real(r) => r.clone(),
        _ => return None,
    };
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Flattens markdown into whitespace-separated plain text.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates `text` to at most `length` characters without splitting a word,
/// appending `…` when anything was cut.
pub fn prune(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(length).collect();
    let splits_word = text
        .chars()
        .nth(length)
        .is_some_and(|c| !c.is_whitespace());
    if splits_word && let Some(idx) = cut.rfind(char::is_whitespace) {
        cut.truncate(idx);
    }
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_frontmatter() {
        let (fm, body) = split_frontmatter("---\ntitle: Hola\n---\n\nCuerpo");
        assert_eq!(fm, Some("title: Hola\n"));
        assert_eq!(body, "\nCuerpo");
    }

    #[test]
    fn test_split_frontmatter_absent() {
        let (fm, body) = split_frontmatter("# Solo cuerpo");
        assert!(fm.is_none());
        assert_eq!(body, "# Solo cuerpo");
    }

    #[test]
    fn test_split_frontmatter_unterminated() {
        let input = "---\ntitle: Hola\nsin cierre";
        let (fm, body) = split_frontmatter(input);
        assert!(fm.is_none());
        assert_eq!(body, input);
    }

    #[test]
    fn test_split_frontmatter_crlf() {
        let (fm, body) = split_frontmatter("---\r\ntitle: Hola\r\n---\r\nCuerpo");
        assert_eq!(fm, Some("title: Hola\r\n"));
        assert_eq!(body, "Cuerpo");
    }

    #[test]
    fn test_summarize_reads_frontmatter() {
        let post = summarize(
            "/hola/",
            "---\ntitle: Hola mundo\ndate: 2021-03-04\ndescription: Primer post\n---\nTexto corto.",
            265,
            140,
        );
        assert_eq!(post.title, "Hola mundo");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2021, 3, 4));
        assert_eq!(post.description.as_deref(), Some("Primer post"));
        assert_eq!(post.excerpt, "Texto corto.");
        assert_eq!(post.time_to_read, 1);
    }

    #[test]
    fn test_summarize_title_falls_back_to_slug() {
        let post = summarize("/sin-titulo/", "Solo texto", 265, 140);
        assert_eq!(post.title, "/sin-titulo/");
        assert!(post.date.is_none());
        assert!(post.description.is_none());
    }

    #[test]
    fn test_summarize_bad_yaml_is_tolerated() {
        let post = summarize("/x/", "---\ntitle: [unclosed\n---\nCuerpo", 265, 140);
        assert_eq!(post.title, "/x/");
        assert_eq!(post.excerpt, "Cuerpo");
    }

    #[test]
    fn test_summarize_reading_time_from_words() {
        let body = "palabra ".repeat(1325);
        let post = summarize("/largo/", &body, 265, 140);
        assert_eq!(post.time_to_read, 5);
    }

    #[test]
    fn test_parse_date_with_time() {
        assert_eq!(
            parse_date("2020-12-31T23:59:00Z"),
            NaiveDate::from_ymd_opt(2020, 12, 31)
        );
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2020-13-01"), None);
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let text = plain_text("# Título\n\nUn **texto** con `código` y [enlace](/x).\n\n- uno\n- dos");
        assert_eq!(text, "Título Un texto con código y enlace. uno dos");
    }

    #[test]
    fn test_prune_short_text_untouched() {
        assert_eq!(prune("hola mundo", 140), "hola mundo");
    }

    #[test]
    fn test_prune_on_word_boundary() {
        assert_eq!(prune("uno dos tres cuatro", 10), "uno dos…");
        assert_eq!(prune("uno dos tres cuatro", 7), "uno dos…");
    }

    #[test]
    fn test_prune_single_long_word() {
        assert_eq!(prune("abcdefghij", 4), "abcd…");
    }

    #[test]
    fn test_sort_posts_newest_first_undated_last() {
        let mk = |slug: &str, date: Option<(i32, u32, u32)>| PostSummary {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            description: None,
            excerpt: String::new(),
            time_to_read: 1,
        };
        let mut posts = vec![
            mk("/b/", None),
            mk("/old/", Some((2019, 1, 1))),
            mk("/a/", None),
            mk("/new/", Some((2022, 5, 1))),
        ];
        sort_posts(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/new/", "/old/", "/a/", "/b/"]);
    }

    #[test]
    fn test_fs_source_scans_content_dir() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("blog");
        fs::create_dir_all(content.join("hola")).unwrap();
        fs::create_dir_all(content.join(".drafts")).unwrap();
        fs::write(
            content.join("hola/index.md"),
            "---\ntitle: Hola\ndate: 2021-01-02\n---\nCuerpo",
        )
        .unwrap();
        fs::write(content.join("notas.md"), "---\ndate: 2020-06-01\n---\nNotas").unwrap();
        fs::write(content.join("imagen.png"), [0u8; 4]).unwrap();
        fs::write(content.join(".drafts/secreto.md"), "oculto").unwrap();

        let source = FsPostSource {
            content_dir: content,
            markdown_extensions: vec!["md".to_string()],
            words_per_minute: 265,
            excerpt_length: 140,
        };
        let posts = source.posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/hola/", "/notas/"]);
        assert_eq!(posts[1].title, "/notas/");
    }

    #[test]
    fn test_fs_source_detects_colliding_slugs() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("blog");
        fs::create_dir_all(content.join("notas")).unwrap();
        fs::write(content.join("notas.md"), "---\ndate: 2020-06-01\n---\nUno").unwrap();
        fs::write(content.join("notas/index.md"), "---\ndate: 2020-06-02\n---\nDos").unwrap();
        fs::write(content.join("otra.md"), "Otra").unwrap();

        let source = FsPostSource {
            content_dir: content,
            markdown_extensions: vec!["md".to_string()],
            words_per_minute: 265,
            excerpt_length: 140,
        };
        let posts = source.posts().unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(duplicate_slugs(&posts), vec!["/notas/"]);
    }

    #[test]
    fn test_duplicate_slugs_empty_when_unique() {
        let posts = vec![
            summarize("/a/", "", 265, 140),
            summarize("/b/", "", 265, 140),
        ];
        assert!(duplicate_slugs(&posts).is_empty());
    }

    #[test]
    fn test_fs_source_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let source = FsPostSource {
            content_dir: dir.path().join("nowhere"),
            markdown_extensions: vec!["md".to_string()],
            words_per_minute: 265,
            excerpt_length: 140,
        };
        assert!(source.posts().unwrap().is_empty());
    }

    #[test]
    fn test_vec_source_sorts() {
        let posts = vec![
            summarize("/a/", "---\ndate: 2020-01-01\n---\n", 265, 140),
            summarize("/b/", "---\ndate: 2021-01-01\n---\n", 265, 140),
        ];
        let sorted = posts.posts().unwrap();
        assert_eq!(sorted[0].slug, "/b/");
    }
}
