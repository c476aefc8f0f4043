//! Slug derivation and post URL resolution.

use std::path::{Component, Path};

/// Derives a post slug from its path relative to the content folder.
///
/// `hello-world/index.md` becomes `/hello-world/` and `notes.md` becomes
/// `/notes/`. Index files at the top level map to `/`. Those two forms can
/// collide; see [`crate::posts::duplicate_slugs`].
pub fn slug_for(relative_path: &Path, index_stem: &str) -> String {
    let mut segments: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(last);
        if stem != index_stem {
            segments.push(stem);
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Joins a base path and a slug with exactly one `/` between them.
pub fn post_url(base_path: &str, slug: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let slug = slug.trim_start_matches('/');
    format!("{base}/{slug}")
}
