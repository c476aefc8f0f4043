use std::{collections::BTreeMap, fs, path::Path};

use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::errors::TemplateError;

#[derive(Clone)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compiled defaults, overridden by any `*.html` found under `template_folder`.
    pub fn new(template_folder: Option<&Path>) -> Result<Self, TemplateError> {
        let mut sources: BTreeMap<String, String> = DEFAULT_TEMPLATES
            .iter()
            .map(|(name, tpl)| (name.to_string(), tpl.to_string()))
            .collect();

        if let Some(folder) = template_folder {
            for (name, body) in read_template_folder(folder)? {
                tracing::debug!("Using template {} from {}", name, folder.display());
                sources.insert(name, body);
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources.iter().map(|(n, b)| (n.as_str(), b.as_str())))
            .map_err(|e| TemplateError::InitFailed {
                path: template_folder
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| "<builtin>".into()),
                source: e,
            })?;

        Ok(Templates { tera })
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, TemplateError> {
        self.tera
            .render(template_name, context)
            .map_err(|e| TemplateError::RenderFailed {
                template_name: template_name.to_string(),
                source: e,
            })
    }
}

fn read_template_folder(folder: &Path) -> Result<Vec<(String, String)>, TemplateError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(folder).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "html") {
            continue;
        }
        let name = path
            .strip_prefix(folder)
            .unwrap_or(path)
            .to_str()
            .ok_or(TemplateError::InvalidPathEncoding)?
            .replace('\\', "/");
        let body = fs::read_to_string(path).map_err(|e| TemplateError::InitFailed {
            path: path.to_path_buf(),
            source: tera::Error::msg(e.to_string()),
        })?;
        found.push((name, body));
    }
    Ok(found)
}

pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("seo.html", include_str!("../templates/seo.html")),
    ("bio.html", include_str!("../templates/bio.html")),
    ("dark_mode.html", include_str!("../templates/dark_mode.html")),
    ("index.html", include_str!("../templates/index.html")),
];
