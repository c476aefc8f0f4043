//! Centralized error types for cafecito.
//!
//! The view components themselves never fail; these cover the layers around
//! them (config loading, the posts data source, templates and output).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the cafecito binary and library entry points.
#[derive(Debug, Error)]
pub enum CafecitoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Posts error: {0}")]
    Posts(#[from] PostsError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Errors related to configuration loading and parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration parsing failed")]
    ParseFailed(Box<figment::Error>),

    #[error("Failed to canonicalize path: {path}")]
    CanonicalizeFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template folder is not a directory: {}", path.display())]
    TemplateFolderNotDirectory { path: PathBuf },

    #[error("Invalid minutes_per_glyph: {value}. Must be greater than 0")]
    InvalidMinutesPerGlyph { value: f64 },

    #[error("Invalid words_per_minute: {value}. Must be greater than 0")]
    InvalidWordsPerMinute { value: usize },
}

/// Errors raised while collecting post summaries.
#[derive(Debug, Error)]
pub enum PostsError {
    #[error("Failed to scan content folder: {path}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read post: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to template rendering.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to initialize templates from: {path}")]
    InitFailed {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to render template: {template_name}")]
    RenderFailed {
        template_name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Invalid path encoding")]
    InvalidPathEncoding,
}

/// Errors writing the rendered page.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create output directory: {path}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
