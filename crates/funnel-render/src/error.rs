use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("failed to load templates from {dir}: {detail}")]
    TemplateLoad {
        dir: String,
        detail: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render {stage}_{variant}: {detail}")]
    Template {
        stage: String,
        variant: String,
        detail: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to build template context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("browser screenshot failed: {0}")]
    Browser(String),

    #[error("failed to build image scene: {0}")]
    Scene(#[from] usvg::Error),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl RenderError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Flatten a tera error and its causes into one line.
///
/// Tera's top-level message only names the template; the useful part
/// (undefined variable, syntax error) lives in the source chain.
pub(crate) fn describe_tera(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
