use super::workbook::Workbook;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Template used by the license compliance report
pub const LMS_TEMPLATE: &str = "template_lms.json";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed template {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of pre-formatted report workbooks
pub trait TemplateStore: Send + Sync {
    fn open(&self, name: &str) -> Result<Workbook, TemplateError>;
}

/// Reads templates from `<resources>/templates/`
pub struct FsTemplateStore {
    templates_dir: PathBuf,
}

impl FsTemplateStore {
    pub fn new(resource_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: resource_path.into().join("templates"),
        }
    }
}

impl TemplateStore for FsTemplateStore {
    fn open(&self, name: &str) -> Result<Workbook, TemplateError> {
        let path = self.templates_dir.join(name);
        debug!("Opening template {:?}", path);

        let content = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| TemplateError::Malformed { path, source })
    }
}
