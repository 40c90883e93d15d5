use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FileKind;

/// Result of classifying a URL by its file extension.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FileTypeDescriptor {
    pub kind: FileKind,
    pub display_name: String,
    pub filename: String,
}

impl FileTypeDescriptor {
    #[must_use]
    pub fn unknown(filename: &str) -> Self {
        Self {
            kind: FileKind::Unknown,
            display_name: "Archivo".to_string(),
            filename: filename.to_string(),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.kind == FileKind::Unknown
    }

    /// `📄 Documento PDF: informe.pdf`
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{} {}: {}",
            self.kind.emoji(),
            self.display_name,
            self.filename
        )
    }

    #[must_use]
    pub fn render_bracketed(&self) -> String {
        format!("[{}]", self.render())
    }
}
