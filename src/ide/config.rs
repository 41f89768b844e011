use crate::syntax::FormatOptions;

/// Host-tunable settings for generated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistConfig {
    pub format: FormatOptions,
    /// Extension appended to every generated file stem, dot included.
    pub file_extension: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            file_extension: ".cs".to_string(),
        }
    }
}
