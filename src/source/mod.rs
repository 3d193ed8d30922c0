// src/source/mod.rs
// =============================================================================
// This module loads the markup the user wants to edit.
//
// Currently supports:
// - A local file path
// - Standard input ("-")
// - A remote page fetched over HTTP(S)
//
// Whatever we load is handed to the link engine unmodified.
// =============================================================================

mod fetch;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

pub use fetch::fetch_document;

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Stdin,
    File(String),
    Remote(String),
}

impl DocumentSource {
    /// Builds a source from the CLI arguments. A URL wins over a path.
    pub fn from_args(input: Option<&str>, url: Option<&str>) -> Self {
        match (url, input) {
            (Some(url), _) => DocumentSource::Remote(url.to_string()),
            (None, Some(path)) if path != "-" => DocumentSource::File(path.to_string()),
            _ => DocumentSource::Stdin,
        }
    }
}

/// Reads the whole document from its source
pub async fn load_document(source: &DocumentSource, timeout: Duration) -> Result<String> {
    match source {
        DocumentSource::Stdin => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read document from stdin")?;
            Ok(content)
        }
        DocumentSource::File(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read document from {}", path)),
        DocumentSource::Remote(url) => fetch_document(url, timeout).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_from_args() {
        assert_eq!(DocumentSource::from_args(None, None), DocumentSource::Stdin);
        assert_eq!(DocumentSource::from_args(Some("-"), None), DocumentSource::Stdin);
        assert_eq!(
            DocumentSource::from_args(Some("mail.html"), None),
            DocumentSource::File("mail.html".to_string())
        );
        assert_eq!(
            DocumentSource::from_args(Some("mail.html"), Some("https://x.test/mail.html")),
            DocumentSource::Remote("https://x.test/mail.html".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_document_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mail.html");
        std::fs::write(&path, r#"<a href="https://x.test">x</a>"#).unwrap();

        let source = DocumentSource::File(path.to_string_lossy().into_owned());
        let content = load_document(&source, Duration::from_secs(1)).await.unwrap();
        assert_eq!(content, r#"<a href="https://x.test">x</a>"#);
    }

    #[tokio::test]
    async fn test_load_document_missing_file() {
        let source = DocumentSource::File("/definitely/not/here.html".to_string());
        let err = load_document(&source, Duration::from_secs(1)).await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.html"));
    }
}
