// src/utils.rs
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Normalize a consultant name for file system usage
pub fn normalize_consultant_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build default output file path for a generated CV
pub fn output_file_path(base: &Path, consultant: &str) -> PathBuf {
    base.join(format!(
        "cv_{}_{}.docx",
        normalize_consultant_name(consultant),
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_consultant_name() {
        assert_eq!(normalize_consultant_name("John Doe"), "john_doe");
        assert_eq!(normalize_consultant_name("jean-paul"), "jean-paul");
        assert_eq!(normalize_consultant_name("Marie@Company"), "marie_company");
    }

    #[test]
    fn test_output_file_path_shape() {
        let path = output_file_path(Path::new("/tmp"), "A. Dupont");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("cv_a__dupont_"));
        assert!(name.ends_with(".docx"));
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.docx"), Some("docx".to_string()));
        assert_eq!(
            get_file_extension("document.DOCX"),
            Some("docx".to_string())
        );
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("test.docx", &["docx"]).is_ok());
        assert!(validate_file_extension("test.txt", &["docx"]).is_err());
        assert!(validate_file_extension("noext", &["docx"]).is_err());
    }
}
