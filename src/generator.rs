// src/generator.rs
//! High-level CV generation: template in, filled document out.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use crate::document::package::DocxPackage;
use crate::extractor::extract_profile_json;
use crate::filler::{fill, FillOutcome};
use crate::style::StyleConfig;
use crate::types::Profile;

/// Fills CV templates with a configured visual style.
pub struct CvGenerator {
    style: StyleConfig,
}

impl CvGenerator {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Fill an in-memory template and return the produced document bytes.
    pub fn fill_bytes(&self, template: &[u8], profile: &Profile) -> Result<(Vec<u8>, FillOutcome)> {
        let mut package = DocxPackage::from_bytes(template)?;
        let outcome = fill(&mut package.document, profile, &self.style);
        Ok((package.to_bytes()?, outcome))
    }

    /// Fill a template file and write the result to `output`.
    pub fn generate(&self, template: &Path, profile: &Profile, output: &Path) -> Result<FillOutcome> {
        info!(
            template = %template.display(),
            consultant = profile.nom_consultant(),
            "generating CV"
        );
        let mut package = DocxPackage::load(template)?;
        let outcome = fill(&mut package.document, profile, &self.style);
        package.save(output)?;
        info!(output = %output.display(), ?outcome, "CV written");
        Ok(outcome)
    }
}

impl Default for CvGenerator {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}

/// Turn raw input (clean JSON or a full AI response) into a profile.
/// Unrecoverable input degrades to an empty profile, so generation still
/// produces a document filled with placeholder defaults.
pub fn parse_profile_input(input: &str) -> Profile {
    match extract_profile_json(input) {
        Some(value) => Profile::from_value(&value),
        None => {
            warn!("no profile data recoverable from input, using defaults");
            Profile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Document, Paragraph, Run};
    use serde_json::json;

    fn template_bytes() -> Vec<u8> {
        let mut doc = Document::new();
        for line in [
            "{{nom_consultant}}",
            "{{titre_du_poste}}",
            "Points forts :",
            "{{points_forts}}",
            "Connaissances :",
            "{{tableau_connaissances}}",
        ] {
            doc.body
                .push(Block::Paragraph(Paragraph::with_run(Run::new(line))));
        }
        DocxPackage::from_document(doc).to_bytes().unwrap()
    }

    #[test]
    fn test_end_to_end_fill() {
        let profile = Profile::from_value(&json!({
            "nom_consultant": "A. Dupont",
            "points_forts": ["Rigueur", "Autonomie"],
            "connaissances": {"Langages": "Python, Go"}
        }));
        let generator = CvGenerator::default();
        let (bytes, outcome) = generator.fill_bytes(&template_bytes(), &profile).unwrap();

        assert!(outcome.connaissances);
        assert!(outcome.points_forts);

        let package = DocxPackage::from_bytes(&bytes).unwrap();
        let text = package.document.text();
        assert!(text.contains("A. Dupont"));
        assert!(text.contains("Titre du poste"));
        assert!(text.contains("Rigueur"));
        assert!(text.contains("Autonomie"));
        assert!(text.contains("Python, Go"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let profile = parse_profile_input(r#"{"nom_consultant": "A. Dupont"}"#);
        let generator = CvGenerator::default();
        let template = template_bytes();
        let (a, _) = generator.fill_bytes(&template, &profile).unwrap();
        let (b, _) = generator.fill_bytes(&template, &profile).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.docx");
        let output_path = dir.path().join("out.docx");
        std::fs::write(&template_path, template_bytes()).unwrap();

        let profile = parse_profile_input("réponse inutilisable");
        let outcome = CvGenerator::default()
            .generate(&template_path, &profile, &output_path)
            .unwrap();
        assert!(outcome.connaissances);

        let package = DocxPackage::load(&output_path).unwrap();
        assert!(package.document.text().contains("Nom du consultant"));
        assert!(package.document.text().contains("Points forts à définir"));
    }

    #[test]
    fn test_invalid_template_is_an_error() {
        let generator = CvGenerator::default();
        let profile = Profile::default();
        assert!(generator.fill_bytes(b"garbage", &profile).is_err());
    }
}
