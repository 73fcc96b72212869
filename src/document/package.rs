// src/document/package.rs
//! Open XML package (.docx) load and save.
//!
//! A package is a zip archive; every part except `word/document.xml` is
//! carried as opaque bytes and written back verbatim. The document part is
//! re-serialized from the tree on save. Part order and zip timestamps are
//! fixed so the same tree always yields the same bytes on disk.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::xml::{parse_document, write_document};
use super::Document;

pub const DOCUMENT_PART: &str = "word/document.xml";

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const RELS_PART: &str = "_rels/.rels";

const MINIMAL_CONTENT_TYPES: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    "<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>",
    "</Types>"
);

const MINIMAL_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>",
    "</Relationships>"
);

/// A loaded .docx package: the parsed document tree plus every other part
/// of the archive, untouched.
pub struct DocxPackage {
    parts: BTreeMap<String, Vec<u8>>,
    pub document: Document,
}

impl DocxPackage {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read template file: {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Failed to open template: {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).context("Not a valid .docx (zip) archive")?;
        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .context("Corrupt entry in .docx archive")?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .with_context(|| format!("Failed to read part: {name}"))?;
            parts.insert(name, data);
        }
        let Some(doc_bytes) = parts.get(DOCUMENT_PART) else {
            bail!("Archive has no {DOCUMENT_PART} part");
        };
        let xml = std::str::from_utf8(doc_bytes).context("Document part is not valid UTF-8")?;
        let document = parse_document(xml)?;
        Ok(Self { parts, document })
    }

    /// Build a minimal single-part package around `document`. Used for
    /// generated output and in tests; real templates come through `load`.
    pub fn from_document(document: Document) -> Self {
        let mut parts = BTreeMap::new();
        parts.insert(
            CONTENT_TYPES_PART.to_string(),
            MINIMAL_CONTENT_TYPES.as_bytes().to_vec(),
        );
        parts.insert(RELS_PART.to_string(), MINIMAL_RELS.as_bytes().to_vec());
        parts.insert(DOCUMENT_PART.to_string(), Vec::new());
        Self { parts, document }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let doc_bytes = write_document(&self.document)?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        // Fixed timestamp keeps output byte-identical across runs.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        for (name, data) in &self.parts {
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to start archive entry: {name}"))?;
            let payload = if name == DOCUMENT_PART {
                doc_bytes.as_slice()
            } else {
                data.as_slice()
            };
            writer
                .write_all(payload)
                .with_context(|| format!("Failed to write archive entry: {name}"))?;
        }
        let cursor = writer.finish().context("Failed to finalize .docx archive")?;
        Ok(cursor.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Paragraph, Run};

    fn sample_package() -> DocxPackage {
        let mut doc = Document::new();
        doc.body
            .push(Block::Paragraph(Paragraph::with_run(Run::new("Bonjour"))));
        DocxPackage::from_document(doc)
    }

    #[test]
    fn test_package_bytes_start_with_zip_magic() {
        let bytes = sample_package().to_bytes().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_package_round_trip_preserves_document() {
        let package = sample_package();
        let bytes = package.to_bytes().unwrap();
        let reloaded = DocxPackage::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.document, package.document);
        assert!(reloaded.parts.contains_key(CONTENT_TYPES_PART));
        assert!(reloaded.parts.contains_key(RELS_PART));
    }

    #[test]
    fn test_package_output_is_deterministic() {
        let package = sample_package();
        assert_eq!(package.to_bytes().unwrap(), package.to_bytes().unwrap());
    }

    #[test]
    fn test_save_and_load_via_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let package = sample_package();
        package.save(&path).unwrap();
        let reloaded = DocxPackage::load(&path).unwrap();
        assert_eq!(reloaded.document.text(), "Bonjour");
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(DocxPackage::from_bytes(b"not a zip archive").is_err());
    }
}
