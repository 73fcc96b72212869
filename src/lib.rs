// src/lib.rs
//! CV generation by template filling.
//!
//! A Word template carries `{{token}}` placeholders; a consultant profile
//! (usually recovered from an AI response) provides the values. Filling
//! substitutes scalars in place, expands bulleted lists, and splices
//! generated tables and experience blocks into the document body. Missing
//! profile data degrades to placeholder defaults, never to an error.

pub mod document;
pub mod extractor;
pub mod filler;
pub mod generator;
pub mod style;
pub mod tables;
pub mod types;
pub mod utils;

pub use document::package::DocxPackage;
pub use filler::{fill, FillOutcome, TOKENS};
pub use generator::{parse_profile_input, CvGenerator};
pub use style::StyleConfig;
pub use types::Profile;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// One-call generation: fill `template` with a profile decoded from `input`
/// (clean JSON or a raw AI response) using the default style.
pub fn generate_cv(template: &[u8], input: &str) -> anyhow::Result<Vec<u8>> {
    let profile = parse_profile_input(input);
    let (bytes, _) = CvGenerator::default().fill_bytes(template, &profile)?;
    Ok(bytes)
}
