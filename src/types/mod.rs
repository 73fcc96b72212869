// src/types/mod.rs
pub mod profile;

pub use profile::{Experience, Formation, Hobbies, Profile};
