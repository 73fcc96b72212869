// src/extractor.rs
//! Best-effort recovery of a profile JSON object from raw AI output.
//!
//! Model responses arrive in many shapes: clean JSON, a fenced code block,
//! a `content='...'` API dump, or JSON drowned in prose. Candidates are
//! tried from most to least structured; each regex capture goes through an
//! escape cleanup before parsing. When no candidate parses, a field-by-field
//! scan salvages whatever scalar values it can. Only a fully unusable
//! response yields `None`.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?s)content='(\{.*?\})'",
        r"(?s)```json\s*(\{.*?\})\s*```",
        r"(?s)```\s*(\{.*?\})\s*```",
        r#"(?s)(\{[^{}]*"nom_consultant"[^}]*\})"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const FIELDS: [&str; 10] = [
    "nom_consultant",
    "titre_du_poste",
    "niveaux_intervention",
    "hobbies_divers",
    "connaissances",
    "experiences",
    "mois_debut_experience",
    "nom_entreprise",
    "points_forts",
    "formations",
];

/// Pull the first parseable JSON value out of `response`.
pub fn extract_profile_json(response: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(response.trim()) {
        return Some(value);
    }

    for pattern in PATTERNS.iter() {
        let Some(capture) = pattern.captures(response) else {
            continue;
        };
        let candidate = cleanup(&capture[1]);
        match serde_json::from_str(&candidate) {
            Ok(value) => {
                debug!(pattern = pattern.as_str(), "recovered JSON candidate");
                return Some(value);
            }
            Err(err) => {
                debug!(pattern = pattern.as_str(), %err, "candidate did not parse");
            }
        }
    }

    extract_fields_manually(response)
}

/// Undo the escaping layers a stringified API response accumulates.
fn cleanup(candidate: &str) -> String {
    let unescaped = candidate
        .replace("\\\\", "\\")
        .replace("\\'", "'")
        .replace("\\n", "\n");
    repair_invalid_escapes(&unescaped)
}

/// Double every backslash that does not start a valid JSON escape, so
/// stray Windows paths and the like survive parsing.
fn repair_invalid_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&next @ ('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u')) => {
                out.push('\\');
                out.push(next);
                chars.next();
            }
            _ => out.push_str("\\\\"),
        }
    }
    out
}

/// Last resort: scan for each known field as a quoted string value and
/// build a flat string map from whatever is found.
fn extract_fields_manually(response: &str) -> Option<Value> {
    let mut map = serde_json::Map::new();
    for field in FIELDS {
        let pattern = format!(r#"(?s)"{field}":\s*"([^"]*(?:\\.[^"]*)*)""#);
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(capture) = re.captures(response) {
            let value = capture[1]
                .replace("\\\"", "\"")
                .replace("\\n", "\n")
                .replace("\\'", "'");
            map.insert(field.to_string(), Value::String(value));
        }
    }
    if map.is_empty() {
        debug!("no profile fields recoverable from response");
        None
    } else {
        debug!(fields = map.len(), "recovered fields by manual scan");
        Some(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_json_parses() {
        let value = extract_profile_json(r#"{"nom_consultant": "A. Dupont"}"#).unwrap();
        assert_eq!(value["nom_consultant"], json!("A. Dupont"));
    }

    #[test]
    fn test_content_wrapper_with_escaped_quotes() {
        let response =
            r#"ChatCompletionMessage(content='{"nom_consultant": "L\'Haridon"}', role='assistant')"#;
        let value = extract_profile_json(response).unwrap();
        assert_eq!(value["nom_consultant"], json!("L'Haridon"));
    }

    #[test]
    fn test_json_code_fence() {
        let response = "Voici le profil :\n```json\n{\"titre_du_poste\": \"Architecte\"}\n```\nBonne journée.";
        let value = extract_profile_json(response).unwrap();
        assert_eq!(value["titre_du_poste"], json!("Architecte"));
    }

    #[test]
    fn test_bare_code_fence() {
        let response = "```\n{\"nom_entreprise\": \"Acme\"}\n```";
        let value = extract_profile_json(response).unwrap();
        assert_eq!(value["nom_entreprise"], json!("Acme"));
    }

    #[test]
    fn test_object_scan_around_known_key() {
        let response = "blabla {\"nom_consultant\": \"A. Dupont\", \"titre_du_poste\": \"Dev\"} blabla";
        let value = extract_profile_json(response).unwrap();
        assert_eq!(value["titre_du_poste"], json!("Dev"));
    }

    #[test]
    fn test_invalid_escape_is_repaired() {
        let response = "```json\n{\"nom_consultant\": \"C:\\Consultants\\Dupont\"}\n```";
        let value = extract_profile_json(response).unwrap();
        assert_eq!(value["nom_consultant"], json!("C:\\Consultants\\Dupont"));
    }

    #[test]
    fn test_manual_fallback_on_broken_json() {
        // Unbalanced braces defeat every structural pattern.
        let response = r#"{"nom_consultant": "A. Dupont", "titre_du_poste": "Dev", "experiences": [{"#;
        let value = extract_profile_json(response).unwrap();
        assert_eq!(value["nom_consultant"], json!("A. Dupont"));
        assert_eq!(value["titre_du_poste"], json!("Dev"));
        assert!(value.get("experiences").is_none());
    }

    #[test]
    fn test_unusable_response_yields_none() {
        assert!(extract_profile_json("désolé, je ne peux pas répondre").is_none());
    }

    #[test]
    fn test_repair_keeps_valid_escapes() {
        assert_eq!(repair_invalid_escapes(r#"a\nb\"c\\d"#), r#"a\nb\"c\\d"#);
        assert_eq!(repair_invalid_escapes(r"C:\Users"), r"C:\\Users");
    }
}
