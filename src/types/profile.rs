// src/types/profile.rs
//! Consultant profile extracted from AI output.
//!
//! Decoding is deliberately lenient: AI responses routinely miss fields,
//! send numbers where strings are expected, or wrap a single value in an
//! array. Anything that cannot be coerced is treated as absent; the filler
//! substitutes a placeholder default instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod defaults {
    pub const NOM_CONSULTANT: &str = "Nom du consultant";
    pub const TITRE_DU_POSTE: &str = "Titre du poste";
    pub const MOIS_DEBUT_EXPERIENCE: &str = "Date";
    pub const NOM_ENTREPRISE: &str = "Entreprise";
    pub const POINTS_FORTS: &str = "Points forts à définir";
    pub const NIVEAUX_INTERVENTION: &str = "Niveaux d'intervention à définir";
    pub const FORMATION_ANNEE: &str = "2024";
    pub const FORMATION_INTITULE: &str = "Formation à définir";
    pub const LANGUES: &str = "Français, Anglais (intermédiaire)";
    pub const HOBBIES: &str = "À définir";

    /// Skill table shown when the profile carries no connaissances.
    pub const CONNAISSANCES: [(&str, &str); 6] = [
        (
            "Langages et Framework",
            ".NET (C#, ASP.NET), MVC, WEB API, ANGULAR, TYPESCRIPT",
        ),
        ("SGBD", "MYSQL, POSTGRESQL, MONGODB, SQL Serveur"),
        ("Systèmes d'exploitation", "Linux (Ubuntu), Windows"),
        ("Outils", "VsCode, GIT, GitHub, Visual studio"),
        ("DevOps et Cloud", "DOCKER, KUBERNETES, CI/CD Devops"),
        ("Méthodologie", "Agile SCRUM"),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub annee: String,
    pub intitule: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hobbies {
    pub langues: Option<String>,
    pub hobbies: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub periode: Option<String>,
    pub titre: Option<String>,
    pub entreprise: Option<String>,
    pub responsabilites: Option<String>,
    #[serde(default)]
    pub realisations: Vec<String>,
    pub environnement: Option<String>,
}

impl Experience {
    pub fn placeholder() -> Self {
        Self {
            periode: Some("Période".to_string()),
            titre: Some("Titre".to_string()),
            entreprise: Some("Entreprise".to_string()),
            responsabilites: Some("Responsabilités à définir".to_string()),
            realisations: vec!["Réalisation à définir".to_string()],
            environnement: Some("Environnement à définir".to_string()),
        }
    }
}

/// Everything the template filler can substitute, in one record.
///
/// Scalar accessors of the same name return the field or its placeholder
/// default, so callers never see an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub nom_consultant: Option<String>,
    pub titre_du_poste: Option<String>,
    pub mois_debut_experience: Option<String>,
    pub nom_entreprise: Option<String>,
    #[serde(default)]
    pub points_forts: Vec<String>,
    #[serde(default)]
    pub niveaux_intervention: Vec<String>,
    #[serde(default)]
    pub formations: Vec<Formation>,
    /// Skill category → comma-joined skills, in source order.
    #[serde(default)]
    pub connaissances: Vec<(String, String)>,
    pub hobbies_divers: Option<Hobbies>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

impl Profile {
    /// Decode a profile from arbitrary JSON, coercing what can be coerced
    /// and dropping the rest. A non-object value yields an empty profile.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            nom_consultant: map.get("nom_consultant").and_then(coerce_text),
            titre_du_poste: map.get("titre_du_poste").and_then(coerce_text),
            mois_debut_experience: map.get("mois_debut_experience").and_then(coerce_text),
            nom_entreprise: map.get("nom_entreprise").and_then(coerce_text),
            points_forts: coerce_list(map.get("points_forts")),
            niveaux_intervention: coerce_list(map.get("niveaux_intervention")),
            formations: coerce_formations(map.get("formations")),
            connaissances: coerce_connaissances(map.get("connaissances")),
            hobbies_divers: coerce_hobbies(map.get("hobbies_divers")),
            experiences: coerce_experiences(map.get("experiences")),
        }
    }

    pub fn nom_consultant(&self) -> &str {
        non_empty(&self.nom_consultant).unwrap_or(defaults::NOM_CONSULTANT)
    }

    pub fn titre_du_poste(&self) -> &str {
        non_empty(&self.titre_du_poste).unwrap_or(defaults::TITRE_DU_POSTE)
    }

    pub fn mois_debut_experience(&self) -> &str {
        non_empty(&self.mois_debut_experience).unwrap_or(defaults::MOIS_DEBUT_EXPERIENCE)
    }

    pub fn nom_entreprise(&self) -> &str {
        non_empty(&self.nom_entreprise).unwrap_or(defaults::NOM_ENTREPRISE)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// String, number, or array of those joined with ", ".
fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(coerce_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Only a JSON array counts as a list; other shapes are treated as absent.
fn coerce_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(coerce_text).collect())
        .unwrap_or_default()
}

fn coerce_formations(value: Option<&Value>) -> Vec<Formation> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let map = item.as_object()?;
            let annee = map.get("annee").and_then(coerce_text);
            let intitule = map.get("intitule").and_then(coerce_text);
            if annee.is_none() && intitule.is_none() {
                return None;
            }
            Some(Formation {
                annee: annee.unwrap_or_default(),
                intitule: intitule.unwrap_or_default(),
            })
        })
        .collect()
}

fn coerce_connaissances(value: Option<&Value>) -> Vec<(String, String)> {
    let Some(map) = value.and_then(Value::as_object) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(category, skills)| Some((category.clone(), coerce_text(skills)?)))
        .collect()
}

fn coerce_hobbies(value: Option<&Value>) -> Option<Hobbies> {
    let map = value?.as_object()?;
    Some(Hobbies {
        langues: map.get("langues").and_then(coerce_text),
        hobbies: map.get("hobbies").and_then(coerce_text),
    })
}

fn coerce_experiences(value: Option<&Value>) -> Vec<Experience> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let map = item.as_object()?;
            Some(Experience {
                periode: map.get("periode").and_then(coerce_text),
                titre: map.get("titre").and_then(coerce_text),
                entreprise: map.get("entreprise").and_then(coerce_text),
                responsabilites: map.get("responsabilites").and_then(coerce_text),
                realisations: coerce_list(map.get("realisations")),
                environnement: map.get("environnement").and_then(coerce_text),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_profile() {
        let value = json!({
            "nom_consultant": "A. Dupont",
            "titre_du_poste": "Architecte logiciel",
            "mois_debut_experience": "Janvier 2015",
            "nom_entreprise": "Clinkast",
            "points_forts": ["Rigueur", "Autonomie"],
            "niveaux_intervention": ["Conception", "Développement"],
            "formations": [{"annee": 2018, "intitule": "Master Informatique"}],
            "connaissances": {"Langages et Framework": "Rust, Go", "SGBD": "PostgreSQL"},
            "hobbies_divers": {"langues": "Français, Anglais", "hobbies": "Escalade"},
            "experiences": [{
                "periode": "2020 - 2024",
                "titre": "Lead dev",
                "entreprise": "Acme",
                "responsabilites": "Encadrement de l'équipe",
                "realisations": ["Migration cloud"],
                "environnement": "Rust, Kubernetes"
            }]
        });
        let profile = Profile::from_value(&value);
        assert_eq!(profile.nom_consultant(), "A. Dupont");
        assert_eq!(profile.points_forts, vec!["Rigueur", "Autonomie"]);
        assert_eq!(profile.formations[0].annee, "2018");
        assert_eq!(
            profile.connaissances,
            vec![
                ("Langages et Framework".to_string(), "Rust, Go".to_string()),
                ("SGBD".to_string(), "PostgreSQL".to_string()),
            ]
        );
        assert_eq!(profile.experiences[0].realisations, vec!["Migration cloud"]);
    }

    #[test]
    fn test_connaissances_keeps_source_order() {
        let value = json!({"connaissances": {"Z": "z", "A": "a", "M": "m"}});
        let profile = Profile::from_value(&value);
        let categories: Vec<&str> = profile
            .connaissances
            .iter()
            .map(|(c, _)| c.as_str())
            .collect();
        assert_eq!(categories, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_scalar_accessors_fall_back_to_defaults() {
        let profile = Profile::from_value(&json!({"nom_consultant": "   "}));
        assert_eq!(profile.nom_consultant(), defaults::NOM_CONSULTANT);
        assert_eq!(profile.titre_du_poste(), defaults::TITRE_DU_POSTE);
        assert_eq!(profile.mois_debut_experience(), defaults::MOIS_DEBUT_EXPERIENCE);
        assert_eq!(profile.nom_entreprise(), defaults::NOM_ENTREPRISE);
    }

    #[test]
    fn test_non_array_list_is_treated_as_absent() {
        let value = json!({"points_forts": "Rigueur\nAutonomie"});
        let profile = Profile::from_value(&value);
        assert!(profile.points_forts.is_empty());
    }

    #[test]
    fn test_mis_shaped_values_are_dropped() {
        let value = json!({
            "nom_consultant": {"unexpected": "object"},
            "formations": [{"notes": "no usable keys"}, {"annee": "2022"}],
            "connaissances": {"Outils": ["Git", "Docker"], "SGBD": null},
            "experiences": ["not an object"]
        });
        let profile = Profile::from_value(&value);
        assert!(profile.nom_consultant.is_none());
        assert_eq!(profile.formations.len(), 1);
        assert_eq!(profile.formations[0].annee, "2022");
        assert_eq!(
            profile.connaissances,
            vec![("Outils".to_string(), "Git, Docker".to_string())]
        );
        assert!(profile.experiences.is_empty());
    }

    #[test]
    fn test_non_object_value_yields_empty_profile() {
        assert_eq!(Profile::from_value(&json!("texte libre")), Profile::default());
        assert_eq!(Profile::from_value(&json!(null)), Profile::default());
    }
}
