// src/filler.rs
//! Placeholder resolution over a loaded document tree.
//!
//! Filling runs in passes. The first pass walks top-level paragraphs and
//! expands generated sections (skills, formation, hobbies, experiences) in
//! place of their tokens. The second pass re-checks for stragglers, expands
//! the bulleted lists and substitutes scalar tokens in body paragraphs. A
//! final pass substitutes text-only values inside table cells, where block
//! insertion is not possible. Each generated section is produced at most
//! once; the `FillOutcome` record tracks which ones were.

use tracing::debug;

use crate::document::{Block, Document, Paragraph, Run, RunStyle};
use crate::style::{StyleConfig, BULLET};
use crate::tables;
use crate::types::profile::defaults;
use crate::types::Profile;

pub const TOKEN_NOM_CONSULTANT: &str = "{{nom_consultant}}";
pub const TOKEN_TITRE_DU_POSTE: &str = "{{titre_du_poste}}";
pub const TOKEN_MOIS_DEBUT_EXPERIENCE: &str = "{{mois_debut_experience}}";
pub const TOKEN_NOM_ENTREPRISE: &str = "{{nom_entreprise}}";
pub const TOKEN_POINTS_FORTS: &str = "{{points_forts}}";
pub const TOKEN_NIVEAUX_INTERVENTION: &str = "{{niveaux_intervention}}";
pub const TOKEN_TABLEAU_FORMATION: &str = "{{tableau_formation}}";
pub const TOKEN_TABLEAU_CONNAISSANCES: &str = "{{tableau_connaissances}}";
pub const TOKEN_TABLEAU_HOBBIES: &str = "{{tableau_hobbies}}";
pub const TOKEN_TABLEAU_EXPERIENCES: &str = "{{tableau_experiences}}";

/// Every placeholder the filler understands, in resolution order.
pub const TOKENS: [&str; 10] = [
    TOKEN_NOM_CONSULTANT,
    TOKEN_TITRE_DU_POSTE,
    TOKEN_MOIS_DEBUT_EXPERIENCE,
    TOKEN_NOM_ENTREPRISE,
    TOKEN_POINTS_FORTS,
    TOKEN_NIVEAUX_INTERVENTION,
    TOKEN_TABLEAU_FORMATION,
    TOKEN_TABLEAU_CONNAISSANCES,
    TOKEN_TABLEAU_HOBBIES,
    TOKEN_TABLEAU_EXPERIENCES,
];

const TABLE_TOKENS: [&str; 4] = [
    TOKEN_TABLEAU_FORMATION,
    TOKEN_TABLEAU_CONNAISSANCES,
    TOKEN_TABLEAU_HOBBIES,
    TOKEN_TABLEAU_EXPERIENCES,
];

/// Which generated sections and lists were produced during a fill.
///
/// Generated content is created once per document even when its token
/// appears several times; later occurrences degrade to plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillOutcome {
    pub connaissances: bool,
    pub formation: bool,
    pub hobbies: bool,
    pub experiences: bool,
    pub points_forts: bool,
    pub niveaux_intervention: bool,
}

/// Resolve every recognized placeholder in `document` against `profile`.
/// Unrecognized `{{...}}` tokens are left untouched.
pub fn fill(document: &mut Document, profile: &Profile, style: &StyleConfig) -> FillOutcome {
    let mut outcome = FillOutcome::default();
    expand_sections(document, profile, style, &mut outcome);
    resolve_body(document, profile, style, &mut outcome);
    resolve_table_cells(document, profile);
    outcome
}

fn pending_table_token(text: &str, outcome: &FillOutcome) -> Option<&'static str> {
    if text.contains(TOKEN_TABLEAU_CONNAISSANCES) && !outcome.connaissances {
        Some(TOKEN_TABLEAU_CONNAISSANCES)
    } else if text.contains(TOKEN_TABLEAU_FORMATION) && !outcome.formation {
        Some(TOKEN_TABLEAU_FORMATION)
    } else if text.contains(TOKEN_TABLEAU_HOBBIES) && !outcome.hobbies {
        Some(TOKEN_TABLEAU_HOBBIES)
    } else if text.contains(TOKEN_TABLEAU_EXPERIENCES) && !outcome.experiences {
        Some(TOKEN_TABLEAU_EXPERIENCES)
    } else {
        None
    }
}

fn generate_section(token: &str, profile: &Profile, style: &StyleConfig) -> Vec<Block> {
    match token {
        TOKEN_TABLEAU_CONNAISSANCES => {
            vec![Block::Table(tables::skills_table(&profile.connaissances, style))]
        }
        TOKEN_TABLEAU_FORMATION => {
            vec![Block::Table(tables::formation_table(&profile.formations, style))]
        }
        TOKEN_TABLEAU_HOBBIES => vec![Block::Table(tables::hobbies_table(
            profile.hobbies_divers.as_ref(),
            style,
        ))],
        TOKEN_TABLEAU_EXPERIENCES => tables::experience_blocks(&profile.experiences, style),
        _ => Vec::new(),
    }
}

fn mark_resolved(token: &str, outcome: &mut FillOutcome) {
    match token {
        TOKEN_TABLEAU_CONNAISSANCES => outcome.connaissances = true,
        TOKEN_TABLEAU_FORMATION => outcome.formation = true,
        TOKEN_TABLEAU_HOBBIES => outcome.hobbies = true,
        TOKEN_TABLEAU_EXPERIENCES => outcome.experiences = true,
        _ => {}
    }
}

/// Clear `token` from the paragraph at `index` and splice the generated
/// blocks right after it. Returns how many blocks were inserted.
fn expand_at(
    document: &mut Document,
    index: usize,
    token: &'static str,
    profile: &Profile,
    style: &StyleConfig,
    outcome: &mut FillOutcome,
) -> usize {
    let blocks = generate_section(token, profile, style);
    mark_resolved(token, outcome);
    if let Block::Paragraph(p) = &mut document.body[index] {
        p.replace_text(token, "");
    }
    debug!(token, inserted = blocks.len(), "expanded generated section");
    let count = blocks.len();
    document.insert_after(index, blocks);
    count
}

fn expand_sections(
    document: &mut Document,
    profile: &Profile,
    style: &StyleConfig,
    outcome: &mut FillOutcome,
) {
    let mut i = 0;
    while i < document.body.len() {
        let Some(text) = document.body[i].as_paragraph().map(Paragraph::text) else {
            i += 1;
            continue;
        };
        match pending_table_token(&text, outcome) {
            Some(token) => i += expand_at(document, i, token, profile, style, outcome) + 1,
            None => i += 1,
        }
    }
}

fn resolve_body(
    document: &mut Document,
    profile: &Profile,
    style: &StyleConfig,
    outcome: &mut FillOutcome,
) {
    let mut i = 0;
    while i < document.body.len() {
        let Some(text) = document.body[i].as_paragraph().map(Paragraph::text) else {
            i += 1;
            continue;
        };

        // A section token that slipped through the first pass (inserted
        // content can shift paragraphs) still gets expanded here.
        if let Some(token) = pending_table_token(&text, outcome) {
            i += expand_at(document, i, token, profile, style, outcome) + 1;
            continue;
        }

        let mut inserted = 0;
        if text.contains(TOKEN_POINTS_FORTS) {
            inserted += resolve_list(
                document,
                i,
                TOKEN_POINTS_FORTS,
                &profile.points_forts,
                defaults::POINTS_FORTS,
                style,
                &mut outcome.points_forts,
            );
        }
        if let Some(text) = document.body[i].as_paragraph().map(Paragraph::text) {
            if text.contains(TOKEN_NIVEAUX_INTERVENTION) {
                inserted += resolve_list(
                    document,
                    i,
                    TOKEN_NIVEAUX_INTERVENTION,
                    &profile.niveaux_intervention,
                    defaults::NIVEAUX_INTERVENTION,
                    style,
                    &mut outcome.niveaux_intervention,
                );
            }
        }

        if let Block::Paragraph(p) = &mut document.body[i] {
            replace_accented(p, TOKEN_NOM_CONSULTANT, profile.nom_consultant(), style);
            replace_accented(p, TOKEN_TITRE_DU_POSTE, profile.titre_du_poste(), style);
            p.replace_text(TOKEN_MOIS_DEBUT_EXPERIENCE, profile.mois_debut_experience());
            p.replace_text(TOKEN_NOM_ENTREPRISE, profile.nom_entreprise());
        }
        i += inserted + 1;
    }
}

/// Expand a list token at `index`. The first occurrence turns the anchor
/// paragraph into a bullet for the first item and splices one bullet
/// paragraph per remaining item; later occurrences get the items as plain
/// joined text. Returns how many paragraphs were inserted.
fn resolve_list(
    document: &mut Document,
    index: usize,
    token: &str,
    items: &[String],
    fallback: &str,
    style: &StyleConfig,
    resolved: &mut bool,
) -> usize {
    if *resolved || items.is_empty() {
        let replacement = if items.is_empty() {
            fallback.to_string()
        } else {
            items.join(", ")
        };
        *resolved = true;
        if let Block::Paragraph(p) = &mut document.body[index] {
            p.replace_text(token, &replacement);
        }
        return 0;
    }
    *resolved = true;
    debug!(token, items = items.len(), "expanded bulleted list");
    if let Block::Paragraph(p) = &mut document.body[index] {
        p.replace_text(token, &format!("{BULLET}{}", items[0]));
        // A paragraph that is now a pure bullet gets the split glyph/text
        // styling; a token with surrounding text keeps its runs as-is.
        let text = p.text();
        if let Some(rest) = text.strip_prefix(BULLET) {
            *p = tables::bullet_paragraph(rest, style);
        }
    }
    let extra: Vec<Block> = items[1..]
        .iter()
        .map(|item| Block::Paragraph(tables::bullet_paragraph(item, style)))
        .collect();
    let count = extra.len();
    document.insert_after(index, extra);
    count
}

fn apply_accent(run_style: &mut RunStyle, style: &StyleConfig) {
    run_style.bold = true;
    run_style.color = Some(style.accent_color.clone());
    run_style.size = Some(style.scalar_size);
}

/// Scalar replacement that also promotes the carrying run to the accent
/// style (bold, brand color, 12 pt). Same in-run-first strategy as
/// `Paragraph::replace_text`.
fn replace_accented(
    paragraph: &mut Paragraph,
    token: &str,
    replacement: &str,
    style: &StyleConfig,
) -> bool {
    if !paragraph.contains(token) {
        return false;
    }
    for run in &mut paragraph.runs {
        if run.text.contains(token) {
            run.text = run.text.replace(token, replacement);
            apply_accent(&mut run.style, style);
            return true;
        }
    }
    let merged = paragraph.text().replace(token, replacement);
    paragraph.clear();
    let mut run = Run::new(merged);
    apply_accent(&mut run.style, style);
    paragraph.push_run(run);
    true
}

/// Inside pre-existing table cells only text can be substituted: scalars
/// keep their value, lists degrade to joined text, section tokens to
/// nothing.
fn resolve_table_cells(document: &mut Document, profile: &Profile) {
    let joined_points = join_or(&profile.points_forts, defaults::POINTS_FORTS);
    let joined_niveaux = join_or(&profile.niveaux_intervention, defaults::NIVEAUX_INTERVENTION);
    for block in &mut document.body {
        let Block::Table(table) = block else { continue };
        for row in &mut table.rows {
            for cell in &mut row.cells {
                for p in &mut cell.paragraphs {
                    p.replace_text(TOKEN_NOM_CONSULTANT, profile.nom_consultant());
                    p.replace_text(TOKEN_TITRE_DU_POSTE, profile.titre_du_poste());
                    p.replace_text(TOKEN_MOIS_DEBUT_EXPERIENCE, profile.mois_debut_experience());
                    p.replace_text(TOKEN_NOM_ENTREPRISE, profile.nom_entreprise());
                    p.replace_text(TOKEN_POINTS_FORTS, &joined_points);
                    p.replace_text(TOKEN_NIVEAUX_INTERVENTION, &joined_niveaux);
                    for token in TABLE_TOKENS {
                        p.replace_text(token, "");
                    }
                }
            }
        }
    }
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}
