// src/tables.rs
//! Builders for the generated parts of a CV: skills, formation and hobbies
//! tables, bullet paragraphs, and the per-experience block sequence.
//!
//! Layout constants (column widths, fills, the header row shape) follow the
//! house template. Every builder substitutes its placeholder content when
//! the profile has nothing usable, so generated sections are never empty.

use crate::document::{
    Block, Justification, Paragraph, ParagraphProps, Run, RunStyle, Table, TableCell, TableRow,
};
use crate::style::{StyleConfig, BULLET};
use crate::types::profile::defaults;
use crate::types::{Experience, Formation, Hobbies};

const TABLE_STYLE: &str = "TableGrid";
const FULL_WIDTH: u32 = 5000;
const SKILLS_LABEL_WIDTH: u32 = 2000;
const SKILLS_CONTENT_WIDTH: u32 = 3000;
const LABEL_WIDTH: u32 = 1500;
const CONTENT_WIDTH: u32 = 3500;
const ACHIEVEMENT_INDENT: u32 = 360;
const BLOCK_SPACING: u32 = 240;

fn left_aligned() -> ParagraphProps {
    ParagraphProps {
        justification: Some(Justification::Left),
        ..Default::default()
    }
}

fn cell(width: u32, run: Run) -> TableCell {
    TableCell {
        width: Some(width),
        paragraphs: vec![Paragraph {
            props: left_aligned(),
            runs: vec![run],
        }],
        ..Default::default()
    }
}

fn two_column_row(
    label: &str,
    content: &str,
    label_width: u32,
    content_width: u32,
    style: &StyleConfig,
) -> TableRow {
    TableRow {
        cells: vec![
            cell(label_width, Run::styled(label, style.label())),
            cell(content_width, Run::styled(content, style.content())),
        ],
    }
}

fn two_column_table(rows: Vec<TableRow>) -> Table {
    Table {
        style: Some(TABLE_STYLE.to_string()),
        width: Some(FULL_WIDTH),
        rows,
    }
}

/// Category → skills table, one row per category in source order.
pub fn skills_table(connaissances: &[(String, String)], style: &StyleConfig) -> Table {
    let rows: Vec<TableRow> = if connaissances.is_empty() {
        defaults::CONNAISSANCES
            .iter()
            .map(|(categorie, contenu)| {
                two_column_row(categorie, contenu, SKILLS_LABEL_WIDTH, SKILLS_CONTENT_WIDTH, style)
            })
            .collect()
    } else {
        connaissances
            .iter()
            .map(|(categorie, contenu)| {
                two_column_row(categorie, contenu, SKILLS_LABEL_WIDTH, SKILLS_CONTENT_WIDTH, style)
            })
            .collect()
    };
    two_column_table(rows)
}

/// Year → degree table.
pub fn formation_table(formations: &[Formation], style: &StyleConfig) -> Table {
    let fallback = [Formation {
        annee: defaults::FORMATION_ANNEE.to_string(),
        intitule: defaults::FORMATION_INTITULE.to_string(),
    }];
    let entries = if formations.is_empty() {
        &fallback[..]
    } else {
        formations
    };
    let rows = entries
        .iter()
        .map(|f| two_column_row(&f.annee, &f.intitule, LABEL_WIDTH, CONTENT_WIDTH, style))
        .collect();
    two_column_table(rows)
}

/// Languages and hobbies table, two fixed rows.
pub fn hobbies_table(hobbies: Option<&Hobbies>, style: &StyleConfig) -> Table {
    let langues = hobbies
        .and_then(|h| h.langues.as_deref())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(defaults::LANGUES);
    let divers = hobbies
        .and_then(|h| h.hobbies.as_deref())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(defaults::HOBBIES);
    two_column_table(vec![
        two_column_row("Langues :", langues, LABEL_WIDTH, CONTENT_WIDTH, style),
        two_column_row("Hobbies :", divers, LABEL_WIDTH, CONTENT_WIDTH, style),
    ])
}

/// One bullet paragraph: bold accent glyph run, normal-weight text run.
pub fn bullet_paragraph(text: &str, style: &StyleConfig) -> Paragraph {
    Paragraph {
        props: left_aligned(),
        runs: vec![
            Run::styled(BULLET, style.bullet_glyph()),
            Run::styled(text, style.bullet_text()),
        ],
    }
}

/// The full block sequence for the experience section: per experience a
/// shaded header table, responsibility line, achievements and environment
/// line, separated by spacer paragraphs.
pub fn experience_blocks(experiences: &[Experience], style: &StyleConfig) -> Vec<Block> {
    let fallback = [Experience::placeholder()];
    let entries = if experiences.is_empty() {
        &fallback[..]
    } else {
        experiences
    };

    let mut blocks = Vec::new();
    for (i, exp) in entries.iter().enumerate() {
        blocks.push(Block::Table(experience_header(exp, style)));
        blocks.push(Block::Paragraph(Paragraph::new()));
        blocks.push(Block::Paragraph(labeled_line(
            "Responsabilité : ",
            style.label(),
            exp.responsabilites.as_deref().unwrap_or("Responsabilités à définir"),
            plain(style.label_size),
        )));
        blocks.push(Block::Paragraph(Paragraph::new()));

        let mut title = Paragraph::new();
        title.props = left_aligned();
        title.push_run(Run::styled("Réalisations", style.label()));
        blocks.push(Block::Paragraph(title));

        let default_realisations = ["Réalisation à définir".to_string()];
        let realisations = if exp.realisations.is_empty() {
            &default_realisations[..]
        } else {
            &exp.realisations[..]
        };
        for realisation in realisations {
            let mut item = Paragraph::new();
            item.props.indent_left = Some(ACHIEVEMENT_INDENT);
            item.push_run(Run::styled(format!("• {realisation}"), style.achievement()));
            blocks.push(Block::Paragraph(item));
        }

        blocks.push(Block::Paragraph(Paragraph::new()));
        blocks.push(Block::Paragraph(labeled_line(
            "Environnement : ",
            style.underlined_label(),
            exp.environnement.as_deref().unwrap_or("Environnement à définir"),
            plain(style.body_size),
        )));

        if i < entries.len() - 1 {
            let mut spacer = Paragraph::new();
            spacer.props.spacing_after = Some(BLOCK_SPACING);
            blocks.push(Block::Paragraph(spacer));
        }
    }
    blocks
}

fn plain(size: u32) -> RunStyle {
    RunStyle {
        size: Some(size),
        ..Default::default()
    }
}

fn labeled_line(label: &str, label_style: RunStyle, content: &str, content_style: RunStyle) -> Paragraph {
    Paragraph {
        props: left_aligned(),
        runs: vec![
            Run::styled(label, label_style),
            Run::styled(content, content_style),
        ],
    }
}

fn experience_header(exp: &Experience, style: &StyleConfig) -> Table {
    let header = style.header();
    let runs = vec![
        Run::styled(exp.periode.as_deref().unwrap_or("Période"), header.clone()),
        Run::styled(" - ", header.clone()),
        Run::styled(exp.titre.as_deref().unwrap_or("Titre"), header.clone()),
        Run::styled(" - ", header.clone()),
        Run::styled(exp.entreprise.as_deref().unwrap_or("Entreprise"), header),
    ];
    Table {
        style: Some(TABLE_STYLE.to_string()),
        width: Some(FULL_WIDTH),
        rows: vec![TableRow {
            cells: vec![TableCell {
                width: Some(FULL_WIDTH),
                shading_fill: Some(style.header_fill.clone()),
                valign_center: true,
                paragraphs: vec![Paragraph {
                    props: left_aligned(),
                    runs,
                }],
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StyleConfig {
        StyleConfig::default()
    }

    #[test]
    fn test_skills_table_keeps_row_order() {
        let skills = vec![
            ("Outils".to_string(), "Git".to_string()),
            ("SGBD".to_string(), "PostgreSQL".to_string()),
        ];
        let table = skills_table(&skills, &style());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0].text(), "Outils");
        assert_eq!(table.rows[1].cells[1].text(), "PostgreSQL");
        assert_eq!(table.rows[0].cells[0].width, Some(2000));
        assert_eq!(table.rows[0].cells[1].width, Some(3000));
    }

    #[test]
    fn test_empty_skills_use_standard_categories() {
        let table = skills_table(&[], &style());
        assert_eq!(table.rows.len(), 6);
        assert_eq!(table.rows[0].cells[0].text(), "Langages et Framework");
        assert_eq!(table.rows[5].cells[0].text(), "Méthodologie");
    }

    #[test]
    fn test_formation_table_defaults_to_one_row() {
        let table = formation_table(&[], &style());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[0].text(), "2024");
        assert_eq!(table.rows[0].cells[1].text(), "Formation à définir");
    }

    #[test]
    fn test_hobbies_table_has_fixed_labels() {
        let table = hobbies_table(None, &style());
        assert_eq!(table.rows[0].cells[0].text(), "Langues :");
        assert_eq!(table.rows[0].cells[1].text(), "Français, Anglais (intermédiaire)");
        assert_eq!(table.rows[1].cells[0].text(), "Hobbies :");
        assert_eq!(table.rows[1].cells[1].text(), "À définir");
    }

    #[test]
    fn test_bullet_paragraph_splits_glyph_and_text() {
        let p = bullet_paragraph("Rigueur", &style());
        assert_eq!(p.runs.len(), 2);
        assert_eq!(p.runs[0].text, BULLET);
        assert!(p.runs[0].style.bold);
        assert!(!p.runs[1].style.bold);
        assert_eq!(p.runs[1].text, "Rigueur");
    }

    #[test]
    fn test_experience_blocks_shape() {
        let exp = Experience {
            periode: Some("2020 - 2024".to_string()),
            titre: Some("Lead dev".to_string()),
            entreprise: Some("Acme".to_string()),
            responsabilites: Some("Encadrement".to_string()),
            realisations: vec!["Migration cloud".to_string(), "CI/CD".to_string()],
            environnement: Some("Rust, Kubernetes".to_string()),
        };
        let blocks = experience_blocks(&[exp], &style());

        let header = blocks[0].as_table().unwrap();
        assert_eq!(header.rows[0].cells[0].shading_fill.as_deref(), Some("B8860B"));
        assert_eq!(header.rows[0].cells[0].text(), "2020 - 2024 - Lead dev - Acme");

        let texts: Vec<String> = blocks
            .iter()
            .filter_map(Block::as_paragraph)
            .map(Paragraph::text)
            .collect();
        assert!(texts.contains(&"Responsabilité : Encadrement".to_string()));
        assert!(texts.contains(&"Réalisations".to_string()));
        assert!(texts.contains(&"• Migration cloud".to_string()));
        assert!(texts.contains(&"• CI/CD".to_string()));
        assert!(texts.contains(&"Environnement : Rust, Kubernetes".to_string()));
    }

    #[test]
    fn test_experience_blocks_separated_by_spacer() {
        let blocks = experience_blocks(
            &[Experience::placeholder(), Experience::placeholder()],
            &style(),
        );
        let spacers = blocks
            .iter()
            .filter_map(Block::as_paragraph)
            .filter(|p| p.props.spacing_after == Some(240))
            .count();
        assert_eq!(spacers, 1);
    }

    #[test]
    fn test_empty_experiences_produce_placeholder_block() {
        let blocks = experience_blocks(&[], &style());
        assert!(!blocks.is_empty());
        let header = blocks[0].as_table().unwrap();
        assert_eq!(header.rows[0].cells[0].text(), "Période - Titre - Entreprise");
    }
}
