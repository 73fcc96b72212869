// src/document/mod.rs
//! In-memory model of a word-processing document body.
//!
//! The model covers the subset of Open XML the template filler needs:
//! block-level paragraphs and tables, runs with character styling, and the
//! trailing section properties (carried verbatim so page setup survives a
//! round trip). Markup outside this subset is dropped on load; paragraph
//! text is always preserved.

pub mod package;
pub mod xml;

/// Character-level styling of a text run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub underline: bool,
    /// RRGGBB hex, without a leading '#'.
    pub color: Option<String>,
    /// Font size in half-points (w:sz).
    pub size: Option<u32>,
    pub font: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub style: RunStyle,
    pub text: String,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            style: RunStyle::default(),
            text: text.into(),
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Center,
    Right,
}

impl Justification {
    pub fn as_str(self) -> &'static str {
        match self {
            Justification::Left => "left",
            Justification::Center => "center",
            Justification::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Justification::Left),
            "center" => Some(Justification::Center),
            "right" | "end" => Some(Justification::Right),
            _ => None,
        }
    }
}

/// Paragraph-level properties (w:pPr subset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphProps {
    /// Named style reference (w:pStyle).
    pub style: Option<String>,
    pub justification: Option<Justification>,
    /// Left indentation in twips.
    pub indent_left: Option<u32>,
    /// Spacing before/after in twips.
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub props: ParagraphProps,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run(run: Run) -> Self {
        Self {
            props: ParagraphProps::default(),
            runs: vec![run],
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    /// Drop all runs, keeping the paragraph properties.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Replace `token` with `replacement`.
    ///
    /// If the token sits wholly inside one run the replacement happens in
    /// place and keeps that run's style. Otherwise the paragraph is collapsed
    /// to a single unstyled run holding the merged text; per-run styling of
    /// the original paragraph is lost. This is a documented lossy fallback.
    pub fn replace_text(&mut self, token: &str, replacement: &str) -> bool {
        if !self.contains(token) {
            return false;
        }
        for run in &mut self.runs {
            if run.text.contains(token) {
                run.text = run.text.replace(token, replacement);
                return true;
            }
        }
        let merged = self.text().replace(token, replacement);
        self.runs = vec![Run::new(merged)];
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Cell width in fiftieths of a percent (w:tcW type="pct").
    pub width: Option<u32>,
    /// Background fill as RRGGBB hex (w:shd w:fill).
    pub shading_fill: Option<String>,
    pub valign_center: bool,
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Named table style (w:tblStyle), e.g. "TableGrid".
    pub style: Option<String>,
    /// Table width in fiftieths of a percent (5000 = full width).
    pub width: Option<u32>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        }
    }
}

/// An ordered sequence of block-level nodes plus the preserved section
/// properties of the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body: Vec<Block>,
    /// Raw inner XML of the trailing w:sectPr, if the source had one.
    pub(crate) section: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level paragraphs, in document order (table contents excluded).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(Block::as_paragraph)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(Block::as_table)
    }

    /// All visible text, paragraph per line, table cells included.
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.body {
            match block {
                Block::Paragraph(p) => lines.push(p.text()),
                Block::Table(t) => {
                    for row in &t.rows {
                        for cell in &row.cells {
                            lines.push(cell.text());
                        }
                    }
                }
            }
        }
        lines.join("\n")
    }

    /// Insert `blocks` immediately after the block at `index`.
    pub fn insert_after(&mut self, index: usize, blocks: Vec<Block>) {
        let at = (index + 1).min(self.body.len());
        self.body.splice(at..at, blocks);
    }
}
