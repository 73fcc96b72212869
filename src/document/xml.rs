// src/document/xml.rs
//! Parsing and serialization of the word/document.xml part.
//!
//! The parser is an event walk over quick-xml, collecting the block subset
//! the model covers and skipping unknown subtrees. The serializer emits a
//! canonical, deterministic rendition of the tree: identical trees always
//! produce identical bytes.

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

use super::{
    Block, Document, Justification, Paragraph, ParagraphProps, Run, RunStyle, Table, TableCell,
    TableRow,
};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

// ===== Parsing =====

pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    let mut doc = Document::new();
    loop {
        match reader
            .read_event()
            .context("malformed document XML in template")?
        {
            Event::Start(e) => match e.name().as_ref() {
                b"w:document" | b"w:body" => {}
                b"w:p" => doc
                    .body
                    .push(Block::Paragraph(parse_paragraph(&mut reader)?)),
                b"w:tbl" => doc.body.push(Block::Table(parse_table(&mut reader)?)),
                b"w:sectPr" => {
                    doc.section = Some(
                        reader
                            .read_text(e.name())
                            .context("unterminated w:sectPr")?
                            .into_owned(),
                    );
                }
                _ => skip(&mut reader, &e)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"w:p" => {
                doc.body.push(Block::Paragraph(Paragraph::new()));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(doc)
}

fn skip(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<()> {
    reader
        .read_to_end(start.name())
        .context("unterminated element in document XML")?;
    Ok(())
}

fn attr(e: &BytesStart, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn attr_u32(e: &BytesStart, name: &str) -> Option<u32> {
    attr(e, name).and_then(|v| v.parse().ok())
}

/// w:b style toggles default to "on" when the value attribute is absent.
fn toggle_on(e: &BytesStart) -> bool {
    match attr(e, "w:val").as_deref() {
        Some("0") | Some("false") | Some("none") => false,
        _ => true,
    }
}

fn parse_paragraph(reader: &mut Reader<&[u8]>) -> Result<Paragraph> {
    let mut para = Paragraph::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:pPr" => para.props = parse_paragraph_props(reader)?,
                b"w:r" => para.runs.push(parse_run(reader)?),
                // Hyperlinks are transparent containers; keep their runs.
                b"w:hyperlink" => {}
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.name().as_ref() == b"w:p" => break,
            Event::Eof => bail!("unexpected end of XML inside w:p"),
            _ => {}
        }
    }
    Ok(para)
}

fn parse_paragraph_props(reader: &mut Reader<&[u8]>) -> Result<ParagraphProps> {
    let mut props = ParagraphProps::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                match e.name().as_ref() {
                    b"w:pStyle" => props.style = attr(&e, "w:val"),
                    b"w:jc" => {
                        props.justification =
                            attr(&e, "w:val").and_then(|v| Justification::parse(&v));
                    }
                    b"w:ind" => props.indent_left = attr_u32(&e, "w:left"),
                    b"w:spacing" => {
                        props.spacing_before = attr_u32(&e, "w:before");
                        props.spacing_after = attr_u32(&e, "w:after");
                    }
                    _ => {}
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:pPr" => break,
            Event::Eof => bail!("unexpected end of XML inside w:pPr"),
            _ => {}
        }
    }
    Ok(props)
}

fn parse_run(reader: &mut Reader<&[u8]>) -> Result<Run> {
    let mut run = Run::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:rPr" => run.style = parse_run_props(reader)?,
                b"w:t" => loop {
                    match reader.read_event()? {
                        Event::Text(t) => run.text.push_str(&t.unescape()?),
                        Event::End(end) if end.name().as_ref() == b"w:t" => break,
                        Event::Eof => bail!("unexpected end of XML inside w:t"),
                        _ => {}
                    }
                },
                _ => skip(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => run.text.push('\t'),
                b"w:br" | b"w:cr" => run.text.push('\n'),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:r" => break,
            Event::Eof => bail!("unexpected end of XML inside w:r"),
            _ => {}
        }
    }
    Ok(run)
}

fn parse_run_props(reader: &mut Reader<&[u8]>) -> Result<RunStyle> {
    let mut style = RunStyle::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:b" => style.bold = toggle_on(&e),
                b"w:u" => style.underline = attr(&e, "w:val").as_deref() != Some("none"),
                b"w:color" => style.color = attr(&e, "w:val"),
                b"w:sz" => style.size = attr_u32(&e, "w:val"),
                b"w:rFonts" => style.font = attr(&e, "w:ascii"),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:rPr" => break,
            Event::Eof => bail!("unexpected end of XML inside w:rPr"),
            _ => {}
        }
    }
    Ok(style)
}

fn parse_table(reader: &mut Reader<&[u8]>) -> Result<Table> {
    let mut table = Table::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tblPr" => parse_table_props(reader, &mut table)?,
                b"w:tr" => table.rows.push(parse_row(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.name().as_ref() == b"w:tbl" => break,
            Event::Eof => bail!("unexpected end of XML inside w:tbl"),
            _ => {}
        }
    }
    Ok(table)
}

fn parse_table_props(reader: &mut Reader<&[u8]>, table: &mut Table) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:tblStyle" => table.style = attr(&e, "w:val"),
                b"w:tblW" => table.width = attr_u32(&e, "w:w"),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:tblPr" => break,
            Event::Eof => bail!("unexpected end of XML inside w:tblPr"),
            _ => {}
        }
    }
    Ok(())
}

fn parse_row(reader: &mut Reader<&[u8]>) -> Result<TableRow> {
    let mut row = TableRow::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tc" => row.cells.push(parse_cell(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.name().as_ref() == b"w:tr" => break,
            Event::Eof => bail!("unexpected end of XML inside w:tr"),
            _ => {}
        }
    }
    Ok(row)
}

fn parse_cell(reader: &mut Reader<&[u8]>) -> Result<TableCell> {
    let mut cell = TableCell::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tcPr" => parse_cell_props(reader, &mut cell)?,
                b"w:p" => cell.paragraphs.push(parse_paragraph(reader)?),
                // Nested tables are not modeled; their markup is dropped.
                _ => skip(reader, &e)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"w:p" => {
                cell.paragraphs.push(Paragraph::new());
            }
            Event::End(e) if e.name().as_ref() == b"w:tc" => break,
            Event::Eof => bail!("unexpected end of XML inside w:tc"),
            _ => {}
        }
    }
    Ok(cell)
}

fn parse_cell_props(reader: &mut Reader<&[u8]>, cell: &mut TableCell) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:tcW" => cell.width = attr_u32(&e, "w:w"),
                b"w:shd" => cell.shading_fill = attr(&e, "w:fill"),
                b"w:vAlign" => cell.valign_center = attr(&e, "w:val").as_deref() == Some("center"),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:tcPr" => break,
            Event::Eof => bail!("unexpected end of XML inside w:tcPr"),
            _ => {}
        }
    }
    Ok(())
}

// ===== Serialization =====

type XmlWriter = Writer<Cursor<Vec<u8>>>;

pub fn write_document(doc: &Document) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", W_NS));
    root.push_attribute(("xmlns:r", R_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for block in &doc.body {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut writer, p)?,
            Block::Table(t) => write_table(&mut writer, t)?,
        }
    }

    if let Some(raw) = &doc.section {
        writer.write_event(Event::Start(BytesStart::new("w:sectPr")))?;
        writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new("w:sectPr")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner().into_inner())
}

fn write_empty_val(writer: &mut XmlWriter, name: &str, val: &str) -> Result<()> {
    let mut e = BytesStart::new(name);
    e.push_attribute(("w:val", val));
    writer.write_event(Event::Empty(e))?;
    Ok(())
}

fn write_paragraph(writer: &mut XmlWriter, para: &Paragraph) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    if para.props != ParagraphProps::default() {
        write_paragraph_props(writer, &para.props)?;
    }
    for run in &para.runs {
        write_run(writer, run)?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_paragraph_props(writer: &mut XmlWriter, props: &ParagraphProps) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
    if let Some(style) = &props.style {
        write_empty_val(writer, "w:pStyle", style)?;
    }
    if props.spacing_before.is_some() || props.spacing_after.is_some() {
        let mut e = BytesStart::new("w:spacing");
        if let Some(before) = props.spacing_before {
            e.push_attribute(("w:before", before.to_string().as_str()));
        }
        if let Some(after) = props.spacing_after {
            e.push_attribute(("w:after", after.to_string().as_str()));
        }
        writer.write_event(Event::Empty(e))?;
    }
    if let Some(left) = props.indent_left {
        let mut e = BytesStart::new("w:ind");
        e.push_attribute(("w:left", left.to_string().as_str()));
        writer.write_event(Event::Empty(e))?;
    }
    if let Some(jc) = props.justification {
        write_empty_val(writer, "w:jc", jc.as_str())?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
    Ok(())
}

fn write_run(writer: &mut XmlWriter, run: &Run) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    if run.style != RunStyle::default() {
        write_run_props(writer, &run.style)?;
    }
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    writer.write_event(Event::Start(t))?;
    writer.write_event(Event::Text(BytesText::new(&run.text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn write_run_props(writer: &mut XmlWriter, style: &RunStyle) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    if let Some(font) = &style.font {
        let mut e = BytesStart::new("w:rFonts");
        e.push_attribute(("w:ascii", font.as_str()));
        e.push_attribute(("w:hAnsi", font.as_str()));
        writer.write_event(Event::Empty(e))?;
    }
    if style.bold {
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    }
    if let Some(color) = &style.color {
        write_empty_val(writer, "w:color", color)?;
    }
    if let Some(size) = style.size {
        write_empty_val(writer, "w:sz", &size.to_string())?;
    }
    if style.underline {
        write_empty_val(writer, "w:u", "single")?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    Ok(())
}

fn write_table(writer: &mut XmlWriter, table: &Table) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tblPr")))?;
    if let Some(style) = &table.style {
        write_empty_val(writer, "w:tblStyle", style)?;
    }
    if let Some(width) = table.width {
        let mut e = BytesStart::new("w:tblW");
        e.push_attribute(("w:w", width.to_string().as_str()));
        e.push_attribute(("w:type", "pct"));
        writer.write_event(Event::Empty(e))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tblPr")))?;
    for row in &table.rows {
        writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
        for cell in &row.cells {
            write_cell(writer, cell)?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    Ok(())
}

fn write_cell(writer: &mut XmlWriter, cell: &TableCell) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tcPr")))?;
    if let Some(width) = cell.width {
        let mut e = BytesStart::new("w:tcW");
        e.push_attribute(("w:w", width.to_string().as_str()));
        e.push_attribute(("w:type", "pct"));
        writer.write_event(Event::Empty(e))?;
    }
    if let Some(fill) = &cell.shading_fill {
        let mut e = BytesStart::new("w:shd");
        e.push_attribute(("w:val", "clear"));
        e.push_attribute(("w:color", "auto"));
        e.push_attribute(("w:fill", fill.as_str()));
        writer.write_event(Event::Empty(e))?;
    }
    if cell.valign_center {
        write_empty_val(writer, "w:vAlign", "center")?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tcPr")))?;
    // A cell must contain at least one paragraph to be well-formed.
    if cell.paragraphs.is_empty() {
        write_paragraph(writer, &Paragraph::new())?;
    }
    for para in &cell.paragraphs {
        write_paragraph(writer, para)?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
    Ok(())
}
