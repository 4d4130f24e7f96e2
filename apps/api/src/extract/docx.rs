//! DOCX text extraction.

use bytes::Bytes;
use docx_rs::{
    read_docx, DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild,
    StructuredDataTag, StructuredDataTagChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use super::ExtractError;

/// Extracts raw visible text from a DOCX package, one paragraph per line.
/// Table cells, hyperlinks, tracked insertions and content controls are
/// included in document order.
pub async fn extract(bytes: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_paragraphs(&bytes))
        .await
        .map_err(|e| ExtractError::Decode(format!("DOCX decoding task failed: {e}")))?
}

fn extract_paragraphs(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Decode(e.to_string()))?;

    let mut lines = Lines::default();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => lines.paragraph(para),
            DocumentChild::Table(table) => lines.table(table),
            DocumentChild::StructuredDataTag(sdt) => lines.block_tag(sdt),
            _ => {}
        }
    }

    Ok(lines.0.join("\n"))
}

/// Non-blank output lines, in document order.
#[derive(Default)]
struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, line: String) {
        if !line.trim().is_empty() {
            self.0.push(line);
        }
    }

    fn paragraph(&mut self, para: &Paragraph) {
        let mut line = String::new();
        inline_children(&para.children, &mut line);
        self.push(line);
    }

    fn table(&mut self, table: &Table) {
        for TableChild::TableRow(row) in &table.rows {
            for TableRowChild::TableCell(cell) in &row.cells {
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(para) => self.paragraph(para),
                        TableCellContent::Table(nested) => self.table(nested),
                        TableCellContent::StructuredDataTag(sdt) => self.block_tag(sdt),
                        TableCellContent::TableOfContents(_) => {}
                    }
                }
            }
        }
    }

    /// A block-level content control. Loose runs form one line.
    fn block_tag(&mut self, sdt: &StructuredDataTag) {
        let mut pending = String::new();
        for child in &sdt.children {
            match child {
                StructuredDataTagChild::Run(run) => run_text(run, &mut pending),
                StructuredDataTagChild::Paragraph(para) => {
                    self.push(std::mem::take(&mut pending));
                    self.paragraph(para);
                }
                StructuredDataTagChild::Table(table) => {
                    self.push(std::mem::take(&mut pending));
                    self.table(table);
                }
                StructuredDataTagChild::StructuredDataTag(nested) => {
                    self.push(std::mem::take(&mut pending));
                    self.block_tag(nested);
                }
                _ => {}
            }
        }
        self.push(pending);
    }
}

fn inline_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => run_text(run, out),
            ParagraphChild::Hyperlink(link) => inline_children(&link.children, out),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        run_text(run, out);
                    }
                }
            }
            ParagraphChild::StructuredDataTag(sdt) => inline_tag(sdt, out),
            _ => {}
        }
    }
}

/// A content control inside a paragraph.
fn inline_tag(sdt: &StructuredDataTag, out: &mut String) {
    for child in &sdt.children {
        match child {
            StructuredDataTagChild::Run(run) => run_text(run, out),
            StructuredDataTagChild::Paragraph(para) => inline_children(&para.children, out),
            StructuredDataTagChild::StructuredDataTag(nested) => inline_tag(nested, out),
            _ => {}
        }
    }
}

fn run_text(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
