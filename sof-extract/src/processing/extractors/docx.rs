use crate::error::{Result, SofError};

pub struct DocxExtractor;

impl DocxExtractor {
    /// Body paragraphs in document order, each followed by a newline.
    ///
    /// Paragraphs inside tables, headers and footers are not included.
    /// An empty paragraph still contributes its newline.
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| SofError::Processing(format!("DOCX parse error: {e}")))?;

        let mut text = String::new();
        for child in &docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                text.push_str(&Self::paragraph_text(paragraph));
                text.push('\n');
            }
        }

        Ok(text)
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        Self::push_children(&paragraph.children, &mut content);
        content
    }

    // Hyperlinks nest paragraph children; tracked insertions hold runs.
    // Deleted text is left out.
    fn push_children(children: &[docx_rs::ParagraphChild], content: &mut String) {
        for child in children {
            match child {
                docx_rs::ParagraphChild::Run(run) => Self::push_run(run, content),
                docx_rs::ParagraphChild::Hyperlink(link) => {
                    Self::push_children(&link.children, content)
                }
                docx_rs::ParagraphChild::Insert(insert) => {
                    for insert_child in &insert.children {
                        if let docx_rs::InsertChild::Run(run) = insert_child {
                            Self::push_run(run, content);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn push_run(run: &docx_rs::Run, content: &mut String) {
        for run_child in &run.children {
            match run_child {
                docx_rs::RunChild::Text(text) => content.push_str(&text.text),
                docx_rs::RunChild::Tab(_) => content.push('\t'),
                docx_rs::RunChild::Break(_) => content.push('\n'),
                _ => {}
            }
        }
    }
}
