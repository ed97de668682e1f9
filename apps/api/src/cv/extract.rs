//! Plain-text extraction from uploaded CV files.

use std::io::{Cursor, Read};

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use quick_xml::{events::Event, Reader as XmlReader};

/// Upload formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvFormat {
    Pdf,
    Docx,
}

impl CvFormat {
    /// Case-insensitive match on the file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(CvFormat::Pdf),
            "docx" => Some(CvFormat::Docx),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            CvFormat::Pdf => "application/pdf",
            CvFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Extracts text on the blocking pool; both parsers are CPU-bound.
pub async fn extract_text(format: CvFormat, data: Bytes) -> Result<String> {
    tokio::task::spawn_blocking(move || match format {
        CvFormat::Pdf => extract_pdf_text(&data),
        CvFormat::Docx => extract_docx_text(&data),
    })
    .await
    .context("text extraction task panicked")?
}

fn extract_pdf_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data).context("failed to extract PDF text")?;
    Ok(collapse_blank_lines(&text))
}

/// Reads the text runs of `word/document.xml`, one line per paragraph.
fn extract_docx_text(data: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).context("failed to open DOCX archive")?;

    let mut document = archive
        .by_name("word/document.xml")
        .context("missing word/document.xml in DOCX")?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .context("failed to read DOCX XML")?;

    let mut reader = XmlReader::from_str(&xml);
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text_node = true,
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => output.push('\t'),
                b"w:br" | b"w:cr" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_node {
                    let value = e.unescape().map_err(|err| anyhow!(err))?;
                    output.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = false,
                b"w:p" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(anyhow!("failed to parse DOCX XML: {err}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(collapse_blank_lines(&output))
}

/// Trims every line and squeezes runs of blank lines down to one.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = true;
    for line in text.lines().map(str::trim_end) {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = blank;
    }
    out.trim().to_string()
}

#[cfg(test)]
pub mod testing {
    //! In-memory DOCX fixtures.

    use std::io::{Cursor, Write};

    pub fn docx_with(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    /// A minimal document with one `w:p` per line.
    pub fn docx_from_lines(lines: &[&str]) -> Vec<u8> {
        let body: String = lines
            .iter()
            .map(|l| format!("<w:p><w:r><w:t>{l}</w:t></w:r></w:p>"))
            .collect();
        docx_with(&format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        ))
    }
}
