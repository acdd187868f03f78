//! Source document readers. PDF goes through pdf-extract, DOCX through the
//! `word/document.xml` part of the zip container, TXT is read as UTF-8.

use std::fs;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{info, warn};

use crate::documents::{Document, DocumentError};

pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Pdf,
    Docx,
    Text,
}

fn detect_format(path: &Path) -> Result<Format, DocumentError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => Ok(Format::Pdf),
        "docx" | "doc" => Ok(Format::Docx),
        "txt" => Ok(Format::Text),
        _ => Err(DocumentError::Unsupported(if ext.is_empty() {
            "(none)".to_string()
        } else {
            format!(".{ext}")
        })),
    }
}

pub fn is_supported(filename: &str) -> bool {
    detect_format(Path::new(filename)).is_ok()
}

/// Loads one document. Unsupported extensions fail before touching the file.
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let format = detect_format(path)?;
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let content = match format {
        Format::Pdf => {
            pdf_extract::extract_text(path).map_err(|e| DocumentError::Pdf(format!("{e:?}")))?
        }
        Format::Docx => read_docx(path)?,
        Format::Text => fs::read_to_string(path)?,
    };

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut document = Document::new(source, content);
    document
        .metadata
        .insert("type".to_string(), "SKJ".to_string());
    Ok(document)
}

/// Loads every supported document in `dir`, sorted by filename.
/// A missing folder is an error; unreadable individual files are skipped.
pub fn load_folder(dir: &Path) -> Result<Vec<Document>, DocumentError> {
    let mut documents = Vec::new();
    for filename in list_documents(dir)? {
        match load_document(&dir.join(&filename)) {
            Ok(doc) => {
                info!("Loaded: {filename}");
                documents.push(doc);
            }
            Err(e) => warn!("Skipping {filename}: {e}"),
        }
    }
    Ok(documents)
}

/// Names of the supported documents in `dir`, sorted.
pub fn list_documents(dir: &Path) -> Result<Vec<String>, DocumentError> {
    if !dir.is_dir() {
        return Err(DocumentError::NotFound(dir.to_path_buf()));
    }
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| is_supported(name))
        .collect();
    names.sort();
    Ok(names)
}

fn read_docx(path: &Path) -> Result<String, DocumentError> {
    let file = fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| DocumentError::Docx("missing word/document.xml".to_string()))?
        .read_to_string(&mut xml)?;

    docx_xml_to_text(&xml)
}

/// Collects `<w:t>` runs, one line per `<w:p>` paragraph.
fn docx_xml_to_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut output = String::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    output.push_str(&paragraph);
                    output.push('\n');
                    paragraph.clear();
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| DocumentError::Docx(err.to_string()))?;
                paragraph.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_docx(path: &Path, body_xml: &str) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(body_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_unsupported_extension_fails_fast() {
        let err = load_document(Path::new("/nowhere/skj.xlsx")).unwrap_err();
        assert!(matches!(err, DocumentError::Unsupported(ext) if ext == ".xlsx"));
    }

    #[test]
    fn test_missing_supported_file_is_not_found() {
        let err = load_document(Path::new("/nowhere/skj.txt")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_load_txt_sets_source_and_type() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("analis.txt");
        fs::write(&path, "JABATAN: Analis Kepegawaian").unwrap();
        let doc = load_document(&path).unwrap();
        assert_eq!(doc.source, "analis.txt");
        assert_eq!(doc.content, "JABATAN: Analis Kepegawaian");
        assert_eq!(doc.metadata.get("type").map(String::as_str), Some("SKJ"));
    }

    #[test]
    fn test_load_docx_reads_paragraph_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pranata.docx");
        write_docx(
            &path,
            r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Pranata Komputer</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Kode: </w:t></w:r><w:r><w:t>PK-01 &amp; PK-02</w:t></w:r></w:p>
</w:body></w:document>"#,
        );
        let doc = load_document(&path).unwrap();
        assert!(doc.content.contains("Pranata Komputer\n"));
        assert!(doc.content.contains("Kode: PK-01 & PK-02"));
    }

    #[test]
    fn test_list_documents_filters_and_sorts() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["b.txt", "a.pdf", "notes.md", "c.docx"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let names = list_documents(dir.path()).unwrap();
        assert_eq!(names, vec!["a.pdf", "b.txt", "c.docx"]);
    }

    #[test]
    fn test_load_folder_missing_is_error() {
        let err = load_folder(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_load_folder_skips_unreadable_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("good.txt"), "isi").unwrap();
        fs::write(dir.path().join("broken.docx"), "not a zip").unwrap();
        let docs = load_folder(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "good.txt");
    }
}
