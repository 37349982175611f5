//! Tests for the Document dispatch layer

use super::*;
use std::path::PathBuf;

const NOTEBOOK: &str = r#"{
 "cells": [
  {"cell_type": "raw", "metadata": {}, "source": ["---\n", "title: Fit\n", "version: 2.0\n", "---\n"]},
  {"cell_type": "markdown", "metadata": {}, "source": ["Some *text*"]}
 ],
 "metadata": {},
 "nbformat": 4,
 "nbformat_minor": 5
}"#;

#[test]
fn test_format_from_extension() {
    assert_eq!(DocumentFormat::from_extension("md"), Some(DocumentFormat::Markdown));
    assert_eq!(DocumentFormat::from_extension("QMD"), Some(DocumentFormat::Quarto));
    assert_eq!(DocumentFormat::from_extension("ipynb"), Some(DocumentFormat::Notebook));
    assert_eq!(DocumentFormat::from_extension("txt"), None);
}

#[test]
fn test_format_from_path() {
    let format = DocumentFormat::from_path(&PathBuf::from("notebooks/fit.ipynb")).unwrap();
    assert!(format.is_structured());

    let format = DocumentFormat::from_path(&PathBuf::from("notes/a.qmd")).unwrap();
    assert!(!format.is_structured());
    assert_eq!(format.extension(), "qmd");

    let result = DocumentFormat::from_path(&PathBuf::from("README"));
    assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));
}

#[test]
fn test_flat_document_accessors() {
    let mut doc = Document::parse(b"---\ntitle: A\n---\nbody\n", DocumentFormat::Quarto).unwrap();
    assert!(matches!(doc, Document::Flat(_)));
    assert_eq!(doc.get_str("title"), Some("A".to_string()));
    assert_eq!(doc.get_str_or("version", "unversioned"), "unversioned");

    doc.set("version", "1.0");
    assert!(!doc.set_default("title", "B"));
    assert!(doc.set_default("author", "Ada"));

    let out = String::from_utf8(doc.serialize().unwrap()).unwrap();
    assert!(out.starts_with("---\ntitle: A\n"));
    assert!(out.contains("version: '1.0'") || out.contains("version: \"1.0\""));
    assert!(out.contains("author: Ada"));
    assert!(out.ends_with("---\nbody\n"));
}

#[test]
fn test_notebook_document_accessors() {
    let mut doc = Document::parse(NOTEBOOK.as_bytes(), DocumentFormat::Notebook).unwrap();
    assert!(matches!(doc, Document::Notebook(_)));
    assert_eq!(doc.get_str("version"), Some("2.0".to_string()));

    doc.set("title", "Fit (2.0)");
    let out = doc.serialize().unwrap();
    let reparsed = Document::parse(&out, DocumentFormat::Notebook).unwrap();
    assert_eq!(reparsed.get_str("title"), Some("Fit (2.0)".to_string()));
    assert_eq!(reparsed.get_str("version"), Some("2.0".to_string()));

    let Document::Notebook(nb) = reparsed else {
        panic!("expected notebook");
    };
    assert_eq!(nb.cells()[1]["source"][0], "Some *text*");
}

#[test]
fn test_round_trip_without_mutation() {
    let flat = b"---\ntitle: Keep\ndescription: Same\norder: 2\n---\n\n## Body\n\nkept as is\n";
    let doc = Document::parse(flat, DocumentFormat::Markdown).unwrap();
    let again = Document::parse(&doc.serialize().unwrap(), DocumentFormat::Markdown).unwrap();
    assert_eq!(again.metadata(), doc.metadata());
    let (Document::Flat(a), Document::Flat(b)) = (&doc, &again) else {
        panic!("expected flat documents");
    };
    assert_eq!(a.body, b.body);

    let nb = Document::parse(NOTEBOOK.as_bytes(), DocumentFormat::Notebook).unwrap();
    let again = Document::parse(&nb.serialize().unwrap(), DocumentFormat::Notebook).unwrap();
    assert_eq!(again.metadata(), nb.metadata());
}

#[test]
fn test_invalid_utf8() {
    let result = Document::parse(&[0xff, 0xfe, 0x00], DocumentFormat::Markdown);
    assert!(matches!(result, Err(DocumentError::InvalidUtf8)));
}

#[test]
fn test_from_path_bytes_dispatches_on_suffix() {
    let doc = Document::from_path_bytes(&PathBuf::from("a.ipynb"), NOTEBOOK.as_bytes()).unwrap();
    assert!(matches!(doc, Document::Notebook(_)));

    let result = Document::from_path_bytes(&PathBuf::from("a.txt"), b"text");
    assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));
}
