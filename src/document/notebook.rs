use super::front_matter::FlatDocument;
use crate::error::DocumentError;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

/// How the first cell stored its `source`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceForm {
    Lines,
    Text,
}

/// A Jupyter notebook whose front matter lives in the first cell
///
/// Only the first cell's `source` is ever rewritten; the rest of the envelope is kept
/// as parsed, key order included.
#[derive(Debug, Clone)]
pub struct NotebookDocument {
    container: Value,
    header: FlatDocument,
    source_form: SourceForm,
}

impl NotebookDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let container: Value = serde_json::from_str(text)
            .map_err(|e| DocumentError::InvalidNotebook(e.to_string()))?;

        let (source, source_form) = first_cell_source(&container)?;
        let header = FlatDocument::parse(&source)?;

        Ok(Self {
            container,
            header,
            source_form,
        })
    }

    pub fn header(&self) -> &FlatDocument {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FlatDocument {
        &mut self.header
    }

    /// All cells, the first one as it was parsed
    pub fn cells(&self) -> &[Value] {
        self.container
            .get("cells")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn serialize(&self) -> Result<String, DocumentError> {
        let text = self.header.serialize()?;
        let source = match self.source_form {
            SourceForm::Lines => Value::Array(
                text.split_inclusive('\n')
                    .map(|line| Value::String(line.to_string()))
                    .collect(),
            ),
            SourceForm::Text => Value::String(text),
        };

        let mut container = self.container.clone();
        let first = container
            .get_mut("cells")
            .and_then(Value::as_array_mut)
            .and_then(|cells| cells.first_mut())
            .and_then(Value::as_object_mut)
            .ok_or_else(|| DocumentError::InvalidNotebook("notebook has no cells".into()))?;
        first.insert("source".to_string(), source);

        // Jupyter writes one-space indentation and a trailing newline
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        container
            .serialize(&mut serializer)
            .map_err(|e| DocumentError::SerializeFailed(e.to_string()))?;
        buf.push(b'\n');

        String::from_utf8(buf).map_err(|_| DocumentError::InvalidUtf8)
    }
}

fn first_cell_source(container: &Value) -> Result<(String, SourceForm), DocumentError> {
    let cells = container
        .get("cells")
        .and_then(Value::as_array)
        .ok_or_else(|| DocumentError::InvalidNotebook("missing `cells` array".into()))?;

    let first = cells
        .first()
        .ok_or_else(|| DocumentError::InvalidNotebook("notebook has no cells".into()))?;
    if !first.is_object() {
        return Err(DocumentError::InvalidNotebook(
            "first cell is not an object".into(),
        ));
    }

    match first.get("source") {
        Some(Value::String(text)) => Ok((text.clone(), SourceForm::Text)),
        Some(Value::Array(lines)) => {
            let mut text = String::new();
            for line in lines {
                let line = line.as_str().ok_or_else(|| {
                    DocumentError::InvalidNotebook("cell source contains a non-string line".into())
                })?;
                text.push_str(line);
            }
            Ok((text, SourceForm::Lines))
        }
        Some(_) => Err(DocumentError::InvalidNotebook(
            "cell source must be a string or a list of strings".into(),
        )),
        None => Err(DocumentError::InvalidNotebook(
            "first cell has no `source`".into(),
        )),
    }
}
