use super::metadata::Metadata;
use crate::error::DocumentError;
use regex::Regex;
use serde_yaml::Value;

const OPEN_DELIMITER: &str = "---";
const CLOSE_DELIMITERS: [&str; 2] = ["---", "..."];

/// A text document with an optional leading YAML front matter block
#[derive(Debug, Clone, PartialEq)]
pub struct FlatDocument {
    pub metadata: Metadata,
    /// Everything after the closing delimiter line, untouched
    pub body: String,
    has_header: bool,
    /// Header text as it was read, before YAML typing
    raw_header: String,
    /// Line ending that followed the closing delimiter
    close_ending: &'static str,
}

impl FlatDocument {
    pub fn new(metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            metadata,
            body: body.into(),
            has_header: true,
            raw_header: String::new(),
            close_ending: "\n",
        }
    }

    /// Split `text` into front matter and body
    ///
    /// Text that does not open with a `---` line has no front matter and is kept
    /// whole as the body.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut lines = text.split_inclusive('\n');

        let opens_header = lines
            .next()
            .map(|line| line.trim_end() == OPEN_DELIMITER)
            .unwrap_or(false);
        if !opens_header {
            return Ok(Self {
                metadata: Metadata::new(),
                body: text.to_string(),
                has_header: false,
                raw_header: String::new(),
                close_ending: "\n",
            });
        }

        let header_start = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
        let mut offset = header_start;

        for line in lines {
            if CLOSE_DELIMITERS.contains(&line.trim_end()) {
                let raw_header = &text[header_start..offset];
                let metadata = parse_header(raw_header)?;
                return Ok(Self {
                    metadata,
                    body: text[offset + line.len()..].to_string(),
                    has_header: true,
                    raw_header: raw_header.to_string(),
                    close_ending: line_ending(line),
                });
            }
            offset += line.len();
        }

        Err(DocumentError::UnterminatedFrontMatter)
    }

    /// Source text of a top-level scalar field as written in the parsed header
    ///
    /// `version: 1.10` yields `1.10` where the typed value would print as `1.1`.
    /// Quoted values come back without their quotes.
    pub fn raw_value(&self, key: &str) -> Option<String> {
        let pattern = format!(r"(?m)^{}:[ \t]*(.+?)[ \t]*\r?$", regex::escape(key));
        let re = Regex::new(&pattern).ok()?;
        let raw = re.captures(&self.raw_header)?.get(1)?.as_str();
        let raw = raw.split_once(" #").map_or(raw, |(value, _)| value).trim_end();
        let raw = raw
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .or_else(|| raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
            .unwrap_or(raw);
        Some(raw.to_string())
    }

    pub fn serialize(&self) -> Result<String, DocumentError> {
        if !self.has_header && self.metadata.is_empty() {
            return Ok(self.body.clone());
        }

        let mut out = String::with_capacity(self.body.len() + 128);
        out.push_str(OPEN_DELIMITER);
        out.push('\n');

        if !self.metadata.is_empty() {
            let yaml = serde_yaml::to_string(self.metadata.as_mapping())
                .map_err(|e| DocumentError::SerializeFailed(e.to_string()))?;
            out.push_str(&yaml);
            if !yaml.ends_with('\n') {
                out.push('\n');
            }
        }

        out.push_str(OPEN_DELIMITER);
        out.push_str(self.close_ending);
        out.push_str(&self.body);
        Ok(out)
    }
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn parse_header(yaml: &str) -> Result<Metadata, DocumentError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| DocumentError::InvalidFrontMatter(e.to_string()))?;

    match value {
        Value::Mapping(fields) => Ok(Metadata::from_mapping(fields)),
        Value::Null => Ok(Metadata::new()),
        Value::Sequence(_) => Err(DocumentError::FrontMatterNotMapping("a sequence".into())),
        _ => Err(DocumentError::FrontMatterNotMapping("a scalar".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_body() {
        let doc = FlatDocument::parse("---\ntitle: Notes\nversion: 1.0\n---\n# Heading\n\nText\n")
            .unwrap();
        assert_eq!(doc.metadata.get_str("title"), Some("Notes".to_string()));
        assert_eq!(doc.metadata.get_str("version"), Some("1.0".to_string()));
        assert_eq!(doc.body, "# Heading\n\nText\n");
    }

    #[test]
    fn test_no_front_matter_keeps_body() {
        let text = "# Just a heading\n---\nnot a header\n";
        let doc = FlatDocument::parse(text).unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, text);
        assert_eq!(doc.serialize().unwrap(), text);
    }

    #[test]
    fn test_crlf_delimiters() {
        let doc = FlatDocument::parse("---\r\ntitle: Win\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(doc.metadata.get_str("title"), Some("Win".to_string()));
        assert_eq!(doc.body, "body\r\n");
    }

    #[test]
    fn test_dots_close_header() {
        let doc = FlatDocument::parse("---\ntitle: Dots\n...\nbody").unwrap();
        assert_eq!(doc.metadata.get_str("title"), Some("Dots".to_string()));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_closing_delimiter_without_newline() {
        let doc = FlatDocument::parse("---\ntitle: Cell\n---").unwrap();
        assert_eq!(doc.body, "");
        assert_eq!(doc.serialize().unwrap(), "---\ntitle: Cell\n---");
    }

    #[test]
    fn test_empty_header() {
        let doc = FlatDocument::parse("---\n---\nbody\n").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.serialize().unwrap(), "---\n---\nbody\n");
    }

    #[test]
    fn test_unterminated_header_is_error() {
        let result = FlatDocument::parse("---\ntitle: Broken\nbody\n");
        assert!(matches!(result, Err(DocumentError::UnterminatedFrontMatter)));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let result = FlatDocument::parse("---\ntitle: [unclosed\n---\nbody\n");
        assert!(matches!(result, Err(DocumentError::InvalidFrontMatter(_))));
    }

    #[test]
    fn test_non_mapping_header_is_error() {
        let result = FlatDocument::parse("---\n- a\n- b\n---\nbody\n");
        assert!(matches!(result, Err(DocumentError::FrontMatterNotMapping(_))));
    }

    #[test]
    fn test_round_trip_preserves_fields_and_body() {
        let text = "---\ntitle: Notes\nversion: 1.0\norder: 3\ntags:\n- a\n- b\n---\n\nBody with --- inside\n";
        let doc = FlatDocument::parse(text).unwrap();
        let reparsed = FlatDocument::parse(&doc.serialize().unwrap()).unwrap();

        assert_eq!(reparsed.metadata, doc.metadata);
        assert_eq!(reparsed.body, doc.body);
        assert_eq!(reparsed.metadata.get_str("version"), Some("1.0".to_string()));
    }

    #[test]
    fn test_raw_value_keeps_source_spelling() {
        let doc = FlatDocument::parse("---\ntitle: 'Notes'\nversion: 1.10\n---\nbody\n").unwrap();
        assert_eq!(doc.metadata.get_str("version"), Some("1.1".to_string()));
        assert_eq!(doc.raw_value("version"), Some("1.10".to_string()));
        assert_eq!(doc.raw_value("title"), Some("Notes".to_string()));
        assert_eq!(doc.raw_value("author"), None);

        let commented = FlatDocument::parse("---\nversion: 2.50 # release\n---\n").unwrap();
        assert_eq!(commented.raw_value("version"), Some("2.50".to_string()));
    }

    #[test]
    fn test_serialize_new_document() {
        let mut metadata = Metadata::new();
        metadata.set("title", "Index");
        let doc = FlatDocument::new(metadata, "| a |\n");
        assert_eq!(doc.serialize().unwrap(), "---\ntitle: Index\n---\n| a |\n");
    }
}
