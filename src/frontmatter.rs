//! YAML front matter extraction for corpus documents.
//!
//! A corpus document starts with a header block:
//!
//! ```text
//! ---
//! description: ...
//! functions:
//!   file-read:
//!     - code: base64 file | base64 --decode
//! ---
//! optional Markdown body
//! ```
//!
//! The opening and closing delimiters are lines consisting of `---`
//! (trailing whitespace allowed). A document without an opening delimiter has
//! no header; an opening delimiter without a closing one is malformed.

use anyhow::{bail, Context, Result};
use gtfobins_core::build::BinaryDocument;
use serde::de::DeserializeOwned;

const DELIMITER: &str = "---";

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Splits `text` into `(header, body)`. Returns `Ok(None)` when there is no header.
pub fn split(text: &str) -> Result<Option<(&str, &str)>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    match lines.next() {
        Some(first) if is_delimiter(first) => {}
        _ => return Ok(None),
    }

    let header_start = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
    let mut offset = header_start;
    for line in lines {
        if is_delimiter(line) {
            let header = &text[header_start..offset];
            let body = &text[offset + line.len()..];
            return Ok(Some((header, body)));
        }
        offset += line.len();
    }

    bail!("front matter is not terminated by a '---' line")
}

/// Deserializes the YAML header of `text`, or `T::default()` if it has none.
pub fn parse<T: DeserializeOwned + Default>(text: &str) -> Result<T> {
    match split(text)? {
        Some((header, _)) if !header.trim().is_empty() => {
            serde_yaml::from_str(header).context("Failed to parse front matter YAML")
        }
        _ => Ok(T::default()),
    }
}

/// Parses the header of one per-binary document.
pub fn parse_binary_document(text: &str) -> Result<BinaryDocument> {
    parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header_and_body() {
        let text = "---\ndescription: hi\n---\nbody text\n";
        let (header, body) = split(text).unwrap().unwrap();
        assert_eq!(header, "description: hi\n");
        assert_eq!(body, "body text\n");
    }

    #[test]
    fn test_no_header() {
        assert!(split("# just markdown\n").unwrap().is_none());
        let doc = parse_binary_document("# just markdown\n").unwrap();
        assert!(doc.description.is_none());
    }

    #[test]
    fn test_unterminated_header_is_error() {
        assert!(split("---\ndescription: hi\n").is_err());
    }

    #[test]
    fn test_crlf_and_bom() {
        let text = "\u{feff}---\r\ndescription: hi\r\n---\r\n";
        let doc = parse_binary_document(text).unwrap();
        assert_eq!(doc.description.as_deref(), Some("hi"));
    }

    #[test]
    fn test_empty_header() {
        let doc = parse_binary_document("---\n---\n").unwrap();
        assert!(doc.functions.is_none());
    }

    #[test]
    fn test_gtfobins_document() {
        let text = r#"---
description: |
  Encode and decode data.
functions:
  file-read:
    - code: |
        LFILE=file_to_read
        base64 "$LFILE" | base64 --decode
  suid:
    - description: extra field
      code: ./base64 "$LFILE" | base64 --decode
---
"#;
        let doc = parse_binary_document(text).unwrap();
        assert_eq!(doc.description.as_deref(), Some("Encode and decode data.\n"));
        let functions = doc.functions.unwrap();
        let names: Vec<&String> = functions.keys().collect();
        assert_eq!(names, vec!["file-read", "suid"]);
        assert_eq!(
            functions["file-read"][0].code.as_deref(),
            Some("LFILE=file_to_read\nbase64 \"$LFILE\" | base64 --decode\n")
        );
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(parse_binary_document("---\nfunctions: [unclosed\n---\n").is_err());
    }
}
