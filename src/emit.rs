//! JSON output documents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::extract::{Document, Records};

pub const FORMAT_VERSION: u32 = 1;

/// `{"version": 1, "<key>": [records...]}` with `version` first.
struct Envelope<'a>(&'a Document);

impl Serialize for Envelope<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let doc = self.0;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("version", &FORMAT_VERSION)?;
        match &doc.records {
            Records::Metadata(records) => map.serialize_entry(doc.kind.key(), records)?,
            Records::Variants(records) => map.serialize_entry(doc.kind.key(), records)?,
        }
        map.end()
    }
}

/// Pretty-printed document text, newline-terminated.
pub fn render(doc: &Document) -> Result<String> {
    let mut text = serde_json::to_string_pretty(&Envelope(doc))
        .with_context(|| format!("failed to serialize {}", doc.kind.file_name()))?;
    text.push('\n');
    Ok(text)
}

/// Write `doc` under `dir`, creating the directory if needed.
pub fn write_document(dir: &Path, doc: &Document) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(doc.kind.file_name());
    fs::write(&path, render(doc)?).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentKind;
    use crate::record::{LightPulse, MetadataRecord, VariantRecord};

    fn metadata(records: Vec<MetadataRecord>) -> Document {
        Document {
            kind: DocumentKind::Metadata,
            phases: Vec::new(),
            records: Records::Metadata(records),
        }
    }

    #[test]
    fn version_comes_first() {
        let mut record = MetadataRecord {
            id: 5,
            ..MetadataRecord::default()
        };
        record.set_cut_offset(3, false);
        let text = render(&metadata(vec![record])).unwrap();
        assert!(text.starts_with("{\n  \"version\": 1,\n  \"sprite_metadata\": ["));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["sprite_metadata"][0]["id"], 5);
        assert_eq!(parsed["sprite_metadata"][0]["cut_offset"], 3);
        assert!(parsed["sprite_metadata"][0].get("cut_negative").is_none());
    }

    #[test]
    fn empty_document_has_empty_list() {
        let text = render(&metadata(Vec::new())).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["sprite_metadata"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn review_text_is_not_serialized() {
        let record = VariantRecord {
            id: 100,
            base_sprite: Some(100),
            light_pulse: Some(LightPulse {
                max: 31,
                period: 63,
                divisor: 1,
                offset: 0,
            }),
            needs_review: Some("if (x) sprite = 3;".to_string()),
            ..VariantRecord::default()
        };
        let doc = Document {
            kind: DocumentKind::Animated,
            phases: Vec::new(),
            records: Records::Variants(vec![record]),
        };
        let text = render(&doc).unwrap();
        assert!(!text.contains("needs_review"));
        assert!(!text.contains("sprite = 3"));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["animated_variants"][0]["light_pulse"]["period"], 63);
    }

    #[test]
    fn write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("res").join("config");
        let path = write_document(&out, &metadata(Vec::new())).unwrap();
        assert_eq!(path, out.join("sprite_metadata.json"));
        assert!(fs::read_to_string(path).unwrap().contains("\"version\": 1"));
    }
}
