use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Text encoding the source was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1 fallback: every byte maps to the code point of the same value,
    /// so decoding cannot fail.
    Latin1,
}

#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    text: String,
    encoding: Encoding,
    /// Byte offsets where each line starts (0-indexed into text)
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Read and decode a source file. A missing path is the one fatal error of
    /// an extraction run.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("{} not found", path.display());
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_vec(path.to_path_buf(), bytes))
    }

    /// Decode raw bytes as UTF-8, retrying as Latin-1 when they are not valid UTF-8.
    pub fn from_vec(path: PathBuf, content: Vec<u8>) -> Self {
        let (text, encoding) = match String::from_utf8(content) {
            Ok(text) => (text, Encoding::Utf8),
            Err(e) => (decode_latin1(e.as_bytes()), Encoding::Latin1),
        };
        let line_starts = compute_line_starts(&text);
        Self {
            path,
            text,
            encoding,
            line_starts,
        }
    }

    /// Create a SourceFile from a string, using the given path for display purposes.
    pub fn from_string(path: PathBuf, text: String) -> Self {
        let line_starts = compute_line_starts(&text);
        Self {
            path,
            text,
            encoding: Encoding::Utf8,
            line_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a 1-indexed line number.
    pub fn offset_to_line(&self, byte_offset: usize) -> usize {
        match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx.max(1),
        }
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = vec![0];
    for (i, &byte) in bytes.iter().enumerate() {
        if byte == b'\n' && i + 1 < bytes.len() {
            starts.push(i + 1);
        }
    }
    starts
}
