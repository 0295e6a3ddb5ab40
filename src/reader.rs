//! Source reader: normalizes raw bytes into the text the lexer consumes.
//!
//! Strips a leading UTF-8 BOM, normalizes CRLF/CR line endings to LF, and
//! records a byte-offset-to-line map for diagnostics raised before the
//! lexer has established its own line/column tracking (e.g. a decoding
//! failure).

use std::fs;
use std::io;
use std::path::Path;

/// Normalized source text plus a line-start byte-offset table.
#[derive(Debug, Clone)]
pub struct SourceReader {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceReader {
    /// Reads `path` fully into memory and normalizes it. BASIC programs are
    /// small (tens of kilobytes at most), so no streaming is attempted.
    pub fn read(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let bytes = strip_bom(bytes);
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let text = normalize_newlines(&text);
        let line_starts = line_starts(&text);
        Ok(Self { text, line_starts })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based source line containing the given byte offset.
    pub fn line_at(&self, offset: usize) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx as u32 + 1,
            Err(idx) => idx as u32,
        }
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
    if bytes.starts_with(&BOM) {
        &bytes[3..]
    } else {
        bytes
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (offset, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(offset + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_normalizes_crlf() {
        let input = [0xEF, 0xBB, 0xBF]
            .iter()
            .copied()
            .chain(b"10 PRINT 1\r\n20 END\r\n".iter().copied())
            .collect::<Vec<_>>();

        let reader = SourceReader::from_bytes(&input).unwrap();
        assert_eq!(reader.text(), "10 PRINT 1\n20 END\n");
    }

    #[test]
    fn line_at_finds_containing_line() {
        let reader = SourceReader::from_bytes(b"10 A=1\n20 B=2\n").unwrap();
        assert_eq!(reader.line_at(0), 1);
        assert_eq!(reader.line_at(7), 2);
    }
}
