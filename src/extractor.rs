//! Reads the complete lines appended to a file since a byte offset

use std::io::{Read, Seek, SeekFrom};
use crate::config::PartialLinePolicy;

/// Lines read in one pass plus the offset just past the last one consumed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub lines: Vec<String>,
    pub offset: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct LineExtractor {
    partial_lines: PartialLinePolicy,
    max_read_bytes: u64,
}

impl LineExtractor {
    pub fn new(partial_lines: PartialLinePolicy, max_read_bytes: u64) -> Self {
        Self {
            partial_lines,
            max_read_bytes,
        }
    }

    /// Read everything available after `offset` and split it into lines.
    ///
    /// On error the caller keeps its old offset; nothing here is consumed.
    pub fn extract<R: Read + Seek>(&self, reader: &mut R, offset: u64) -> std::io::Result<Extracted> {
        let end = reader.seek(SeekFrom::End(0))?;
        if end <= offset {
            if end < offset {
                tracing::debug!("File shrank below offset {} (now {} bytes)", offset, end);
            }
            return Ok(Extracted { lines: Vec::new(), offset });
        }

        reader.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::new();
        reader
            .take(self.max_read_bytes.min(end - offset))
            .read_to_end(&mut buf)?;

        let hit_limit = offset + (buf.len() as u64) < end;
        Ok(self.split(&buf, offset, hit_limit))
    }

    fn split(&self, buf: &[u8], offset: u64, hit_limit: bool) -> Extracted {
        let mut lines = Vec::new();
        let mut consumed = 0usize;

        for chunk in buf.split_inclusive(|b| *b == b'\n') {
            let terminated = chunk.last() == Some(&b'\n');
            // A fragment cut off by the read bound is never a complete line
            if !terminated && (hit_limit || self.partial_lines == PartialLinePolicy::Withhold) {
                break;
            }
            lines.push(decode_line(chunk));
            consumed += chunk.len();
        }

        // One line longer than the read bound: hand it over in pieces
        if consumed == 0 && hit_limit {
            lines.push(decode_line(buf));
            consumed = buf.len();
        }

        Extracted {
            lines,
            offset: offset + consumed as u64,
        }
    }
}

fn decode_line(chunk: &[u8]) -> String {
    let line = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
