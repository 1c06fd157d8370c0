//! Netpbm graymap reader/writer.
//!
//! Two encodings are supported: `P2` (whitespace-separated decimal samples) and `P5` (binary,
//! one byte per sample when `maxval < 256`, otherwise two big-endian bytes). The header is
//! `magic width height maxval`, with `#` comments allowed between tokens.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{MAX_DEPTH, Sample};
use crate::foundation::error::{GraymapError, GraymapResult};

/// Netpbm magic number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileType {
    /// ASCII bitmap.
    P1,
    /// ASCII graymap.
    P2,
    /// ASCII pixmap.
    P3,
    /// Binary bitmap.
    P4,
    /// Binary graymap.
    P5,
    /// Binary pixmap.
    P6,
}

impl FileType {
    /// `true` for the binary encodings.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::P4 | Self::P5 | Self::P6)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::P5 => "P5",
            Self::P6 => "P6",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = GraymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "P1" => Self::P1,
            "P2" => Self::P2,
            "P3" => Self::P3,
            "P4" => Self::P4,
            "P5" => Self::P5,
            "P6" => Self::P6,
            other => {
                return Err(GraymapError::format(format!(
                    "unknown magic number '{other}'"
                )));
            }
        })
    }
}

/// A decoded graymap: encoding plus samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pgm {
    /// Encoding the image was read with; reused when writing.
    pub file_type: FileType,
    /// Samples and dimensions.
    pub buffer: PixelBuffer,
}

impl Pgm {
    /// Read and decode a file.
    pub fn load(path: &Path) -> GraymapResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| GraymapError::io(path, e))?;
        decode(&bytes)
    }

    /// Encode and write to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path, comment: Option<&str>) -> GraymapResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| GraymapError::io(parent, e))?;
        }
        let bytes = encode(self.file_type, &self.buffer, comment)?;
        std::fs::write(path, bytes).map_err(|e| GraymapError::io(path, e))
    }
}

struct Header {
    file_type: FileType,
    width: usize,
    height: usize,
    maxval: Sample,
    /// Offset of the first data byte.
    data_start: usize,
}

/// Decode a `P2` or `P5` graymap.
pub fn decode(bytes: &[u8]) -> GraymapResult<Pgm> {
    let header = read_header(bytes)?;
    let len = header
        .width
        .checked_mul(header.height)
        .ok_or_else(|| GraymapError::format("image dimensions overflow"))?;
    let data = &bytes[header.data_start..];

    let samples = match header.file_type {
        FileType::P2 => decode_ascii(data, len, header.maxval)?,
        FileType::P5 => decode_binary(data, len, header.maxval)?,
        other => {
            return Err(GraymapError::format(format!(
                "{other} is not a graymap encoding"
            )));
        }
    };

    let buffer = PixelBuffer::from_samples(header.height, header.width, header.maxval, samples)?;
    Ok(Pgm {
        file_type: header.file_type,
        buffer,
    })
}

/// Encode `buffer` as `P2` or `P5`.
///
/// `comment` is written on its own line after the magic number; a leading `#` is added when
/// missing.
pub fn encode(
    file_type: FileType,
    buffer: &PixelBuffer,
    comment: Option<&str>,
) -> GraymapResult<Vec<u8>> {
    buffer.ensure_loaded()?;
    if !matches!(file_type, FileType::P2 | FileType::P5) {
        return Err(GraymapError::format(format!(
            "cannot write {file_type} from a graymap"
        )));
    }

    let mut out = format!("{file_type}\n").into_bytes();
    if let Some(c) = comment.filter(|c| !c.is_empty()) {
        for line in c.lines() {
            if !line.starts_with('#') {
                out.extend_from_slice(b"# ");
            }
            out.extend_from_slice(line.as_bytes());
            out.push(b'\n');
        }
    }
    out.extend_from_slice(
        format!("{} {}\n{}\n", buffer.columns(), buffer.rows(), buffer.depth()).as_bytes(),
    );

    if file_type == FileType::P5 {
        let wide = buffer.depth() > 255;
        for &v in buffer.export_samples() {
            if wide {
                out.extend_from_slice(&(v as u16).to_be_bytes());
            } else {
                out.push(v as u8);
            }
        }
    } else {
        for r in 0..buffer.rows() {
            let line = buffer
                .row(r)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            out.extend_from_slice(line.as_bytes());
            out.push(b'\n');
        }
    }
    Ok(out)
}

fn read_header(bytes: &[u8]) -> GraymapResult<Header> {
    let mut cursor = Cursor { bytes, pos: 0 };
    let magic = cursor
        .token()
        .ok_or_else(|| GraymapError::format("missing magic number"))?;
    let file_type: FileType = std::str::from_utf8(magic)
        .map_err(|_| GraymapError::format("magic number is not ascii"))?
        .parse()?;

    let width = cursor.number("width")?;
    let height = cursor.number("height")?;
    let maxval = cursor.number("maxval")?;
    if maxval == 0 || maxval > MAX_DEPTH as usize {
        return Err(GraymapError::format(format!(
            "maxval must be within 1..={MAX_DEPTH}, got {maxval}"
        )));
    }

    // Exactly one whitespace byte separates the header from the raster.
    match bytes.get(cursor.pos) {
        Some(b) if b.is_ascii_whitespace() => cursor.pos += 1,
        Some(_) => return Err(GraymapError::format("header must end with whitespace")),
        None if width.saturating_mul(height) == 0 => {}
        None => return Err(GraymapError::format("missing raster data")),
    }

    Ok(Header {
        file_type,
        width,
        height,
        maxval: maxval as Sample,
        data_start: cursor.pos,
    })
}

fn decode_ascii(data: &[u8], len: usize, maxval: Sample) -> GraymapResult<Vec<Sample>> {
    let mut cursor = Cursor { bytes: data, pos: 0 };
    let mut samples = Vec::with_capacity(len);
    for i in 0..len {
        let v = cursor.number("sample").map_err(|_| {
            GraymapError::format(format!("expected {len} samples, found {i}"))
        })?;
        samples.push(check_sample(v, maxval)?);
    }
    Ok(samples)
}

fn decode_binary(data: &[u8], len: usize, maxval: Sample) -> GraymapResult<Vec<Sample>> {
    let width = if maxval > 255 { 2 } else { 1 };
    let need = len * width;
    if data.len() < need {
        return Err(GraymapError::format(format!(
            "expected {need} data bytes, found {}",
            data.len()
        )));
    }
    data[..need]
        .chunks_exact(width)
        .map(|b| {
            let v = if width == 2 {
                usize::from(u16::from_be_bytes([b[0], b[1]]))
            } else {
                usize::from(b[0])
            };
            check_sample(v, maxval)
        })
        .collect()
}

fn check_sample(v: usize, maxval: Sample) -> GraymapResult<Sample> {
    if v > maxval as usize {
        return Err(GraymapError::format(format!(
            "sample {v} exceeds maxval {maxval}"
        )));
    }
    Ok(v as Sample)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Skip whitespace and `#` comments up to the next token.
    fn skip_blank(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_blank();
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'#')
        {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.bytes[start..self.pos])
    }

    fn number(&mut self, field: &str) -> GraymapResult<usize> {
        let tok = self
            .token()
            .ok_or_else(|| GraymapError::format(format!("missing {field}")))?;
        std::str::from_utf8(tok)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| {
                GraymapError::format(format!(
                    "{field} is not a number: '{}'",
                    String::from_utf8_lossy(tok)
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/pgm.rs"]
mod tests;
