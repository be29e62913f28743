use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::error::ParseError;
use crate::note::SampleId;

/// One `#mmmCC:data` line, kept verbatim until compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLine {
    pub channel: u16,
    pub data: String,
    /// 1-based source line, for diagnostics
    pub line: usize,
}

/// Chart text split into headers, lookup tables and per-measure channel data.
///
/// Nothing here is interpreted in time yet; see [`crate::compile_raw`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChart {
    /// Generic `#KEY VALUE` headers, keys uppercased. Later lines win.
    pub headers: HashMap<String, String>,
    /// `#BPMxx value`
    pub bpm_table: HashMap<u16, f64>,
    /// `#STOPxx value`, in 1/192 of a 4/4 measure
    pub stop_table: HashMap<u16, f64>,
    /// Channel lines per measure index, in source order.
    pub measures: BTreeMap<u32, Vec<ChannelLine>>,
}

impl RawChart {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut raw = RawChart::default();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let Some(rest) = line.trim().strip_prefix('#') else {
                continue;
            };

            if looks_like_measure(rest) {
                match parse_channel_line(rest, line_no)? {
                    Some((measure, channel_line)) => {
                        raw.measures.entry(measure).or_default().push(channel_line);
                    }
                    None => debug!("line {line_no}: ignoring malformed channel line #{rest}"),
                }
                continue;
            }

            let Some((key, value)) = split_header(rest) else {
                debug!("line {line_no}: ignoring header without value #{rest}");
                continue;
            };
            raw.insert_header(key, value, line_no);
        }

        Ok(raw)
    }

    fn insert_header(&mut self, key: String, value: &str, line_no: usize) {
        if let Some(id) = table_id(&key, "BPM") {
            match parse_finite(value) {
                Some(bpm) => {
                    self.bpm_table.insert(id, bpm);
                }
                None => warn!("line {line_no}: unparsable #{key} value {value:?}, skipped"),
            }
            return;
        }
        if let Some(id) = table_id(&key, "STOP") {
            match parse_finite(value) {
                Some(ticks) => {
                    self.stop_table.insert(id, ticks);
                }
                None => warn!("line {line_no}: unparsable #{key} value {value:?}, skipped"),
            }
            return;
        }
        self.headers.insert(key, value.to_string());
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Highest measure index that carries channel data.
    pub fn max_measure(&self) -> Option<u32> {
        self.measures.keys().next_back().copied()
    }
}

/// `mmm` followed by anything: reserved for the channel form.
fn looks_like_measure(rest: &str) -> bool {
    let b = rest.as_bytes();
    b.len() >= 3 && b[..3].iter().all(u8::is_ascii_digit)
}

/// Parse `mmmCC:data`. `Ok(None)` for shapes that are silently skipped.
fn parse_channel_line(
    rest: &str,
    line_no: usize,
) -> Result<Option<(u32, ChannelLine)>, ParseError> {
    let b = rest.as_bytes();
    if b.len() < 6 || b[5] != b':' {
        return Ok(None);
    }
    let (Some(high), Some(low)) = (hex_digit(b[3]), hex_digit(b[4])) else {
        return Ok(None);
    };
    let measure: u32 = match rest[..3].parse() {
        Ok(m) => m,
        Err(_) => return Ok(None),
    };
    let channel = high * 16 + low;

    let data = rest[6..].trim();
    if data.is_empty() {
        return Ok(None);
    }
    if !data.bytes().any(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::EmptyChannelData {
            line: line_no,
            measure,
            channel,
            text: data.to_string(),
        });
    }

    Ok(Some((
        measure,
        ChannelLine {
            channel,
            data: data.to_string(),
            line: line_no,
        },
    )))
}

fn split_header(rest: &str) -> Option<(String, &str)> {
    let (key, value) = rest.split_once(|c: char| c.is_whitespace())?;
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_ascii_uppercase(), value))
}

/// `BPMxx` / `STOPxx` with a two-character base-36 id.
fn table_id(key: &str, prefix: &str) -> Option<u16> {
    let id = key.strip_prefix(prefix)?;
    if id.len() != 2 {
        return None;
    }
    SampleId::from_cell(id).map(|s| s.0)
}

fn hex_digit(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u16),
        b'A'..=b'F' => Some((b - b'A' + 10) as u16),
        b'a'..=b'f' => Some((b - b'a' + 10) as u16),
        _ => None,
    }
}

pub(crate) fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
