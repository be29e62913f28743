use encoding_rs::{EUC_JP, SHIFT_JIS};
use log::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode chart file bytes to text.
///
/// Tries a UTF-8 BOM, strict UTF-8, Shift_JIS then EUC-JP, and falls back to
/// lossy Shift_JIS. Most charts in the wild are Shift_JIS.
pub fn decode_bytes(raw: &[u8]) -> String {
    if let Some(body) = raw.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(body).into_owned();
    }

    if let Ok(s) = std::str::from_utf8(raw) {
        return s.to_string();
    }

    for encoding in [SHIFT_JIS, EUC_JP] {
        let (decoded, _, had_errors) = encoding.decode(raw);
        if !had_errors {
            debug!("decoded chart as {}", encoding.name());
            return decoded.into_owned();
        }
    }

    debug!("chart is not valid in any known encoding, decoding lossily");
    let (decoded, _, _) = SHIFT_JIS.decode(raw);
    decoded.into_owned()
}
