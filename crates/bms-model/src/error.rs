use thiserror::Error;

/// Structural failure while reading chart text.
///
/// Most malformed input is skipped rather than reported. The one hard
/// failure is a line that claims to be channel data but carries none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: channel data for #{measure:03}{channel:02X} has no cells: {text:?}")]
    EmptyChannelData {
        line: usize,
        measure: u32,
        channel: u16,
        text: String,
    },
}
