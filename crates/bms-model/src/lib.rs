// BMS chart compiler: raw chart text to an absolute-time timeline

mod channel;
mod compile;
mod decode;
mod error;
mod model;
mod note;
mod pattern;
mod raw;
mod stats;

pub use channel::{
    ALL_LANES, BgaLayer, CH_BGA_BASE, CH_BGA_LAYER, CH_BGA_POOR, CH_BGM, CH_BPM_LITERAL,
    CH_BPM_TABLE, CH_MEASURE_SCALE, CH_STOP, ChannelKind, ChannelRole, Lane, Side,
};
pub use compile::{BPM_EPSILON, DEFAULT_BPM, compile, compile_raw};
pub use decode::decode_bytes;
pub use error::ParseError;
pub use model::{CompiledChart, DEFAULT_RANK, MAX_RANK, default_total};
pub use note::{BgaEvent, BgmEvent, BpmEvent, Note, SampleId, StopEvent, Timed};
pub use pattern::LaneModifier;
pub use raw::{ChannelLine, RawChart};
