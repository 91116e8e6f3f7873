//! Core data structures for building records.

mod range;
mod record;

pub use range::SampleRange;
pub use record::{BuildingRecord, Channel, ChannelData, RecordBuilder};
