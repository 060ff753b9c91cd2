pub mod segment;
#[allow(clippy::module_inception)]
pub mod timeline;

pub use segment::{Segment, SegmentEnd};
pub use timeline::Timeline;
