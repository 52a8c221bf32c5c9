pub mod axis;
pub mod bubble;
pub mod timeline;

pub use bubble::{BUBBLE_MARGIN, BubbleChart, BubbleHit};
pub use timeline::{TIMELINE_MARGIN, TimelineChart};
