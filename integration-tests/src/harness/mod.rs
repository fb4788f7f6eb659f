mod fixture;
pub mod tracing;

pub use fixture::{LogFixture, PREFIX, access_line};
pub use tracing::{CapturedEvent, capture_events};
