pub mod normalize;
pub mod snapshot;

pub use normalize::{normalize, round_wire};
pub use snapshot::{TelemetryField, TelemetrySnapshot};
