//! Frame driver: runs update then render once per host frame.
//!
//! # Invariants
//! - Frame N is updated and rendered before frame N+1 is updated.
//! - Movement is scaled by elapsed time relative to the nominal frame interval.
//! - Input listeners are detached on every exit path.
//! - Stop requests take effect at frame boundaries only.

pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod timing;

pub use config::GameConfig;
pub use driver::{DriverState, FrameDriver, RunOutcome, RunSummary, StopHandle};
pub use error::DriverError;
pub use host::{FrameHost, KeyEvent, ScriptedHost};
pub use timing::{DeltaTimer, FixedRateClock, frame_interval};

pub fn crate_info() -> &'static str {
    "canvaswalk-driver v0.1.0"
}
