pub mod clock;
pub mod orchestrator;
pub mod phase;
pub mod simulator;
pub mod state;
pub mod timeline;

pub use clock::{Clock, TokioClock, VirtualClock};
pub use orchestrator::{RunOutcome, ScanOrchestrator, ScanSummary};
pub use simulator::ScanSimulator;
pub use state::{ScanSnapshot, ScanStatus, ScanUpdate, COMPLETED_LABEL};
pub use timeline::{Timeline, TimelineEntry};
