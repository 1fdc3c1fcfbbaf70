pub mod dialog;
pub mod events;
pub mod notice;
pub mod progress;

pub use dialog::{DialogTransition, ScanDialog};
pub use events::ScanEvent;
pub use notice::CompletionNotice;
pub use progress::ScanProgress;
