pub mod event;
pub mod manifest;
pub mod render;
pub mod scheduler;
pub mod section;
pub mod sections;
pub mod stage;
pub mod telemetry;
pub mod triggers;

pub use event::{ClickTarget, PageEvent};
pub use manifest::PageManifest;
pub use render::{RecordingTarget, RenderTarget, ScrollBehavior};
pub use stage::{Stage, StageStats};
