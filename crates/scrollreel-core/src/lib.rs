pub mod config;
pub mod draw_in;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod media;
pub mod progress;
pub mod timeline;
pub mod trigger;

pub use config::AppConfig;
pub use easing::Easing;
pub use error::{Error, Result};
pub use geometry::{DeviceClass, ElementId, GeometryProvider, Rect, Viewport};
pub use progress::{Progress, ProgressModel};
pub use timeline::{Frame, Gate, Gates, Timeline, TrackBinding};
