/// Terminal frontend for polyview: CPU rasterizer, PNG capture and
/// the interactive viewer
pub mod app;
pub mod capture;
pub mod config;
pub mod render;
pub mod viewer;

pub use capture::{RenderBackend, SCREENSHOT_FILE};
pub use config::{Config, ConfigError};
pub use render::{render_scene, FrameBuffer};
pub use viewer::{TerminalViewer, ViewerEvent, ViewerSession};
