mod camera;
mod component;
mod config;
mod render;
mod state;
mod types;

pub use camera::{Bounds, GraphCamera, ViewTransform};
pub use component::KnowledgeGraphCanvas;
pub use config::{LayoutConfig, SETTINGS_KEY};
pub use state::{ForceGraphState, NodeInfo, Release, SettleTimer};
pub use types::{CameraCommand, ModeForces, ViewMode};
