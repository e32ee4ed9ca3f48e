//! leuki: blood-count and chemotherapy tracking with a deterministic chart
//! layout engine.
//!
//! The crate is the presentation-independent core of the application. A UI
//! shell edits records through [`session::Session`], persists them through
//! [`record`] and [`settings`], and draws whatever [`layout`] and [`render`]
//! produce on its own surface.

pub mod core;
pub mod error;
pub mod layout;
pub mod record;
pub mod render;
pub mod session;
pub mod settings;
pub mod telemetry;

pub use error::{LeukiError, LeukiResult};
pub use layout::{ChartLayout, ChartLayoutEngine, LayoutConfig, LayoutRequest};
pub use record::PatientRecord;
pub use session::Session;
pub use settings::AppSettings;
