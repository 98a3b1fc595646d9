//! Overlay renderer and headless driver support.
//!
//! The renderer is purely presentational: it reads the target lists the
//! engine cached during its last tick and draws one label per record.

pub mod canvas;
pub mod labels;
pub mod scenario;

pub use canvas::{Canvas, DrawnText, TextCanvas};
pub use labels::{layout, render, Label, LabelStyle};
pub use scenario::{random_world, ScenarioOptions};
