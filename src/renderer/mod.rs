//! 2D canvas rendering module
//!
//! Painting reads the simulation and never changes it. The HUD model is
//! derived from the same snapshot the host page sees.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod hud;
pub mod painter;
pub mod surface;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2d;
pub use hud::HudModel;
pub use painter::{Overlay, overlay_for, paint_frame};
pub use surface::{DrawOp, RecordingSurface, Surface, TextAlign, TextBaseline};
