//! Input Module
//!
//! Platform-agnostic mouse and wheel handling. Decoupled from winit so the
//! camera can be driven by native windows, the browser, or tests alike.

pub mod mouse;

pub use mouse::{ButtonState, MouseButton, MouseState, ScrollDelta, ZoomInput};
