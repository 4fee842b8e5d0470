//! Mouse Input Module
//!
//! Pointer position, buttons and wheel, decoupled from winit. The wheel is
//! reduced to a [`ZoomInput`] direction; only the sign of a wheel event
//! matters to the camera.

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

/// State of the three main mouse buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ButtonState {
    /// Update button state for a specific button.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Middle => self.middle = pressed,
            MouseButton::Right => self.right = pressed,
            MouseButton::Other(_) => {}
        }
    }

    pub fn any_pressed(&self) -> bool {
        self.left || self.middle || self.right
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
            MouseButton::Other(_) => false,
        }
    }
}

/// Scroll wheel delta, can be line-based or pixel-based.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDelta {
    /// Horizontal scroll (positive = right)
    pub x: f64,
    /// Vertical scroll (positive = up/away from the user)
    pub y: f64,
}

impl ScrollDelta {
    /// Create from line delta (common for mouse wheels).
    pub fn from_lines(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create from pixel delta (common for trackpads).
    /// Normalizes by dividing by 100 to get approximate line equivalents.
    pub fn from_pixels(x: f64, y: f64) -> Self {
        Self {
            x: x / 100.0,
            y: y / 100.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Direction of a single wheel notch as seen by the zoom controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomInput {
    /// Move toward the target
    In,
    /// Move away from the target
    Out,
    /// No wheel motion
    None,
}

impl ZoomInput {
    /// Map a DOM-style wheel delta (positive = scrolled toward the user) by sign.
    ///
    /// Zero and NaN deltas produce [`ZoomInput::None`].
    pub fn from_wheel_delta(delta: f64) -> Self {
        if delta > 0.0 {
            ZoomInput::Out
        } else if delta < 0.0 {
            ZoomInput::In
        } else {
            ZoomInput::None
        }
    }

    /// Map a windowing-system scroll delta (positive y = scrolled away).
    pub fn from_scroll(scroll: ScrollDelta) -> Self {
        Self::from_wheel_delta(-scroll.y)
    }

    /// Signed notch: +1 out, -1 in, 0 none.
    pub fn sign(self) -> i8 {
        match self {
            ZoomInput::Out => 1,
            ZoomInput::In => -1,
            ZoomInput::None => 0,
        }
    }
}

/// Pointer state in viewport pixels.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Current pointer position in pixels (origin top-left)
    pub position: Option<(f64, f64)>,
    pub buttons: ButtonState,
    /// Whether the pointer is inside the window
    pub in_window: bool,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Some((x, y));
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        self.buttons.set(button, pressed);
    }

    pub fn enter_window(&mut self) {
        self.in_window = true;
    }

    /// Pointer left: forget the position and release every button so a drag
    /// cannot get stuck.
    pub fn leave_window(&mut self) {
        self.in_window = false;
        self.position = None;
        self.buttons = ButtonState::default();
    }

    /// Orbit drag in progress (left button held).
    pub fn is_orbiting(&self) -> bool {
        self.buttons.left
    }

    /// Pan drag in progress (right button held).
    pub fn is_panning(&self) -> bool {
        self.buttons.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_state_set() {
        let mut buttons = ButtonState::default();
        buttons.set(MouseButton::Left, true);
        assert!(buttons.left);
        assert!(buttons.any_pressed());
        assert!(buttons.is_pressed(MouseButton::Left));
        assert!(!buttons.is_pressed(MouseButton::Right));
        buttons.set(MouseButton::Other(4), true);
        assert!(!buttons.is_pressed(MouseButton::Other(4)));
    }

    #[test]
    fn test_zoom_input_from_wheel_sign() {
        assert_eq!(ZoomInput::from_wheel_delta(120.0), ZoomInput::Out);
        assert_eq!(ZoomInput::from_wheel_delta(-0.5), ZoomInput::In);
        assert_eq!(ZoomInput::from_wheel_delta(0.0), ZoomInput::None);
        assert_eq!(ZoomInput::from_wheel_delta(f64::NAN), ZoomInput::None);
    }

    #[test]
    fn test_zoom_input_from_scroll_is_inverted() {
        // Scrolling away from the user zooms in
        assert_eq!(ZoomInput::from_scroll(ScrollDelta::from_lines(0.0, 1.0)), ZoomInput::In);
        assert_eq!(ZoomInput::from_scroll(ScrollDelta::from_pixels(0.0, -240.0)), ZoomInput::Out);
        assert_eq!(ZoomInput::Out.sign(), 1);
    }

    #[test]
    fn test_scroll_delta() {
        let scroll = ScrollDelta::from_lines(0.0, 2.0);
        assert!(!scroll.is_zero());
        assert_eq!(scroll.y, 2.0);

        let scroll_px = ScrollDelta::from_pixels(0.0, 200.0);
        assert_eq!(scroll_px.y, 2.0);
    }

    #[test]
    fn test_leave_window_releases_buttons() {
        let mut mouse = MouseState::new();
        mouse.enter_window();
        mouse.set_position(10.0, 20.0);
        mouse.set_button(MouseButton::Left, true);
        assert!(mouse.is_orbiting());

        mouse.leave_window();
        assert!(!mouse.is_orbiting());
        assert!(mouse.position.is_none());
    }
}
