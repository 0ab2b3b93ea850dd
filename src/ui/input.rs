use crate::foundation::core::Point;

/// Pointer buttons the scene reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Snapshot of the pointer, in virtual-screen coordinates.
pub trait InputSource {
    /// Pointer position.
    fn pointer_position(&self) -> Point;

    /// Whether `button` is held this frame.
    fn is_pointer_button_down(&self, button: PointerButton) -> bool;
}

/// Plain pointer snapshot, for hosts that poll their windowing layer once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerState {
    pub position: Point,
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl PointerState {
    /// Pointer at `(x, y)` with every button up.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Same snapshot with `button` held.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        match button {
            PointerButton::Left => self.left = true,
            PointerButton::Right => self.right = true,
            PointerButton::Middle => self.middle = true,
        }
        self
    }
}

impl InputSource for PointerState {
    fn pointer_position(&self) -> Point {
        self.position
    }

    fn is_pointer_button_down(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Left => self.left,
            PointerButton::Right => self.right,
            PointerButton::Middle => self.middle,
        }
    }
}
