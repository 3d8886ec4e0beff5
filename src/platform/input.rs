//! Input handling
//!
//! Key and button events are folded into an `InputState` the loop reads once
//! per frame. Pause is a one-shot request rather than a held state.

use crate::consts::DESKTOP_MIN_WIDTH;
use crate::settings::ControlPreference;
use crate::tuning::KeyBindings;

/// Held controls, sampled by the loop each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// On-screen touch/mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Shoot,
}

impl Button {
    /// DOM id of the button element
    pub fn element_id(&self) -> &'static str {
        match self {
            Button::Left => "moveLeftBtn",
            Button::Right => "moveRightBtn",
            Button::Shoot => "shootBtn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlScheme {
    Keyboard,
    Touch,
}

impl ControlScheme {
    /// Desktop-sized viewports get the keyboard even with a touchscreen
    pub fn detect(has_touch: bool, viewport_width: f64) -> Self {
        let desktop = viewport_width > DESKTOP_MIN_WIDTH;
        let scheme = if desktop {
            ControlScheme::Keyboard
        } else {
            ControlScheme::Touch
        };
        log::info!(
            "Control scheme: {:?} (touch: {}, viewport: {}px)",
            scheme,
            has_touch,
            viewport_width
        );
        scheme
    }

    pub fn from_preference(pref: ControlPreference, has_touch: bool, viewport_width: f64) -> Self {
        match pref {
            ControlPreference::Auto => Self::detect(has_touch, viewport_width),
            ControlPreference::Keyboard => ControlScheme::Keyboard,
            ControlPreference::Touch => ControlScheme::Touch,
        }
    }
}

/// Translates raw events into `InputState` for the active control scheme
#[derive(Debug)]
pub struct InputAdapter {
    bindings: KeyBindings,
    scheme: ControlScheme,
    state: InputState,
    pause_requested: bool,
    attached: bool,
}

impl InputAdapter {
    pub fn new(bindings: KeyBindings, scheme: ControlScheme) -> Self {
        Self {
            bindings,
            scheme,
            state: InputState::default(),
            pause_requested: false,
            attached: true,
        }
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn accepts_keys(&self, typing: bool) -> bool {
        self.attached && self.scheme == ControlScheme::Keyboard && !typing
    }

    fn bound(list: &[String], key: &str) -> bool {
        list.iter().any(|k| k == key)
    }

    /// Returns true when the key is a game control (the caller should
    /// suppress the browser default). `typing` is true while an editable
    /// element has focus.
    pub fn key_down(&mut self, key: &str, typing: bool) -> bool {
        if !self.accepts_keys(typing) {
            return false;
        }
        let mut handled = false;
        if Self::bound(&self.bindings.left, key) {
            self.state.left = true;
            handled = true;
        }
        if Self::bound(&self.bindings.right, key) {
            self.state.right = true;
            handled = true;
        }
        if Self::bound(&self.bindings.shoot, key) {
            self.state.shoot = true;
            handled = true;
        }
        if Self::bound(&self.bindings.pause, key) {
            log::debug!("Pause key pressed: {:?}", key);
            self.pause_requested = true;
            handled = true;
        }
        handled
    }

    pub fn key_up(&mut self, key: &str, typing: bool) -> bool {
        if !self.accepts_keys(typing) {
            return false;
        }
        let mut handled = false;
        if Self::bound(&self.bindings.left, key) {
            self.state.left = false;
            handled = true;
        }
        if Self::bound(&self.bindings.right, key) {
            self.state.right = false;
            handled = true;
        }
        if Self::bound(&self.bindings.shoot, key) {
            self.state.shoot = false;
            handled = true;
        }
        handled
    }

    fn set_button(&mut self, button: Button, held: bool) {
        if !self.attached || self.scheme != ControlScheme::Touch {
            return;
        }
        match button {
            Button::Left => self.state.left = held,
            Button::Right => self.state.right = held,
            Button::Shoot => self.state.shoot = held,
        }
    }

    pub fn button_down(&mut self, button: Button) {
        self.set_button(button, true);
    }

    pub fn button_up(&mut self, button: Button) {
        self.set_button(button, false);
    }

    /// External pause request (the pause button)
    pub fn request_pause(&mut self) {
        if self.attached {
            self.pause_requested = true;
        }
    }

    /// Consume the pending pause request
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_requested)
    }

    /// Release everything and stop reacting to events
    pub fn detach(&mut self) {
        self.state = InputState::default();
        self.pause_requested = false;
        self.attached = false;
    }
}
