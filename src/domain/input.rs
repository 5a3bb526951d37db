//! `Input` domain.
//!
//! Params records for the Input commands. Every command returns an empty
//! object, decoded as [`Empty`].
//!
//! Optional fields are `None` unless set through a `with_*` method and are
//! then left off the wire, so the remote end applies its own default. An
//! explicit zero or `false` is always sent.
//!
//! # Example
//!
//! ```no_run
//! use cdtp::Session;
//! use cdtp::domain::input::{DispatchKeyEventParams, KeyEventType};
//!
//! # async fn example(session: Session) -> cdtp::Result<()> {
//! let down = DispatchKeyEventParams::new(KeyEventType::KeyDown)
//!     .with_code("KeyA")
//!     .with_key("a")
//!     .with_text("a");
//! session.call(&down).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::protocol::{Command, Empty};

// ============================================================================
// Shared Types
// ============================================================================

/// Seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSinceEpoch(pub f64);

/// Modifier key bit field values.
pub mod modifiers {
    /// Alt key.
    pub const ALT: i64 = 1;
    /// Control key.
    pub const CTRL: i64 = 2;
    /// Meta / Command key.
    pub const META: i64 = 4;
    /// Shift key.
    pub const SHIFT: i64 = 8;
}

/// Key event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Key pressed without text generation.
    RawKeyDown,
    /// Character input.
    Char,
}

/// Mouse event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    /// Button pressed.
    MousePressed,
    /// Button released.
    MouseReleased,
    /// Pointer moved.
    MouseMoved,
    /// Wheel scrolled.
    MouseWheel,
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseButton {
    /// No button.
    None,
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
}

/// Touch event kind.
///
/// `TouchEnd` and `TouchCancel` carry no touch points; `TouchStart` and
/// `TouchMove` carry at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchEventType {
    /// First contact.
    TouchStart,
    /// Contact lifted.
    TouchEnd,
    /// Contact moved.
    TouchMove,
    /// Sequence cancelled.
    TouchCancel,
}

/// Input source used by synthesized gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureSourceType {
    /// Platform preferred source.
    Default,
    /// Touch input.
    Touch,
    /// Mouse input.
    Mouse,
}

/// One active touch point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    /// X coordinate in CSS pixels.
    pub x: f64,
    /// Y coordinate in CSS pixels.
    pub y: f64,
    /// X radius of the touch area (default: 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_x: Option<f64>,
    /// Y radius of the touch area (default: 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_y: Option<f64>,
    /// Rotation angle (default: 0.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_angle: Option<f64>,
    /// Force (default: 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<f64>,
    /// Identifier used to track the point between events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<f64>,
}

impl TouchPoint {
    /// Creates a touch point at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius_x: None,
            radius_y: None,
            rotation_angle: None,
            force: None,
            id: None,
        }
    }

    /// Sets both radii.
    #[inline]
    #[must_use]
    pub fn with_radius(mut self, radius_x: f64, radius_y: f64) -> Self {
        self.radius_x = Some(radius_x);
        self.radius_y = Some(radius_y);
        self
    }

    /// Sets the rotation angle.
    #[inline]
    #[must_use]
    pub fn with_rotation_angle(mut self, angle: f64) -> Self {
        self.rotation_angle = Some(angle);
        self
    }

    /// Sets the force.
    #[inline]
    #[must_use]
    pub fn with_force(mut self, force: f64) -> Self {
        self.force = Some(force);
        self
    }

    /// Sets the tracking id.
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: f64) -> Self {
        self.id = Some(id);
        self
    }
}

// ============================================================================
// Input.dispatchKeyEvent
// ============================================================================

/// Dispatches a key event to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEventParams {
    /// Kind of key event.
    #[serde(rename = "type")]
    pub kind: KeyEventType,
    /// Pressed modifier keys, see [`modifiers`] (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i64>,
    /// Time at which the event occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimeSinceEpoch>,
    /// Text generated by the key with the current layout (default: "").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text the key would generate without modifiers except shift (default: "").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmodified_text: Option<String>,
    /// Unique key identifier, e.g. `U+0041` (default: "").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_identifier: Option<String>,
    /// Physical key, e.g. `KeyA` (default: "").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Key meaning with the active modifiers and layout, e.g. `AltGr` (default: "").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Windows virtual key code (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_virtual_key_code: Option<i64>,
    /// Native virtual key code (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_virtual_key_code: Option<i64>,
    /// Generated by auto repeat (default: false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repeat: Option<bool>,
    /// Generated from the keypad (default: false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_keypad: Option<bool>,
    /// System key event (default: false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system_key: Option<bool>,
    /// Left (1) or right (2) side of the keyboard (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<i64>,
}

impl DispatchKeyEventParams {
    /// Creates params with only the event kind set.
    #[inline]
    #[must_use]
    pub fn new(kind: KeyEventType) -> Self {
        Self {
            kind,
            modifiers: None,
            timestamp: None,
            text: None,
            unmodified_text: None,
            key_identifier: None,
            code: None,
            key: None,
            windows_virtual_key_code: None,
            native_virtual_key_code: None,
            auto_repeat: None,
            is_keypad: None,
            is_system_key: None,
            location: None,
        }
    }

    /// Sets the modifier bit field.
    #[inline]
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: i64) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Sets the event time.
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: TimeSinceEpoch) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the generated text.
    #[inline]
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the unmodified text.
    #[inline]
    #[must_use]
    pub fn with_unmodified_text(mut self, text: impl Into<String>) -> Self {
        self.unmodified_text = Some(text.into());
        self
    }

    /// Sets the key identifier.
    #[inline]
    #[must_use]
    pub fn with_key_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.key_identifier = Some(identifier.into());
        self
    }

    /// Sets the physical key code.
    #[inline]
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the key value.
    #[inline]
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the Windows virtual key code.
    #[inline]
    #[must_use]
    pub fn with_windows_virtual_key_code(mut self, code: i64) -> Self {
        self.windows_virtual_key_code = Some(code);
        self
    }

    /// Sets the native virtual key code.
    #[inline]
    #[must_use]
    pub fn with_native_virtual_key_code(mut self, code: i64) -> Self {
        self.native_virtual_key_code = Some(code);
        self
    }

    /// Marks the event as auto repeat.
    #[inline]
    #[must_use]
    pub fn with_auto_repeat(mut self, auto_repeat: bool) -> Self {
        self.auto_repeat = Some(auto_repeat);
        self
    }

    /// Marks the event as coming from the keypad.
    #[inline]
    #[must_use]
    pub fn with_is_keypad(mut self, is_keypad: bool) -> Self {
        self.is_keypad = Some(is_keypad);
        self
    }

    /// Marks the event as a system key event.
    #[inline]
    #[must_use]
    pub fn with_is_system_key(mut self, is_system_key: bool) -> Self {
        self.is_system_key = Some(is_system_key);
        self
    }

    /// Sets the keyboard side.
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: i64) -> Self {
        self.location = Some(location);
        self
    }
}

impl Command for DispatchKeyEventParams {
    const METHOD: &'static str = "Input.dispatchKeyEvent";
    type Response = Empty;
}

// ============================================================================
// Input.dispatchMouseEvent
// ============================================================================

/// Dispatches a mouse event to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseEventParams {
    /// Kind of mouse event.
    #[serde(rename = "type")]
    pub kind: MouseEventType,
    /// X coordinate relative to the main frame's viewport in CSS pixels.
    pub x: f64,
    /// Y coordinate relative to the main frame's viewport in CSS pixels.
    pub y: f64,
    /// Pressed modifier keys (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i64>,
    /// Time at which the event occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimeSinceEpoch>,
    /// Mouse button (default: none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    /// Number of clicks (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i64>,
    /// Wheel X delta in CSS pixels (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    /// Wheel Y delta in CSS pixels (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
}

impl DispatchMouseEventParams {
    /// Creates params for an event at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn new(kind: MouseEventType, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: None,
            timestamp: None,
            button: None,
            click_count: None,
            delta_x: None,
            delta_y: None,
        }
    }

    /// Sets the modifier bit field.
    #[inline]
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: i64) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Sets the event time.
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: TimeSinceEpoch) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the button.
    #[inline]
    #[must_use]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Sets the click count.
    #[inline]
    #[must_use]
    pub fn with_click_count(mut self, count: i64) -> Self {
        self.click_count = Some(count);
        self
    }

    /// Sets the wheel deltas.
    #[inline]
    #[must_use]
    pub fn with_delta(mut self, delta_x: f64, delta_y: f64) -> Self {
        self.delta_x = Some(delta_x);
        self.delta_y = Some(delta_y);
        self
    }
}

impl Command for DispatchMouseEventParams {
    const METHOD: &'static str = "Input.dispatchMouseEvent";
    type Response = Empty;
}

// ============================================================================
// Input.dispatchTouchEvent
// ============================================================================

/// Dispatches a touch event to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchTouchEventParams {
    /// Kind of touch event.
    #[serde(rename = "type")]
    pub kind: TouchEventType,
    /// Active touch points. Always sent, empty for end and cancel.
    pub touch_points: Vec<TouchPoint>,
    /// Pressed modifier keys (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i64>,
    /// Time at which the event occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimeSinceEpoch>,
}

impl DispatchTouchEventParams {
    /// Creates params with the given touch points.
    #[inline]
    #[must_use]
    pub fn new(kind: TouchEventType, touch_points: Vec<TouchPoint>) -> Self {
        Self {
            kind,
            touch_points,
            modifiers: None,
            timestamp: None,
        }
    }

    /// Sets the modifier bit field.
    #[inline]
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: i64) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Sets the event time.
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: TimeSinceEpoch) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl Command for DispatchTouchEventParams {
    const METHOD: &'static str = "Input.dispatchTouchEvent";
    type Response = Empty;
}

// ============================================================================
// Input.emulateTouchFromMouseEvent
// ============================================================================

/// Emulates a touch event from a mouse event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmulateTouchFromMouseEventParams {
    /// Kind of mouse event.
    #[serde(rename = "type")]
    pub kind: MouseEventType,
    /// X coordinate of the pointer in DIP.
    pub x: i64,
    /// Y coordinate of the pointer in DIP.
    pub y: i64,
    /// Time at which the event occurred.
    pub timestamp: TimeSinceEpoch,
    /// Mouse button.
    pub button: MouseButton,
    /// Wheel X delta in DIP (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    /// Wheel Y delta in DIP (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
    /// Pressed modifier keys (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i64>,
    /// Number of clicks (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i64>,
}

impl EmulateTouchFromMouseEventParams {
    /// Creates params with every required field.
    #[inline]
    #[must_use]
    pub fn new(
        kind: MouseEventType,
        x: i64,
        y: i64,
        timestamp: TimeSinceEpoch,
        button: MouseButton,
    ) -> Self {
        Self {
            kind,
            x,
            y,
            timestamp,
            button,
            delta_x: None,
            delta_y: None,
            modifiers: None,
            click_count: None,
        }
    }

    /// Sets the wheel deltas.
    #[inline]
    #[must_use]
    pub fn with_delta(mut self, delta_x: f64, delta_y: f64) -> Self {
        self.delta_x = Some(delta_x);
        self.delta_y = Some(delta_y);
        self
    }

    /// Sets the modifier bit field.
    #[inline]
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: i64) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Sets the click count.
    #[inline]
    #[must_use]
    pub fn with_click_count(mut self, count: i64) -> Self {
        self.click_count = Some(count);
        self
    }
}

impl Command for EmulateTouchFromMouseEventParams {
    const METHOD: &'static str = "Input.emulateTouchFromMouseEvent";
    type Response = Empty;
}

// ============================================================================
// Input.setIgnoreInputEvents
// ============================================================================

/// Ignores input events processing when `ignore` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIgnoreInputEventsParams {
    /// Whether to ignore input events.
    pub ignore: bool,
}

impl SetIgnoreInputEventsParams {
    /// Creates the params.
    #[inline]
    #[must_use]
    pub const fn new(ignore: bool) -> Self {
        Self { ignore }
    }
}

impl Command for SetIgnoreInputEventsParams {
    const METHOD: &'static str = "Input.setIgnoreInputEvents";
    type Response = Empty;
}

// ============================================================================
// Input.synthesizePinchGesture
// ============================================================================

/// Synthesizes a pinch gesture over a time period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizePinchGestureParams {
    /// X coordinate of the start of the gesture in CSS pixels.
    pub x: f64,
    /// Y coordinate of the start of the gesture in CSS pixels.
    pub y: f64,
    /// Relative scale factor after zooming (>1.0 zooms in, <1.0 zooms out).
    pub scale_factor: f64,
    /// Relative pointer speed in pixels per second (default: 800).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_speed: Option<i64>,
    /// Input source; absent lets the remote end pick the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_source_type: Option<GestureSourceType>,
}

impl SynthesizePinchGestureParams {
    /// Creates params for a pinch at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, scale_factor: f64) -> Self {
        Self {
            x,
            y,
            scale_factor,
            relative_speed: None,
            gesture_source_type: None,
        }
    }

    /// Sets the pointer speed.
    #[inline]
    #[must_use]
    pub fn with_relative_speed(mut self, speed: i64) -> Self {
        self.relative_speed = Some(speed);
        self
    }

    /// Sets the input source.
    #[inline]
    #[must_use]
    pub fn with_gesture_source_type(mut self, source: GestureSourceType) -> Self {
        self.gesture_source_type = Some(source);
        self
    }
}

impl Command for SynthesizePinchGestureParams {
    const METHOD: &'static str = "Input.synthesizePinchGesture";
    type Response = Empty;
}

// ============================================================================
// Input.synthesizeScrollGesture
// ============================================================================

/// Synthesizes a scroll gesture over a time period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeScrollGestureParams {
    /// X coordinate of the start of the gesture in CSS pixels.
    pub x: f64,
    /// Y coordinate of the start of the gesture in CSS pixels.
    pub y: f64,
    /// Distance to scroll along the X axis (positive scrolls left).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_distance: Option<f64>,
    /// Distance to scroll along the Y axis (positive scrolls up).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_distance: Option<f64>,
    /// Extra pixels to scroll back along the X axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_overscroll: Option<f64>,
    /// Extra pixels to scroll back along the Y axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_overscroll: Option<f64>,
    /// Prevent fling (default: true).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_fling: Option<bool>,
    /// Swipe speed in pixels per second (default: 800).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i64>,
    /// Input source; absent lets the remote end pick the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_source_type: Option<GestureSourceType>,
    /// Number of times to repeat the gesture (default: 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<i64>,
    /// Milliseconds between repeats (default: 250).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_delay_ms: Option<i64>,
    /// Name of the interaction markers to generate (default: "").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_marker_name: Option<String>,
}

impl SynthesizeScrollGestureParams {
    /// Creates params for a scroll starting at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            x_distance: None,
            y_distance: None,
            x_overscroll: None,
            y_overscroll: None,
            prevent_fling: None,
            speed: None,
            gesture_source_type: None,
            repeat_count: None,
            repeat_delay_ms: None,
            interaction_marker_name: None,
        }
    }

    /// Sets the scroll distances.
    #[inline]
    #[must_use]
    pub fn with_distance(mut self, x_distance: f64, y_distance: f64) -> Self {
        self.x_distance = Some(x_distance);
        self.y_distance = Some(y_distance);
        self
    }

    /// Sets the overscroll amounts.
    #[inline]
    #[must_use]
    pub fn with_overscroll(mut self, x_overscroll: f64, y_overscroll: f64) -> Self {
        self.x_overscroll = Some(x_overscroll);
        self.y_overscroll = Some(y_overscroll);
        self
    }

    /// Sets fling prevention.
    #[inline]
    #[must_use]
    pub fn with_prevent_fling(mut self, prevent: bool) -> Self {
        self.prevent_fling = Some(prevent);
        self
    }

    /// Sets the swipe speed.
    #[inline]
    #[must_use]
    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sets the input source.
    #[inline]
    #[must_use]
    pub fn with_gesture_source_type(mut self, source: GestureSourceType) -> Self {
        self.gesture_source_type = Some(source);
        self
    }

    /// Repeats the gesture `count` times, `delay_ms` apart.
    #[inline]
    #[must_use]
    pub fn with_repeat(mut self, count: i64, delay_ms: i64) -> Self {
        self.repeat_count = Some(count);
        self.repeat_delay_ms = Some(delay_ms);
        self
    }

    /// Sets the interaction marker name.
    #[inline]
    #[must_use]
    pub fn with_interaction_marker_name(mut self, name: impl Into<String>) -> Self {
        self.interaction_marker_name = Some(name.into());
        self
    }
}

impl Command for SynthesizeScrollGestureParams {
    const METHOD: &'static str = "Input.synthesizeScrollGesture";
    type Response = Empty;
}

// ============================================================================
// Input.synthesizeTapGesture
// ============================================================================

/// Synthesizes a tap gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeTapGestureParams {
    /// X coordinate of the tap in CSS pixels.
    pub x: f64,
    /// Y coordinate of the tap in CSS pixels.
    pub y: f64,
    /// Milliseconds between touchdown and touchup (default: 50).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Number of taps, e.g. 2 for a double tap (default: 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_count: Option<i64>,
    /// Input source; absent lets the remote end pick the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_source_type: Option<GestureSourceType>,
}

impl SynthesizeTapGestureParams {
    /// Creates params for a tap at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            duration: None,
            tap_count: None,
            gesture_source_type: None,
        }
    }

    /// Sets the press duration.
    #[inline]
    #[must_use]
    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    /// Sets the tap count.
    #[inline]
    #[must_use]
    pub fn with_tap_count(mut self, count: i64) -> Self {
        self.tap_count = Some(count);
        self
    }

    /// Sets the input source.
    #[inline]
    #[must_use]
    pub fn with_gesture_source_type(mut self, source: GestureSourceType) -> Self {
        self.gesture_source_type = Some(source);
        self
    }
}

impl Command for SynthesizeTapGestureParams {
    const METHOD: &'static str = "Input.synthesizeTapGesture";
    type Response = Empty;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).expect("serialize")
    }

    #[test]
    fn test_key_event_minimal() {
        let params = DispatchKeyEventParams::new(KeyEventType::KeyDown).with_code("KeyA");
        assert_eq!(to_json(&params), json!({"type": "keyDown", "code": "KeyA"}));
        assert_eq!(DispatchKeyEventParams::METHOD, "Input.dispatchKeyEvent");
    }

    #[test]
    fn test_key_event_explicit_zero_values_are_sent() {
        let params = DispatchKeyEventParams::new(KeyEventType::RawKeyDown)
            .with_modifiers(0)
            .with_text("")
            .with_auto_repeat(false)
            .with_location(0);

        assert_eq!(
            to_json(&params),
            json!({
                "type": "rawKeyDown",
                "modifiers": 0,
                "text": "",
                "autoRepeat": false,
                "location": 0
            })
        );
    }

    #[test]
    fn test_key_event_field_names() {
        let params = DispatchKeyEventParams::new(KeyEventType::Char)
            .with_modifiers(modifiers::CTRL | modifiers::SHIFT)
            .with_timestamp(TimeSinceEpoch(1.5))
            .with_unmodified_text("a")
            .with_key_identifier("U+0041")
            .with_key("A")
            .with_windows_virtual_key_code(65)
            .with_native_virtual_key_code(65)
            .with_is_keypad(true)
            .with_is_system_key(false);

        let value = to_json(&params);
        assert_eq!(value["type"], "char");
        assert_eq!(value["modifiers"], 10);
        assert_eq!(value["timestamp"], 1.5);
        assert_eq!(value["unmodifiedText"], "a");
        assert_eq!(value["keyIdentifier"], "U+0041");
        assert_eq!(value["windowsVirtualKeyCode"], 65);
        assert_eq!(value["nativeVirtualKeyCode"], 65);
        assert_eq!(value["isKeypad"], true);
        assert_eq!(value["isSystemKey"], false);
    }

    #[test]
    fn test_mouse_event() {
        let params = DispatchMouseEventParams::new(MouseEventType::MousePressed, 10.0, 20.0)
            .with_button(MouseButton::Left)
            .with_click_count(1);

        assert_eq!(
            to_json(&params),
            json!({"type": "mousePressed", "x": 10.0, "y": 20.0, "button": "left", "clickCount": 1})
        );
    }

    #[test]
    fn test_mouse_wheel_deltas() {
        let params = DispatchMouseEventParams::new(MouseEventType::MouseWheel, 0.0, 0.0)
            .with_delta(0.0, -120.0);
        let value = to_json(&params);
        assert_eq!(value["deltaX"], 0.0);
        assert_eq!(value["deltaY"], -120.0);
    }

    #[test]
    fn test_touch_event_always_sends_points() {
        let end = DispatchTouchEventParams::new(TouchEventType::TouchEnd, Vec::new());
        assert_eq!(to_json(&end), json!({"type": "touchEnd", "touchPoints": []}));

        let start = DispatchTouchEventParams::new(
            TouchEventType::TouchStart,
            vec![TouchPoint::new(1.0, 2.0).with_radius(3.0, 4.0).with_id(7.0)],
        );
        assert_eq!(
            to_json(&start)["touchPoints"],
            json!([{"x": 1.0, "y": 2.0, "radiusX": 3.0, "radiusY": 4.0, "id": 7.0}])
        );
    }

    #[test]
    fn test_emulate_touch_required_fields() {
        let params = EmulateTouchFromMouseEventParams::new(
            MouseEventType::MouseMoved,
            5,
            6,
            TimeSinceEpoch(100.0),
            MouseButton::None,
        );
        assert_eq!(
            to_json(&params),
            json!({"type": "mouseMoved", "x": 5, "y": 6, "timestamp": 100.0, "button": "none"})
        );
    }

    #[test]
    fn test_set_ignore_input_events_sends_false() {
        assert_eq!(to_json(&SetIgnoreInputEventsParams::new(false)), json!({"ignore": false}));
        assert_eq!(SetIgnoreInputEventsParams::METHOD, "Input.setIgnoreInputEvents");
    }

    #[test]
    fn test_gesture_source_absent_by_default() {
        let pinch = SynthesizePinchGestureParams::new(100.0, 100.0, 1.5);
        assert_eq!(to_json(&pinch), json!({"x": 100.0, "y": 100.0, "scaleFactor": 1.5}));

        let tap = SynthesizeTapGestureParams::new(1.0, 1.0)
            .with_gesture_source_type(GestureSourceType::Touch)
            .with_tap_count(2);
        assert_eq!(
            to_json(&tap),
            json!({"x": 1.0, "y": 1.0, "tapCount": 2, "gestureSourceType": "touch"})
        );
    }

    #[test]
    fn test_scroll_gesture_field_names() {
        let params = SynthesizeScrollGestureParams::new(0.0, 0.0)
            .with_distance(0.0, -500.0)
            .with_overscroll(10.0, 20.0)
            .with_prevent_fling(true)
            .with_speed(800)
            .with_repeat(2, 250)
            .with_interaction_marker_name("scroll");

        let value = to_json(&params);
        for key in [
            "xDistance",
            "yDistance",
            "xOverscroll",
            "yOverscroll",
            "preventFling",
            "speed",
            "repeatCount",
            "repeatDelayMs",
            "interactionMarkerName",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("gestureSourceType").is_none());
    }

    #[test]
    fn test_params_round_trip_through_serde() {
        let params = SynthesizeTapGestureParams::new(3.0, 4.0).with_duration(50);
        let back: SynthesizeTapGestureParams =
            serde_json::from_value(to_json(&params)).expect("deserialize");
        assert_eq!(back, params);
    }
}
