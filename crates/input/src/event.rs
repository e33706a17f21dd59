use parallax_common::{SceneError, SpriteId};
use serde::{Deserialize, Serialize};

/// A raw input event, already normalized by the host.
///
/// Hosts translate platform events into these; the core never subscribes to
/// platform events itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer position as a fraction of the viewport, top-left origin.
    PointerMove { x: f32, y: f32 },
    /// Pointer left the viewport.
    PointerLeave,
    /// Primary button click; applies to the current hover target.
    Click,
    /// Viewport resized to logical pixels at the given device pixel ratio.
    Resize {
        width: f32,
        height: f32,
        #[serde(default = "default_device_pixel_ratio")]
        device_pixel_ratio: f32,
    },
}

fn default_device_pixel_ratio() -> f32 {
    1.0
}

/// Receiver of input events. Each call is applied synchronously; the next
/// tick observes the result.
pub trait InputSink {
    fn on_pointer_move(&mut self, x: f32, y: f32) -> Result<(), SceneError>;
    fn on_pointer_leave(&mut self);
    /// Returns the sprite that received the click, if any.
    fn on_click(&mut self) -> Option<SpriteId>;
    fn on_resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    ) -> Result<(), SceneError>;
}

impl InputEvent {
    /// Deliver this event to a sink.
    pub fn dispatch<S: InputSink + ?Sized>(&self, sink: &mut S) -> Result<(), SceneError> {
        match *self {
            Self::PointerMove { x, y } => sink.on_pointer_move(x, y),
            Self::PointerLeave => {
                sink.on_pointer_leave();
                Ok(())
            }
            Self::Click => {
                sink.on_click();
                Ok(())
            }
            Self::Resize {
                width,
                height,
                device_pixel_ratio,
            } => sink.on_resize(width, height, device_pixel_ratio),
        }
    }
}
