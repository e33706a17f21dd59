//! Input: pointer events, interactive sprites, hover resolution.
//!
//! # Invariants
//! - At most one sprite is hovered at any time.
//! - Hover callbacks fire only on transitions, never on repeated moves within one sprite.
//! - Clicks never hit-test; they go to whatever the last pointer move hovered.
//! - Hosts own event subscription and feed events through [`InputSink`].

mod event;
mod handler;
mod picking;
mod registry;

pub use event::{InputEvent, InputSink};
pub use handler::{Callbacks, ChannelHandler, InteractionEvent, InteractionHandler, NoopHandler};
pub use picking::{HoverTransition, PickingResolver};
pub use registry::{Sprite, SpriteRegistry};

pub fn crate_info() -> &'static str {
    "parallax-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }

    #[test]
    fn events_are_reachable_from_crate_root() {
        let event: InputEvent = serde_json::from_str(r#"{"kind":"click"}"#).unwrap();
        assert_eq!(event, InputEvent::Click);
    }
}
