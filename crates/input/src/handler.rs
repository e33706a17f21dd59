use std::sync::mpsc::Sender;

use parallax_common::SpriteId;
use serde::{Deserialize, Serialize};

/// Reacts to hover and click transitions on one sprite.
///
/// All methods default to doing nothing, so implementors override only what
/// they care about.
pub trait InteractionHandler {
    fn on_enter(&mut self, _sprite: SpriteId) {}
    fn on_leave(&mut self, _sprite: SpriteId) {}
    fn on_click(&mut self, _sprite: SpriteId) {}
}

/// Handler that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl InteractionHandler for NoopHandler {}

type Callback = Box<dyn FnMut(SpriteId)>;

/// Closure-backed handler.
///
/// ```
/// use parallax_input::Callbacks;
/// let handler = Callbacks::new()
///     .with_enter(|id| println!("enter {id}"))
///     .with_click(|id| println!("click {id}"));
/// # let _ = handler;
/// ```
#[derive(Default)]
pub struct Callbacks {
    enter: Option<Callback>,
    leave: Option<Callback>,
    click: Option<Callback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enter(mut self, f: impl FnMut(SpriteId) + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn with_leave(mut self, f: impl FnMut(SpriteId) + 'static) -> Self {
        self.leave = Some(Box::new(f));
        self
    }

    pub fn with_click(mut self, f: impl FnMut(SpriteId) + 'static) -> Self {
        self.click = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .field("click", &self.click.is_some())
            .finish()
    }
}

impl InteractionHandler for Callbacks {
    fn on_enter(&mut self, sprite: SpriteId) {
        if let Some(f) = self.enter.as_mut() {
            f(sprite);
        }
    }

    fn on_leave(&mut self, sprite: SpriteId) {
        if let Some(f) = self.leave.as_mut() {
            f(sprite);
        }
    }

    fn on_click(&mut self, sprite: SpriteId) {
        if let Some(f) = self.click.as_mut() {
            f(sprite);
        }
    }
}

/// An interaction transition, as delivered by [`ChannelHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "sprite", rename_all = "snake_case")]
pub enum InteractionEvent {
    Enter(SpriteId),
    Leave(SpriteId),
    Click(SpriteId),
}

/// Forwards transitions as messages to a UI layer over an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: Sender<InteractionEvent>,
}

impl ChannelHandler {
    pub fn new(tx: Sender<InteractionEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: InteractionEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(?event, "interaction receiver dropped");
        }
    }
}

impl InteractionHandler for ChannelHandler {
    fn on_enter(&mut self, sprite: SpriteId) {
        self.send(InteractionEvent::Enter(sprite));
    }

    fn on_leave(&mut self, sprite: SpriteId) {
        self.send(InteractionEvent::Leave(sprite));
    }

    fn on_click(&mut self, sprite: SpriteId) {
        self.send(InteractionEvent::Click(sprite));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    #[test]
    fn callbacks_invoke_only_registered_closures() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut handler = Callbacks::new().with_click(move |id| sink.borrow_mut().push(id));

        handler.on_enter(SpriteId(1));
        handler.on_leave(SpriteId(1));
        handler.on_click(SpriteId(1));

        assert_eq!(*log.borrow(), vec![SpriteId(1)]);
    }

    #[test]
    fn builder_methods_leave_trait_methods_callable() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (enter, leave, click) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
        let mut handler = Callbacks::new()
            .with_enter(move |id| enter.borrow_mut().push(("enter", id)))
            .with_leave(move |id| leave.borrow_mut().push(("leave", id)))
            .with_click(move |id| click.borrow_mut().push(("click", id)));

        handler.on_enter(SpriteId(2));
        handler.on_click(SpriteId(2));
        handler.on_leave(SpriteId(2));

        let kinds: Vec<&str> = log.borrow().iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, ["enter", "click", "leave"]);
        assert!(log.borrow().iter().all(|(_, id)| *id == SpriteId(2)));
    }

    #[test]
    fn channel_handler_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let mut handler = ChannelHandler::new(tx);
        handler.on_enter(SpriteId(0));
        handler.on_click(SpriteId(0));
        handler.on_leave(SpriteId(0));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                InteractionEvent::Enter(SpriteId(0)),
                InteractionEvent::Click(SpriteId(0)),
                InteractionEvent::Leave(SpriteId(0)),
            ]
        );
    }

    #[test]
    fn channel_handler_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut handler = ChannelHandler::new(tx);
        handler.on_click(SpriteId(3));
    }

    #[test]
    fn noop_handler_is_inert() {
        let mut handler = NoopHandler;
        handler.on_enter(SpriteId(0));
        handler.on_leave(SpriteId(0));
        handler.on_click(SpriteId(0));
    }
}
