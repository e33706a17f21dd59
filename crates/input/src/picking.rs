use glam::Vec2;
use parallax_common::{SceneError, SpriteId};
use parallax_view::{Mapping, Projection};

use crate::registry::SpriteRegistry;

/// Hover change produced by one pointer update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverTransition {
    pub left: Option<SpriteId>,
    pub entered: Option<SpriteId>,
}

impl HoverTransition {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.entered.is_none()
    }
}

/// Tracks the single active hover target and fires enter/leave/click handlers.
#[derive(Debug, Default, Clone)]
pub struct PickingResolver {
    active: Option<SpriteId>,
}

impl PickingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sprite currently under the pointer, as of the last move.
    pub fn active(&self) -> Option<SpriteId> {
        self.active
    }

    /// Resolve a pointer fraction against the registry and apply the hover change.
    ///
    /// An invalid pointer is rejected before any hover state changes.
    pub fn pointer_moved(
        &mut self,
        registry: &mut SpriteRegistry,
        projection: &Projection,
        mapping: Mapping,
        pointer: Vec2,
    ) -> Result<HoverTransition, SceneError> {
        let point = projection.to_world(pointer, mapping)?;
        Ok(self.hover_at(registry, Some(point)))
    }

    /// Pointer left the viewport: clear any hover.
    pub fn pointer_left(&mut self, registry: &mut SpriteRegistry) -> HoverTransition {
        self.hover_at(registry, None)
    }

    /// Apply the hover state for a world point (`None` means nothing is under the pointer).
    pub fn hover_at(
        &mut self,
        registry: &mut SpriteRegistry,
        point: Option<Vec2>,
    ) -> HoverTransition {
        let next = point.and_then(|p| registry.resolve(p));
        if next == self.active {
            return HoverTransition::default();
        }

        let mut transition = HoverTransition::default();
        if let Some(previous) = self.active.take() {
            if let Some(sprite) = registry.get_mut(previous) {
                sprite.set_hovered(false);
                sprite.handler_mut().on_leave(previous);
            }
            tracing::debug!(sprite = %previous, "hover leave");
            transition.left = Some(previous);
        }
        if let Some(current) = next {
            if let Some(sprite) = registry.get_mut(current) {
                sprite.set_hovered(true);
                sprite.handler_mut().on_enter(current);
            }
            tracing::debug!(sprite = %current, "hover enter");
            transition.entered = Some(current);
        }
        self.active = next;
        transition
    }

    /// Deliver a click to the active hover target, if any.
    pub fn click(&mut self, registry: &mut SpriteRegistry) -> Option<SpriteId> {
        let id = self.active?;
        let sprite = registry.get_mut(id)?;
        sprite.handler_mut().on_click(id);
        tracing::debug!(sprite = %id, "click");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::InteractionHandler;
    use parallax_common::{Rect, WorldSize};
    use parallax_view::CoverScale;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Enter(SpriteId),
        Leave(SpriteId),
        Click(SpriteId),
    }

    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl InteractionHandler for Recorder {
        fn on_enter(&mut self, sprite: SpriteId) {
            self.0.borrow_mut().push(Call::Enter(sprite));
        }
        fn on_leave(&mut self, sprite: SpriteId) {
            self.0.borrow_mut().push(Call::Leave(sprite));
        }
        fn on_click(&mut self, sprite: SpriteId) {
            self.0.borrow_mut().push(Call::Click(sprite));
        }
    }

    /// Two sprites: A at x in [0,100], B at x in [200,300]; both y in [0,100].
    fn setup() -> (SpriteRegistry, Rc<RefCell<Vec<Call>>>, SpriteId, SpriteId) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SpriteRegistry::new();
        let a = registry
            .add(
                Rect::new(0.0, 0.0, 100.0, 100.0),
                None,
                Box::new(Recorder(Rc::clone(&log))),
            )
            .unwrap();
        let b = registry
            .add(
                Rect::new(200.0, 0.0, 100.0, 100.0),
                None,
                Box::new(Recorder(Rc::clone(&log))),
            )
            .unwrap();
        (registry, log, a, b)
    }

    #[test]
    fn hover_transition_fires_exactly_once() {
        let (mut registry, log, a, b) = setup();
        let mut picker = PickingResolver::new();

        picker.hover_at(&mut registry, Some(Vec2::new(10.0, 10.0)));
        picker.hover_at(&mut registry, Some(Vec2::new(20.0, 30.0)));
        picker.hover_at(&mut registry, Some(Vec2::new(90.0, 90.0)));
        assert_eq!(*log.borrow(), vec![Call::Enter(a)]);

        let t = picker.hover_at(&mut registry, Some(Vec2::new(250.0, 50.0)));
        assert_eq!(
            t,
            HoverTransition {
                left: Some(a),
                entered: Some(b),
            }
        );
        picker.hover_at(&mut registry, Some(Vec2::new(260.0, 40.0)));

        assert_eq!(*log.borrow(), vec![Call::Enter(a), Call::Leave(a), Call::Enter(b)]);
        assert!(!registry.get(a).unwrap().is_hovered());
        assert!(registry.get(b).unwrap().is_hovered());
        assert_eq!(registry.hovered_count(), 1);
    }

    #[test]
    fn moving_to_empty_space_leaves() {
        let (mut registry, log, a, _) = setup();
        let mut picker = PickingResolver::new();
        picker.hover_at(&mut registry, Some(Vec2::new(10.0, 10.0)));
        let t = picker.hover_at(&mut registry, Some(Vec2::new(150.0, 10.0)));
        assert_eq!(t.left, Some(a));
        assert_eq!(t.entered, None);
        assert_eq!(picker.active(), None);
        assert_eq!(registry.hovered_count(), 0);
        assert_eq!(*log.borrow(), vec![Call::Enter(a), Call::Leave(a)]);

        assert!(picker.hover_at(&mut registry, Some(Vec2::new(160.0, 10.0))).is_empty());
    }

    #[test]
    fn click_goes_to_active_hover_without_hit_test() {
        let (mut registry, log, a, _) = setup();
        let mut picker = PickingResolver::new();
        assert_eq!(picker.click(&mut registry), None);

        picker.hover_at(&mut registry, Some(Vec2::new(50.0, 50.0)));
        assert_eq!(picker.click(&mut registry), Some(a));
        assert_eq!(picker.click(&mut registry), Some(a));
        assert_eq!(
            *log.borrow(),
            vec![Call::Enter(a), Call::Click(a), Call::Click(a)]
        );
    }

    #[test]
    fn pointer_left_clears_hover() {
        let (mut registry, log, _, b) = setup();
        let mut picker = PickingResolver::new();
        picker.hover_at(&mut registry, Some(Vec2::new(250.0, 50.0)));
        let t = picker.pointer_left(&mut registry);
        assert_eq!(t.left, Some(b));
        assert!(picker.pointer_left(&mut registry).is_empty());
        assert_eq!(*log.borrow(), vec![Call::Enter(b), Call::Leave(b)]);
    }

    #[test]
    fn pointer_moved_maps_through_projection() {
        let (mut registry, _, a, b) = setup();
        let mut picker = PickingResolver::new();
        // 400x100 viewport over a 400x100 world: pointer fraction * 400 = world x.
        let world = WorldSize::new(400.0, 100.0).unwrap();
        let projection =
            Projection::from_parts(world, CoverScale::compute(400.0, 100.0, world), 0.0);

        let t = picker
            .pointer_moved(
                &mut registry,
                &projection,
                Mapping::CameraRelative,
                Vec2::new(0.1, 0.5),
            )
            .unwrap();
        assert_eq!(t.entered, Some(a));
        let t = picker
            .pointer_moved(
                &mut registry,
                &projection,
                Mapping::CameraRelative,
                Vec2::new(0.6, 0.5),
            )
            .unwrap();
        assert_eq!(t.entered, Some(b));
    }

    #[test]
    fn invalid_pointer_keeps_hover() {
        let (mut registry, log, a, _) = setup();
        let mut picker = PickingResolver::new();
        let world = WorldSize::new(400.0, 100.0).unwrap();
        let projection =
            Projection::from_parts(world, CoverScale::compute(400.0, 100.0, world), 0.0);
        picker.hover_at(&mut registry, Some(Vec2::new(10.0, 10.0)));

        let err = picker.pointer_moved(
            &mut registry,
            &projection,
            Mapping::CameraRelative,
            Vec2::new(f32::NAN, 0.5),
        );
        assert!(matches!(err, Err(SceneError::InvalidInput(_))));
        assert_eq!(picker.active(), Some(a));
        assert_eq!(log.borrow().len(), 1);
    }
}
