//! Gesture input the host hands to the engine (spec.md §6): drag and wheel,
//! fed through gesture recognizers into the scroller and animation queue
//! during frame-scheduler step 1.

use mica_core::{Duration, Point, Vector};

/// Phase of a drag gesture. Named to match the scroller's own
/// `DragPhase` rather than the touch-level `Started/Moved/Ended` naming —
/// gesture recognition happens upstream of this boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One drag sample: where the touch is, how far the content has been
/// dragged since the gesture began, and the instantaneous velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEvent {
    pub time: Duration,
    pub location: Point,
    pub offset: Vector,
    pub velocity: Vector,
}

/// Direction of a discrete wheel/trackpad tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub direction: Vector,
}

/// The engine's gesture entry point. A host (desktop trackpad driver,
/// mobile touch recognizer) calls these as recognized gestures occur; the
/// engine routes them to the relevant node's scroller.
pub trait GestureInput {
    fn on_drag(&mut self, state: GestureState, event: DragEvent);
    fn on_wheel(&mut self, state: GestureState, event: WheelEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingGestureInput {
        drags: Vec<(GestureState, DragEvent)>,
    }

    impl GestureInput for RecordingGestureInput {
        fn on_drag(&mut self, state: GestureState, event: DragEvent) {
            self.drags.push((state, event));
        }

        fn on_wheel(&mut self, _state: GestureState, _event: WheelEvent) {}
    }

    #[test]
    fn records_drag_events_in_order() {
        let mut input = RecordingGestureInput { drags: Vec::new() };
        let event = DragEvent { time: Duration::ZERO, location: Point { x: 0.0, y: 0.0 }, offset: Vector { dx: 0.0, dy: 0.0 }, velocity: Vector { dx: 0.0, dy: 0.0 } };
        input.on_drag(GestureState::Began, event);
        input.on_drag(GestureState::Ended, event);
        assert_eq!(input.drags.len(), 2);
        assert_eq!(input.drags[0].0, GestureState::Began);
        assert_eq!(input.drags[1].0, GestureState::Ended);
    }
}
