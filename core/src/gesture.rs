/// Incremental pointer movement, measured from the previous sample rather
/// than the drag origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

enum Phase {
    Idle,
    Dragging { last_x: f64, last_y: f64 },
}

/// Tracks one pointer drag and reports incremental deltas to a callback.
/// The tracker never touches the model; it is a pure delta source. At most
/// one gesture is active at a time.
pub struct DragTracker {
    phase: Phase,
    callback: Box<dyn FnMut(Delta)>,
}

impl DragTracker {
    pub fn new(callback: impl FnMut(Delta) + 'static) -> Self {
        Self {
            phase: Phase::Idle,
            callback: Box::new(callback),
        }
    }

    /// Starts a gesture at the given pointer position. A second
    /// pointer-down while a gesture is active is rejected.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.phase = Phase::Dragging {
            last_x: x,
            last_y: y,
        };
        true
    }

    /// Reports the delta from the previous sample and advances the
    /// reference point. Ignored while idle.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Phase::Dragging { last_x, last_y } = &mut self.phase else {
            return;
        };
        let delta = Delta {
            dx: x - *last_x,
            dy: y - *last_y,
        };
        *last_x = x;
        *last_y = y;
        (self.callback)(delta);
    }

    /// Ends the gesture. Pointer-up, window blur, and pointer-leave all
    /// route here; the first one wins and the rest are no-ops. Also the
    /// manual cancellation point for deterministic teardown.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_tracker() -> (DragTracker, Rc<RefCell<Vec<Delta>>>) {
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let sink = deltas.clone();
        let tracker = DragTracker::new(move |delta| sink.borrow_mut().push(delta));
        (tracker, deltas)
    }

    #[test]
    fn deltas_are_incremental_not_cumulative() {
        let (mut tracker, deltas) = recording_tracker();
        assert!(tracker.pointer_down(10.0, 10.0));
        tracker.pointer_move(15.0, 12.0);
        tracker.pointer_move(20.0, 20.0);
        assert_eq!(
            *deltas.borrow(),
            vec![Delta { dx: 5.0, dy: 2.0 }, Delta { dx: 5.0, dy: 8.0 }]
        );
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let (mut tracker, deltas) = recording_tracker();
        tracker.pointer_move(15.0, 12.0);
        assert!(deltas.borrow().is_empty());
    }

    #[test]
    fn finish_ends_the_gesture() {
        let (mut tracker, deltas) = recording_tracker();
        tracker.pointer_down(0.0, 0.0);
        tracker.pointer_move(1.0, 1.0);
        tracker.finish();
        assert!(!tracker.is_dragging());
        tracker.pointer_move(50.0, 50.0);
        assert_eq!(deltas.borrow().len(), 1);
        // Termination events may arrive more than once; later ones no-op.
        tracker.finish();
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn second_pointer_down_is_rejected() {
        let (mut tracker, deltas) = recording_tracker();
        assert!(tracker.pointer_down(0.0, 0.0));
        assert!(!tracker.pointer_down(100.0, 100.0));
        // The original gesture's reference point is untouched.
        tracker.pointer_move(5.0, 5.0);
        assert_eq!(*deltas.borrow(), vec![Delta { dx: 5.0, dy: 5.0 }]);
    }

    #[test]
    fn a_new_gesture_can_start_after_finish() {
        let (mut tracker, deltas) = recording_tracker();
        tracker.pointer_down(0.0, 0.0);
        tracker.finish();
        assert!(tracker.pointer_down(100.0, 100.0));
        tracker.pointer_move(103.0, 104.0);
        assert_eq!(*deltas.borrow(), vec![Delta { dx: 3.0, dy: 4.0 }]);
    }
}
