use glam::Vec2;

/// Phase of a single-pointer touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// A raw pointer sample in the glyph's coordinate space.
/// `timestamp` is in host milliseconds and only ever compared, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub pos: Vec2,
    pub timestamp: f64,
}

impl TouchEvent {
    pub fn down(pos: Vec2, timestamp: f64) -> Self {
        Self { phase: TouchPhase::Down, pos, timestamp }
    }

    pub fn moved(pos: Vec2, timestamp: f64) -> Self {
        Self { phase: TouchPhase::Move, pos, timestamp }
    }

    pub fn up(pos: Vec2, timestamp: f64) -> Self {
        Self { phase: TouchPhase::Up, pos, timestamp }
    }
}

/// Pointer events buffered between frames.
/// The host pushes as input arrives; the tracker drains them in order.
pub struct TouchQueue {
    events: Vec<TouchEvent>,
}

impl TouchQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: TouchEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<TouchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for TouchQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_in_order() {
        let mut q = TouchQueue::new();
        q.push(TouchEvent::down(Vec2::new(10.0, 20.0), 0.0));
        q.push(TouchEvent::moved(Vec2::new(12.0, 21.0), 16.0));
        q.push(TouchEvent::up(Vec2::new(12.0, 21.0), 32.0));
        assert_eq!(q.len(), 3);

        let events = q.drain();
        assert!(q.is_empty());
        let phases: Vec<TouchPhase> = events.iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![TouchPhase::Down, TouchPhase::Move, TouchPhase::Up]);
        assert_eq!(events[1].timestamp, 16.0);
    }
}
