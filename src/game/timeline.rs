//! Deferred events on a single logical clock.
//!
//! The UI schedules "advance after showing the result" style transitions
//! here and feeds in elapsed wall-clock time; tests feed virtual time.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

#[derive(Debug)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Timeline {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Returns the event if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        let pos = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(pos).event)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves the clock forward and returns every event now due, earliest
    /// first; events due at the same instant keep scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<E> {
        self.now += elapsed;
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.id.0));
        due.into_iter().map(|p| p.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_only_when_due() {
        let mut t = Timeline::new();
        t.schedule(ms(3000), "advance");
        assert!(t.advance(ms(2999)).is_empty());
        assert_eq!(t.advance(ms(1)), vec!["advance"]);
        assert!(t.is_idle());
    }

    #[test]
    fn due_events_come_out_in_time_order() {
        let mut t = Timeline::new();
        t.schedule(ms(300), 3);
        t.schedule(ms(100), 1);
        t.schedule(ms(200), 2);
        t.schedule(ms(100), 11);
        assert_eq!(t.advance(ms(1000)), vec![1, 11, 2, 3]);
    }

    #[test]
    fn cancelled_events_never_fire() {
        let mut t = Timeline::new();
        let keep = t.schedule(ms(10), "keep");
        let drop = t.schedule(ms(10), "drop");
        assert_eq!(t.cancel(drop), Some("drop"));
        assert_eq!(t.cancel(drop), None);
        assert_eq!(t.pending(), 1);
        assert_eq!(t.advance(ms(10)), vec!["keep"]);
        assert_eq!(t.cancel(keep), None);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut t = Timeline::new();
        t.advance(ms(500));
        t.schedule(ms(100), "late");
        assert!(t.advance(ms(99)).is_empty());
        assert_eq!(t.now(), ms(599));
        assert_eq!(t.advance(ms(1)), vec!["late"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut t = Timeline::new();
        t.schedule(ms(1), 'a');
        t.schedule(ms(2), 'b');
        t.clear();
        assert!(t.advance(ms(10)).is_empty());
    }
}
