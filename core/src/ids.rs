//! Provisional id source for optimistic adds.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::TodoId;

/// Hands out ids seeded from the wall clock but strictly increasing, so two
/// adds in the same millisecond, or after the clock steps back, still get
/// distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: TodoId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, also strictly above `floor` (typically the largest id the
    /// caller already knows about). `None` once no larger id exists.
    pub fn next_above(&mut self, floor: TodoId) -> Option<TodoId> {
        self.next_at(now_millis(), floor)
    }

    fn next_at(&mut self, now: TodoId, floor: TodoId) -> Option<TodoId> {
        let id = now
            .max(self.last.checked_add(1)?)
            .max(floor.checked_add(1)?);
        self.last = id;
        Some(id)
    }
}

fn now_millis() -> TodoId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| TodoId::try_from(d.as_millis()).unwrap_or(TodoId::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_millisecond_still_increases() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(1_000, 0);
        let b = ids.next_at(1_000, 0);
        assert_eq!(a, Some(1_000));
        assert_eq!(b, Some(1_001));
    }

    #[test]
    fn clock_going_backwards_does_not_repeat() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(5_000, 0);
        let b = ids.next_at(4_000, 0);
        assert!(b > a);
    }

    #[test]
    fn stays_above_floor() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_at(10, 50), Some(51));
    }

    #[test]
    fn wall_clock_ids_are_positive() {
        let mut ids = IdGenerator::new();
        assert!(ids.next_above(3).unwrap() > 3);
    }

    #[test]
    fn largest_floor_yields_none() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_at(10, TodoId::MAX), None);
        // A refused request does not advance the generator.
        assert_eq!(ids.next_at(10, 0), Some(10));
    }

    #[test]
    fn exhausted_generator_stays_exhausted() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_at(TodoId::MAX, 0), Some(TodoId::MAX));
        assert_eq!(ids.next_at(10, 0), None);
    }
}
