// src/model/courier.rs

/// A delivery worker with a hard per-day order capacity.
///
/// Couriers only count how many orders they carry today, never which ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Courier {
    pub capacity: u32,
    pub load: u32,
}

impl Courier {
    pub fn new(capacity: u32) -> Self {
        Self { capacity, load: 0 }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.load >= self.capacity
    }

    /// Takes one more order if there is room. Returns whether it did.
    pub fn take_order(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.load += 1;
        true
    }

    /// Start of a new day.
    pub fn reset(&mut self) {
        self.load = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_hard() {
        let mut c = Courier::new(2);
        assert!(c.take_order());
        assert!(c.take_order());
        assert!(c.is_busy());
        assert!(!c.take_order());
        assert_eq!(c.load, 2);
        c.reset();
        assert_eq!(c.load, 0);
        assert!(!c.is_busy());
    }
}
