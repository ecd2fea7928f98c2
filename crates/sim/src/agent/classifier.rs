use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Inferred enemy motion, from the drift of its absolute bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MotionClass {
    /// Bearing increased between the last two sightings.
    Approaching = 1,
    /// Bearing decreased.
    Retreating = 2,
    #[default]
    Stationary = 3,
}

impl MotionClass {
    pub fn label(self) -> u8 {
        self as u8
    }
}

/// The last two absolute enemy bearings plus a count of every bearing ever
/// recorded. Slots never written read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BearingHistory {
    previous: f64,
    current: f64,
    samples: usize,
}

impl BearingHistory {
    pub fn record(&mut self, bearing: f64) {
        self.previous = self.current;
        self.current = bearing;
        self.samples += 1;
    }

    /// `(older, newer)`.
    pub fn last_two(&self) -> (f64, f64) {
        (self.previous, self.current)
    }

    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }
}

/// Compare the last two bearings as raw reals. No wrap handling at the
/// +-180 seam. Returns `None` only if a bearing is NaN.
pub fn classify(history: &BearingHistory) -> Option<MotionClass> {
    let (a, b) = history.last_two();
    match b.partial_cmp(&a)? {
        Ordering::Greater => Some(MotionClass::Approaching),
        Ordering::Less => Some(MotionClass::Retreating),
        Ordering::Equal => Some(MotionClass::Stationary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(bearings: &[f64]) -> BearingHistory {
        let mut h = BearingHistory::default();
        for &b in bearings {
            h.record(b);
        }
        h
    }

    #[test]
    fn test_labels() {
        assert_eq!(MotionClass::Approaching.label(), 1);
        assert_eq!(MotionClass::Retreating.label(), 2);
        assert_eq!(MotionClass::Stationary.label(), 3);
        assert_eq!(MotionClass::default(), MotionClass::Stationary);
    }

    #[test]
    fn test_classify_trends() {
        assert_eq!(classify(&history(&[10.0, 25.0])), Some(MotionClass::Approaching));
        assert_eq!(classify(&history(&[25.0, 10.0])), Some(MotionClass::Retreating));
        assert_eq!(classify(&history(&[33.0, 33.0])), Some(MotionClass::Stationary));
        // only the last two samples count
        assert_eq!(classify(&history(&[90.0, 5.0, 6.0])), Some(MotionClass::Approaching));
    }

    #[test]
    fn test_classify_missing_samples_read_as_zero() {
        assert_eq!(classify(&history(&[])), Some(MotionClass::Stationary));
        assert_eq!(classify(&history(&[12.0])), Some(MotionClass::Approaching));
        assert_eq!(classify(&history(&[-12.0])), Some(MotionClass::Retreating));
    }

    #[test]
    fn test_classify_ignores_seam() {
        // 179 -> -179 is a 2 degree clockwise drift, but compares as a drop
        assert_eq!(classify(&history(&[179.0, -179.0])), Some(MotionClass::Retreating));
    }

    #[test]
    fn test_classify_nan() {
        assert_eq!(classify(&history(&[1.0, f64::NAN])), None);
    }

    #[test]
    fn test_history_counts_every_sample() {
        let h = history(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.len(), 4);
        assert_eq!(h.last_two(), (3.0, 4.0));
        assert!(BearingHistory::default().is_empty());
    }
}
