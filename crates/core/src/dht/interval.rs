//! Circular intervals over any totally ordered type.
//!
//! In the following a circle of size 8 is assumed.
//!
//! * `[1,4]` contains 1,2,3,4. `(1,5)` contains 2,3,4.
//! * `[6,3]` wraps past the origin and contains 6,7,0,1,2,3.
//! * `(6,1)` contains 7,0.
//! * A degenerate interval with equal bounds spans the whole circle:
//!   `(1,1)` contains everything but 1, while `[1,1]`, `[1,1)` and `(1,1]`
//!   contain every element.
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A bounded range that may wrap around the origin of a circle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularInterval<T> {
    left: T,
    right: T,
    left_closed: bool,
    right_closed: bool,
}

impl<T: Ord + Clone> CircularInterval<T> {
    /// Create an interval with explicit boundary closures.
    pub fn new(left: T, right: T, left_closed: bool, right_closed: bool) -> Self {
        Self {
            left,
            right,
            left_closed,
            right_closed,
        }
    }

    /// `(left, right)`
    pub fn open(left: T, right: T) -> Self {
        Self::new(left, right, false, false)
    }

    /// `[left, right]`
    pub fn closed(left: T, right: T) -> Self {
        Self::new(left, right, true, true)
    }

    /// `(left, right]`
    pub fn left_open(left: T, right: T) -> Self {
        Self::new(left, right, false, true)
    }

    /// `[left, right)`
    pub fn right_open(left: T, right: T) -> Self {
        Self::new(left, right, true, false)
    }

    /// Test whether `x` lies in the interval walking clockwise from the left bound.
    pub fn contains(&self, x: &T) -> bool {
        if self.left == self.right {
            return *x != self.left || self.left_closed || self.right_closed;
        }
        if self.left > self.right {
            return !self.inverse().contains(x);
        }
        let after_left = if self.left_closed {
            self.left <= *x
        } else {
            self.left < *x
        };
        let before_right = if self.right_closed {
            *x <= self.right
        } else {
            *x < self.right
        };
        after_left && before_right
    }

    /// The complement of this interval on the circle.
    ///
    /// Swapping bounds of an open or closed interval flips both closures,
    /// a half-open interval keeps its closures.
    pub fn inverse(&self) -> Self {
        if self.left_closed == self.right_closed {
            Self::new(
                self.right.clone(),
                self.left.clone(),
                !self.left_closed,
                !self.right_closed,
            )
        } else {
            Self::new(
                self.right.clone(),
                self.left.clone(),
                self.left_closed,
                self.right_closed,
            )
        }
    }

    /// Left bound.
    pub fn left(&self) -> &T {
        &self.left
    }

    /// Right bound.
    pub fn right(&self) -> &T {
        &self.right
    }

    /// Whether the left bound belongs to the interval.
    pub fn is_left_closed(&self) -> bool {
        self.left_closed
    }

    /// Whether the right bound belongs to the interval.
    pub fn is_right_closed(&self) -> bool {
        self.right_closed
    }
}

impl<T: fmt::Display> fmt::Display for CircularInterval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{},{}{}",
            if self.left_closed { "[" } else { "(" },
            self.left,
            self.right,
            if self.right_closed { "]" } else { ")" }
        )
    }
}
