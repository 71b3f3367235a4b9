//! Range-clamped request parameters.
//!
//! Outgoing query parameters with server-enforced bounds (page sizes, batch
//! sizes) go through [`Clamped`], which pins every assignment to a fixed
//! inclusive range instead of rejecting it. A request built from a clamped
//! parameter can never go out with a value the server would refuse.

/// A value pinned to a fixed inclusive range.
///
/// Assignments outside `[min, max]` are silently rounded to the nearest
/// bound; the stored value is in range at all times, starting from the
/// default supplied at construction.
///
/// # Examples
///
/// ```
/// use helixir::Clamped;
///
/// let mut first = Clamped::new(1, 100, 20);
/// assert_eq!(first.get(), 20);
///
/// first.set(250);
/// assert_eq!(first.get(), 100);
///
/// first.set(42);
/// assert_eq!(first.get(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped<N> {
    min: N,
    max: N,
    value: N,
}

impl<N: Copy + Ord> Clamped<N> {
    /// Creates a parameter over `[min, max]` holding `default`.
    ///
    /// The default is clamped like any other assignment, so construction
    /// cannot produce an out-of-range value. `min` must not exceed `max`.
    pub fn new(min: N, max: N, default: N) -> Self {
        debug_assert!(min <= max, "clamped range is inverted");
        Self {
            min,
            max,
            value: default.clamp(min, max),
        }
    }

    /// Stores `value`, rounded to the nearest bound if out of range.
    ///
    /// Never fails: values below `min` become `min`, values above `max`
    /// become `max`. When `min == max` every assignment yields that single
    /// value.
    pub fn set(&mut self, value: N) -> &mut Self {
        self.value = value.clamp(self.min, self.max);
        self
    }

    /// Returns the stored value, guaranteed to lie within `[min, max]`.
    pub fn get(&self) -> N {
        self.value
    }

    /// The lower bound.
    pub fn min(&self) -> N {
        self.min
    }

    /// The upper bound.
    pub fn max(&self) -> N {
        self.max
    }
}
