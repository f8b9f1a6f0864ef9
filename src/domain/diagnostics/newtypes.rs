// SPDX-License-Identifier: MPL-2.0
//! Diagnostics newtypes.

// =============================================================================
// Buffer Capacity Bounds
// =============================================================================

/// Buffer capacity bounds (100 to 10000 events).
pub mod buffer_capacity_bounds {
    /// Minimum buffer capacity.
    pub const MIN: usize = 100;
    /// Maximum buffer capacity.
    pub const MAX: usize = 10_000;
    /// Default buffer capacity.
    pub const DEFAULT: usize = 1000;
}

// =============================================================================
// BufferCapacity
// =============================================================================

/// Number of lifecycle events retained by the diagnostics log.
///
/// Always within 100–10000 events; out-of-range requests are clamped.
///
/// # Example
///
/// ```
/// use iced_toasts::domain::diagnostics::BufferCapacity;
///
/// assert_eq!(BufferCapacity::new(250).value(), 250);
/// assert_eq!(BufferCapacity::new(50_000).value(), 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_capacity_clamps() {
        assert_eq!(BufferCapacity::new(0).value(), buffer_capacity_bounds::MIN);
        assert_eq!(
            BufferCapacity::new(100_000).value(),
            buffer_capacity_bounds::MAX
        );
    }

    #[test]
    fn buffer_capacity_default() {
        assert_eq!(
            BufferCapacity::default().value(),
            buffer_capacity_bounds::DEFAULT
        );
    }
}
