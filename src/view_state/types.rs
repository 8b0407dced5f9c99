//! Core view-state newtypes

/// Height of a rendered row in pixels. Always >= 1.
///
/// A zero height means "not measured yet" and is rejected by the smart
/// constructor, so every cached height is usable as a scroll extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowHeight(usize);

/// Error returned when attempting to create a RowHeight of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("RowHeight must be >= 1 (got {0})")]
pub struct InvalidRowHeight(pub usize);

impl RowHeight {
    /// Estimated height used before any row is measured.
    pub const DEFAULT_ESTIMATE: Self = Self(48);

    /// Smart constructor that validates the height is >= 1.
    pub fn new(height: usize) -> Result<Self, InvalidRowHeight> {
        if height == 0 {
            Err(InvalidRowHeight(height))
        } else {
            Ok(Self(height))
        }
    }

    /// Get the raw pixel value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for RowHeight {
    fn default() -> Self {
        Self::DEFAULT_ESTIMATE
    }
}

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportDimensions {
    /// Width of the grid host.
    pub width: u32,
    /// Height of the scrollable body.
    pub height: usize,
}

impl ViewportDimensions {
    /// Create new viewport dimensions.
    pub fn new(width: u32, height: usize) -> Self {
        Self { width, height }
    }
}
