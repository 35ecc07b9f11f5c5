//! Size ladder derivation.

use revariant_core::constants::LADDER_STEPS;
use revariant_core::{PipelineError, PipelineResult};

/// The ordered list of target longest-edge sizes for one source image:
/// the source's own longest edge first, then every reference step strictly
/// smaller than it. Strictly descending, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLadder {
    longest_edge: u32,
    sizes: Vec<u32>,
}

impl SizeLadder {
    /// Build the ladder for a decoded surface.
    ///
    /// Fails with [`PipelineError::InvalidImageDimensions`] when either
    /// edge is zero; the scale ratio `target / longest_edge` would
    /// otherwise divide by zero.
    pub fn for_dimensions(width: u32, height: u32) -> PipelineResult<Self> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidImageDimensions { width, height });
        }

        let longest_edge = width.max(height);
        let mut sizes = vec![longest_edge];
        sizes.extend(LADDER_STEPS.iter().copied().filter(|&s| s < longest_edge));

        Ok(Self {
            longest_edge,
            sizes,
        })
    }

    /// The source's longest edge, equal to the first ladder entry.
    pub fn longest_edge(&self) -> u32 {
        self.longest_edge
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.sizes.iter().copied()
    }
}
