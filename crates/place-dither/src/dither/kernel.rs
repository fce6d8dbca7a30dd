//! Error diffusion kernel.

/// An error diffusion kernel.
///
/// Each entry is a `(dx, dy, weight)` offset to a pixel not yet visited in
/// raster order. A neighbour receives `error * weight / divisor`. Entries
/// that fall outside the image are skipped without renormalising the
/// remaining weights, so edge pixels propagate less than the full error.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Deepest row offset in `entries`; the quantizer holds this many rows
    /// of pending error below the current one.
    pub max_dy: usize,
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_propagation_100_percent() {
        let sum: u8 = FLOYD_STEINBERG.entries.iter().map(|(_, _, w)| w).sum();
        assert_eq!(sum, 16, "Floyd-Steinberg weights should sum to 16");
        assert_eq!(FLOYD_STEINBERG.divisor, 16);
    }

    #[test]
    fn test_floyd_steinberg_max_dy() {
        let actual_max_dy = FLOYD_STEINBERG
            .entries
            .iter()
            .map(|(_, dy, _)| *dy as usize)
            .max()
            .unwrap();
        assert_eq!(actual_max_dy, FLOYD_STEINBERG.max_dy);
    }

    #[test]
    fn test_entries_only_reach_unvisited_pixels() {
        for &(dx, dy, _) in FLOYD_STEINBERG.entries {
            assert!(dy > 0 || dx > 0, "({dx}, {dy}) points at a visited pixel");
        }
    }
}
