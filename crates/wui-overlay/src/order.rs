#![forbid(unsafe_code)]

//! Stacking order: topmost resolution and z-order allocation.
//!
//! Everything here is a pure function of the [`OverlayTable`]; nothing is
//! cached, so results can never lag behind an open or close.
//!
//! # Z-order
//!
//! Open overlays are ranked by open stamp, most recent first (rank 0). An
//! overlay's z-order is
//!
//! ```text
//! base + (open_count - 1 - rank) * step
//! ```
//!
//! so the oldest open overlay sits at `base` and each newer one is `step`
//! higher. Closed overlays report `base`.
//!
//! # Invariants
//!
//! - `step >= 1`.
//! - For a layering [`fitted`](ZLayering::fitted) to `n` layers, every
//!   z-order of up to `n` open overlays fits in `i32`, so the topmost is
//!   strictly above every other open overlay.

use crate::key::OverlayPayload;
use crate::table::{OpenSeq, OverlayTable};

/// Default z-order of the lowest overlay layer.
pub const DEFAULT_Z_BASE: i32 = 50;

/// Default z-order gap between stacked overlays.
pub const DEFAULT_Z_STEP: i32 = 10;

/// Constants of the z-order formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZLayering {
    base: i32,
    step: i32,
}

impl Default for ZLayering {
    fn default() -> Self {
        Self {
            base: DEFAULT_Z_BASE,
            step: DEFAULT_Z_STEP,
        }
    }
}

impl ZLayering {
    /// Create a layering; `step` is clamped to at least 1.
    #[must_use]
    pub const fn new(base: i32, step: i32) -> Self {
        Self {
            base,
            step: if step < 1 { 1 } else { step },
        }
    }

    /// Z-order of the bottom overlay and of closed overlays.
    #[must_use]
    pub const fn base(&self) -> i32 {
        self.base
    }

    /// Gap between consecutive overlays. Always at least 1.
    #[must_use]
    pub const fn step(&self) -> i32 {
        self.step
    }

    /// Z-order of the top of a stack of `layers` overlays, or `None` if it
    /// overflows `i32`.
    #[must_use]
    pub fn top_z(&self, layers: usize) -> Option<i32> {
        let height = i64::try_from(layers.saturating_sub(1)).ok()?;
        let top = i64::from(self.base).checked_add(height.checked_mul(i64::from(self.step))?)?;
        i32::try_from(top).ok()
    }

    /// Whether a stack of `layers` overlays fits without overflow.
    #[must_use]
    pub fn fits(&self, layers: usize) -> bool {
        self.top_z(layers).is_some()
    }

    /// Shrink `step`, then lower `base`, until `layers` overlays fit.
    #[must_use]
    pub fn fitted(self, layers: usize) -> Self {
        if self.fits(layers) {
            return self;
        }
        let height = i64::try_from(layers.saturating_sub(1)).unwrap_or(i64::from(u32::MAX));
        let span = i64::from(i32::MAX) - i64::from(i32::MIN);
        let step = i64::from(self.step).min((span / height).max(1));
        let base = i64::from(self.base).min(i64::from(i32::MAX) - height * step);
        Self::new(
            i32::try_from(base).unwrap_or(i32::MIN),
            i32::try_from(step).unwrap_or(1),
        )
    }

    /// Z-order for the overlay at `rank` among `open_count` open overlays.
    ///
    /// Saturates at `i32::MAX` when `open_count` exceeds what the layering
    /// was fitted to.
    #[must_use]
    pub fn z_for_rank(&self, rank: usize, open_count: usize) -> i32 {
        let height = open_count.saturating_sub(1).saturating_sub(rank);
        let height = i64::try_from(height).unwrap_or(i64::MAX);
        let z = i64::from(self.base).saturating_add(height.saturating_mul(i64::from(self.step)));
        i32::try_from(z).unwrap_or(i32::MAX)
    }
}

/// The most recently opened overlay that is still open.
pub fn topmost<P: OverlayPayload>(table: &OverlayTable<P>) -> Option<P::Key> {
    table
        .iter_open()
        .max_by_key(|&(_, seq)| seq)
        .map(|(key, _)| key)
}

/// Open overlays from bottom (oldest) to top (newest).
pub fn stack<P: OverlayPayload>(table: &OverlayTable<P>) -> Vec<P::Key> {
    let mut open: Vec<(P::Key, OpenSeq)> = table.iter_open().collect();
    open.sort_unstable_by_key(|&(_, seq)| seq);
    open.into_iter().map(|(key, _)| key).collect()
}

/// Z-order of `key`.
pub fn z_order<P: OverlayPayload>(
    table: &OverlayTable<P>,
    key: P::Key,
    layering: ZLayering,
) -> i32 {
    let Some(seq) = table.opened_at(key) else {
        return layering.base();
    };
    let mut open_count = 0;
    let mut rank = 0;
    for (_, other) in table.iter_open() {
        open_count += 1;
        if other > seq {
            rank += 1;
        }
    }
    layering.z_for_rank(rank, open_count)
}

/// Every open overlay with its z-order, bottom to top.
pub fn layers<P: OverlayPayload>(
    table: &OverlayTable<P>,
    layering: ZLayering,
) -> Vec<(P::Key, i32)> {
    let bottom_up = stack(table);
    let count = bottom_up.len();
    bottom_up
        .into_iter()
        .enumerate()
        .map(|(height, key)| (key, layering.z_for_rank(count - 1 - height, count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::OverlayKey;

    crate::overlay_set! {
        enum Dlg;
        enum DlgData {
            A(()) = "a",
            B(()) = "b",
            C(()) = "c",
        }
    }

    fn table_with(order: &[DlgData]) -> OverlayTable<DlgData> {
        let mut table = OverlayTable::new();
        for payload in order {
            table.open(payload.clone());
        }
        table
    }

    #[test]
    fn topmost_of_empty_table_is_none() {
        let table = OverlayTable::<DlgData>::new();
        assert_eq!(topmost(&table), None);
        assert!(stack(&table).is_empty());
    }

    #[test]
    fn topmost_is_latest_open() {
        let mut table = table_with(&[DlgData::B(()), DlgData::A(()), DlgData::C(())]);
        assert_eq!(topmost(&table), Some(Dlg::C));
        table.close(Dlg::C);
        assert_eq!(topmost(&table), Some(Dlg::A));
    }

    #[test]
    fn stack_is_bottom_to_top() {
        let table = table_with(&[DlgData::C(()), DlgData::A(()), DlgData::B(())]);
        assert_eq!(stack(&table), vec![Dlg::C, Dlg::A, Dlg::B]);
    }

    #[test]
    fn z_order_follows_formula() {
        let table = table_with(&[DlgData::A(()), DlgData::B(()), DlgData::C(())]);
        let layering = ZLayering::default();
        assert_eq!(z_order(&table, Dlg::A, layering), 50);
        assert_eq!(z_order(&table, Dlg::B, layering), 60);
        assert_eq!(z_order(&table, Dlg::C, layering), 70);
    }

    #[test]
    fn closed_overlay_reports_base() {
        let table = table_with(&[DlgData::A(())]);
        assert_eq!(z_order(&table, Dlg::B, ZLayering::new(100, 5)), 100);
    }

    #[test]
    fn z_order_recomputes_after_close() {
        let mut table = table_with(&[DlgData::A(()), DlgData::B(()), DlgData::C(())]);
        table.close(Dlg::A);
        let layering = ZLayering::default();
        assert_eq!(z_order(&table, Dlg::B, layering), 50);
        assert_eq!(z_order(&table, Dlg::C, layering), 60);
    }

    #[test]
    fn layers_match_z_order() {
        let table = table_with(&[DlgData::B(()), DlgData::C(())]);
        let layering = ZLayering::new(0, 3);
        let layers = layers(&table, layering);
        assert_eq!(layers, vec![(Dlg::B, 0), (Dlg::C, 3)]);
        for (key, z) in layers {
            assert_eq!(z_order(&table, key, layering), z);
        }
    }

    #[test]
    fn step_is_clamped() {
        assert_eq!(ZLayering::new(10, 0).step(), 1);
        assert_eq!(ZLayering::new(10, -4).step(), 1);
    }

    #[test]
    fn fits_checks_the_top_layer() {
        let layering = ZLayering::new(i32::MAX - 20, 10);
        assert!(layering.fits(3));
        assert!(!layering.fits(4));
        assert_eq!(layering.top_z(3), Some(i32::MAX));
        assert!(ZLayering::default().fits(1000));
    }

    #[test]
    fn fitted_layering_near_the_limit_stays_strictly_ordered() {
        let layering = ZLayering::new(i32::MAX - 5, 10).fitted(Dlg::ALL.len());
        assert_eq!(layering.step(), 10);
        assert_eq!(layering.base(), i32::MAX - 20);

        let table = table_with(&[DlgData::A(()), DlgData::B(()), DlgData::C(())]);
        let layers = layers(&table, layering);
        let z: Vec<i32> = layers.iter().map(|&(_, z)| z).collect();
        assert_eq!(z, vec![i32::MAX - 20, i32::MAX - 10, i32::MAX]);
        assert!(z.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fitted_shrinks_an_oversized_step() {
        let layering = ZLayering::new(0, i32::MAX).fitted(5);
        assert!(layering.fits(5));
        assert!(layering.step() >= 1);
        let z: Vec<i32> = (0..5).rev().map(|rank| layering.z_for_rank(rank, 5)).collect();
        assert!(z.windows(2).all(|w| w[0] < w[1]), "{z:?}");
    }

    #[test]
    fn fitted_keeps_layerings_that_already_fit() {
        let layering = ZLayering::new(-7, 3);
        assert_eq!(layering.fitted(100), layering);
    }
}
