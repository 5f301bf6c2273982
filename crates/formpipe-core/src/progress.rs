//! Upload progress reporting
//!
//! Percent extraction from raw progress counters, plus the transient
//! handle for a locally previewed attachment.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Compute an upload percent from raw counters
///
/// Returns `None` when `total` is absent or zero; otherwise the rounded
/// percent clamped to 0-100.
#[inline]
#[must_use]
pub fn percent(loaded: u64, total: Option<u64>) -> Option<u8> {
    let total = total.filter(|t| *t > 0)?;
    let rounded = loaded.saturating_mul(100).saturating_add(total / 2) / total;
    Some(rounded.min(100) as u8)
}

/// Ownership handle to a locally previewed attachment
///
/// Backed by a temporary file that is removed when the handle drops.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Write attachment bytes into a fresh temporary file
    ///
    /// # Errors
    /// I/O errors creating or writing the temporary file
    pub fn create(bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path of the previewed file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Slot holding at most one preview handle per field
///
/// Replacing or clearing the slot releases the prior handle, so at most one
/// temporary resource is alive at a time.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<PreviewHandle>,
}

impl PreviewSlot {
    /// Create an empty slot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new handle, releasing any prior one
    #[inline]
    pub fn replace(&mut self, handle: PreviewHandle) {
        self.current = Some(handle);
    }

    /// Release the held handle, if any
    #[inline]
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Path of the current preview, if one is held
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(PreviewHandle::path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn percent_requires_total() {
        assert_eq!(percent(5_000_000, None), None);
        assert_eq!(percent(0, Some(0)), None);
    }

    #[test]
    fn percent_halfway_upload() {
        assert_eq!(percent(5_000_000, Some(10_000_000)), Some(50));
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent(1, Some(3)), Some(33));
        assert_eq!(percent(2, Some(3)), Some(67));
    }

    #[test]
    fn percent_clamps_overshoot() {
        // Some transports report loaded > total for the final flush.
        assert_eq!(percent(11, Some(10)), Some(100));
    }

    #[test]
    fn preview_slot_holds_one_handle() {
        let mut slot = PreviewSlot::new();
        assert!(slot.path().is_none());

        let first = PreviewHandle::create(b"first").unwrap();
        let first_path = first.path().to_path_buf();
        slot.replace(first);
        assert_eq!(slot.path(), Some(first_path.as_path()));

        let second = PreviewHandle::create(b"second").unwrap();
        slot.replace(second);
        // Superseded handle released its file.
        assert!(!first_path.exists());

        let second_path = slot.path().unwrap().to_path_buf();
        slot.clear();
        assert!(!second_path.exists());
    }

    proptest! {
        #[test]
        fn percent_in_range(loaded in 0u64..=u64::MAX / 200, total in 1u64..=u64::MAX / 200) {
            let p = percent(loaded, Some(total)).unwrap();
            prop_assert!(p <= 100);
        }

        #[test]
        fn percent_monotone_in_loaded(total in 1u64..10_000_000u64, a in 0u64..10_000_000u64, b in 0u64..10_000_000u64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = percent(lo, Some(total)).unwrap();
            let p_hi = percent(hi, Some(total)).unwrap();
            prop_assert!(p_lo <= p_hi);
        }
    }
}
