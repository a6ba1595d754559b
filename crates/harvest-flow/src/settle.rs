//! Pending-state slot that falls back when its future is dropped.

/// Holds a state slot in its pending value across an `.await`.
///
/// If the owning future is dropped before [`Settle::settle`] runs, the slot
/// is set to `on_abandon` so the machine never stays stuck in a pending state.
pub(crate) struct Settle<'a, S> {
    slot: &'a mut S,
    on_abandon: Option<S>,
}

impl<'a, S> Settle<'a, S> {
    /// Writes `pending` into `slot` and arms the fallback.
    pub(crate) fn enter(slot: &'a mut S, pending: S, on_abandon: S) -> Self {
        *slot = pending;
        Settle {
            slot,
            on_abandon: Some(on_abandon),
        }
    }

    /// Writes the resolved state and disarms the fallback.
    pub(crate) fn settle(mut self, resolved: S) {
        self.on_abandon = None;
        *self.slot = resolved;
    }
}

impl<S> Drop for Settle<'_, S> {
    fn drop(&mut self) {
        if let Some(fallback) = self.on_abandon.take() {
            *self.slot = fallback;
        }
    }
}
