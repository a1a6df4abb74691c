//! Rising-edge one-shot notification.

/// Fires a registered callback exactly once per false→true transition of a
/// boolean signal.
///
/// `provide_state` must be called once per control-loop tick with the
/// instantaneous signal level. No history is kept beyond the last level.
/// With no callback registered, transitions are tracked but nothing fires.
#[derive(Default)]
pub struct EdgeSignal {
    last_state: bool,
    callback: Option<Box<dyn FnMut()>>,
}

impl EdgeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the current signal level.
    ///
    /// On a false→true transition the registered callback is invoked
    /// synchronously; false→false, true→true and true→false have no effect
    /// beyond updating the stored level.
    pub fn provide_state(&mut self, state: bool) {
        if state != self.last_state {
            if state && let Some(cb) = self.callback.as_mut() {
                cb();
            }
            self.last_state = state;
        }
    }

    /// Register the function called on each rising edge. At most one
    /// subscriber; a later call replaces the earlier one.
    pub fn set_callback(&mut self, callback: impl FnMut() + 'static) {
        self.callback = Some(Box::new(callback));
    }
}

impl core::fmt::Debug for EdgeSignal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EdgeSignal")
            .field("last_state", &self.last_state)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
