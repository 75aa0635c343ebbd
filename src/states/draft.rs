//! Config Draft Store
//!
//! Keeps the last configuration the service confirmed (`saved`) apart from the
//! one being edited (`draft`). Dirtiness is always derived from the two, never
//! stored.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{ConfigEdit, Configuration, ResolutionPreset};
use crate::error::{Error, Result};
use crate::services::ServiceClient;

#[derive(Debug, Default)]
struct DraftState {
    saved: Configuration,
    draft: Configuration,
    loaded: bool,
    loading: bool,
    saving: bool,
}

/// Shared handle to the saved/draft configuration pair
#[derive(Clone, Debug, Default)]
pub struct ConfigDraftStore {
    inner: Arc<Mutex<DraftState>>,
}

#[derive(Debug, Clone, Copy)]
enum Activity {
    Loading,
    Saving,
}

impl DraftState {
    fn flag(&mut self, activity: Activity) -> &mut bool {
        match activity {
            Activity::Loading => &mut self.loading,
            Activity::Saving => &mut self.saving,
        }
    }
}

/// Clears an activity flag however the round-trip ends, cancellation included
struct ActivityFlag<'a> {
    state: &'a Mutex<DraftState>,
    activity: Activity,
}

impl Drop for ActivityFlag<'_> {
    fn drop(&mut self) {
        *self.state.lock().flag(self.activity) = false;
    }
}

impl ConfigDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Getters ====================

    /// Last configuration confirmed by the service
    pub fn saved(&self) -> Configuration {
        self.inner.lock().saved.clone()
    }

    /// Configuration currently being edited
    pub fn draft(&self) -> Configuration {
        self.inner.lock().draft.clone()
    }

    /// Whether a load has succeeded at least once
    pub fn is_loaded(&self) -> bool {
        self.inner.lock().loaded
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    pub fn is_saving(&self) -> bool {
        self.inner.lock().saving
    }

    /// Draft differs from saved
    pub fn is_dirty(&self) -> bool {
        let state = self.inner.lock();
        state.draft != state.saved
    }

    // ==================== Service Round-Trips ====================

    /// Fetch the configuration and reset both snapshots to it
    ///
    /// On failure nothing changes except the loading flag.
    pub async fn load(&self, service: &dyn ServiceClient) -> Result<Configuration> {
        self.inner.lock().loading = true;
        let _loading = ActivityFlag {
            state: &self.inner,
            activity: Activity::Loading,
        };
        let result = service.load_configuration().await;

        let mut state = self.inner.lock();
        match result {
            Ok(config) => {
                state.saved = config.clone();
                state.draft = config.clone();
                state.loaded = true;
                info!(game = %config.game, desktop = %config.desktop, "Configuration loaded");
                Ok(config)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load configuration");
                Err(e)
            }
        }
    }

    /// Send the whole draft to the service
    ///
    /// Only one commit may run at a time. On success `saved` becomes the value
    /// that was sent; on failure both snapshots are left untouched.
    pub async fn commit(&self, service: &dyn ServiceClient) -> Result<()> {
        let pending = {
            let mut state = self.inner.lock();
            if state.saving {
                return Err(Error::CommitInProgress);
            }
            if state.draft == state.saved {
                return Err(Error::precondition("there are no unsaved changes"));
            }
            state.draft.validate()?;
            state.saving = true;
            state.draft.clone()
        };
        let _saving = ActivityFlag {
            state: &self.inner,
            activity: Activity::Saving,
        };

        match service.save_configuration(pending.clone()).await {
            Ok(()) => {
                info!(game = %pending.game, desktop = %pending.desktop, "Configuration saved");
                self.inner.lock().saved = pending;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to save configuration");
                Err(Error::Commit {
                    message: e.to_string(),
                })
            }
        }
    }

    // ==================== Local Edits ====================

    /// Edit one field of the draft
    pub fn update_field(&self, edit: ConfigEdit) {
        debug!(?edit, "Draft edit");
        self.inner.lock().draft.apply(edit);
    }

    /// Apply several edits under one lock so readers never see half of them
    pub fn apply_edits(&self, edits: impl IntoIterator<Item = ConfigEdit>) {
        let mut state = self.inner.lock();
        for edit in edits {
            state.draft.apply(edit);
        }
    }

    pub fn apply_preset(&self, preset: &ResolutionPreset) {
        debug!(preset = preset.label, "Applying game resolution preset");
        self.apply_edits(preset.edits());
    }

    /// Throw the draft away
    pub fn discard(&self) {
        let mut state = self.inner.lock();
        state.draft = state.saved.clone();
    }

    /// Adopt a configuration the service persisted on its own
    ///
    /// A clean draft follows the new value; a dirty one is kept so pending
    /// edits are not lost. Returns whether the draft was replaced.
    pub fn rebase(&self, persisted: Configuration) -> bool {
        let mut state = self.inner.lock();
        let clean = state.draft == state.saved;
        if clean {
            state.draft = persisted.clone();
        } else {
            debug!("Keeping dirty draft over externally persisted configuration");
        }
        state.saved = persisted;
        state.loaded = true;
        clean
    }
}
