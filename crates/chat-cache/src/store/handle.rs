//! Shared store handle

use std::sync::Arc;

use chat_core::Action;
use parking_lot::{RwLock, RwLockReadGuard};
use tracing::trace;

use super::state::StoreState;

/// Shared store handle type
pub type SharedStore = Arc<Store>;

/// The client store
///
/// Reads take a shared lock. Every write takes the exclusive lock once, so a
/// batch of actions becomes visible all together or not at all.
#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<StoreState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared handle
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    /// Create a store seeded with a state
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Borrow the current state
    ///
    /// Hold the guard briefly; writers wait until it is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read()
    }

    /// Run a selector against the current state
    pub fn select<R>(&self, selector: impl FnOnce(&StoreState) -> R) -> R {
        selector(&self.state.read())
    }

    /// Clone the whole state
    pub fn get_state(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn dispatch(&self, action: Action) {
        self.batch(vec![action]);
    }

    /// Apply several actions as one update
    pub fn batch(&self, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }
        let mut state = self.state.write();
        Self::apply_all(&mut state, &actions);
    }

    /// Compute actions from the current state and apply them under the same lock
    ///
    /// No other write can land between the read and the write. The closure
    /// returns the actions to apply plus a value handed back to the caller;
    /// on error nothing is applied.
    pub fn dispatch_with<R, E>(
        &self,
        compute: impl FnOnce(&StoreState) -> Result<(Vec<Action>, R), E>,
    ) -> Result<R, E> {
        let mut state = self.state.write();
        let (actions, value) = compute(&state)?;
        Self::apply_all(&mut state, &actions);
        Ok(value)
    }

    fn apply_all(state: &mut StoreState, actions: &[Action]) {
        for action in actions {
            state.apply(action);
        }
        trace!(
            actions = ?actions.iter().map(Action::action_type).collect::<Vec<_>>(),
            "Applied batch"
        );
    }
}
