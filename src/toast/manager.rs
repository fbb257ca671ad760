use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::types::ToastStatus;

use super::entry::{Dismissal, ToastAction, ToastEntry, ToastId, ToastMessage};

/// Dismissal used by [`ToastManager::notify`].
pub const DEFAULT_DISMISS: Dismissal = Dismissal::After(Duration::from_secs(5));

/// Owner of the active toast sequence and of the auto-dismiss timers.
///
/// Cloning is cheap; every clone drives the same active set.
#[derive(Clone)]
pub struct ToastManager {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    snapshots: watch::Sender<Vec<ToastEntry>>,
    default_dismiss: Dismissal,
}

#[derive(Default)]
struct State {
    entries: Vec<ToastEntry>,
    timers: HashMap<ToastId, JoinHandle<()>>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::with_default_dismiss(DEFAULT_DISMISS)
    }

    pub fn with_default_dismiss(default_dismiss: Dismissal) -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                snapshots,
                default_dismiss,
            }),
        }
    }

    /// Append a toast and return its id.
    ///
    /// Terminal toasts with a non-zero dismissal get an expiry timer keyed by
    /// the new id. Loading toasts never do, whatever `auto_dismiss` says. A
    /// zero delay, or one past the range of the clock, is stored as
    /// [`Dismissal::Never`].
    ///
    /// # Panics
    ///
    /// Scheduling a timer spawns onto the ambient Tokio runtime, so this must
    /// be called from within one.
    pub fn create(
        &self,
        message: ToastMessage,
        status: ToastStatus,
        auto_dismiss: Dismissal,
        action: Option<ToastAction>,
    ) -> ToastId {
        let id = ToastId::generate();
        let mut auto_dismiss = auto_dismiss.normalized();
        let deadline = match auto_dismiss.delay() {
            Some(delay) if status.is_terminal() => {
                let deadline = Instant::now().checked_add(delay);
                if deadline.is_none() {
                    warn!(
                        toast_id = %id,
                        delay_ms = millis(delay),
                        "dismissal delay out of range, toast stays until removed"
                    );
                    auto_dismiss = Dismissal::Never;
                }
                deadline
            }
            _ => None,
        };
        let entry = ToastEntry {
            id,
            message,
            status,
            action,
            auto_dismiss,
        };

        let mut state = self.lock();
        state.entries.push(entry);
        if let Some(deadline) = deadline {
            let timer = self.schedule_expiry(id, deadline);
            state.timers.insert(id, timer);
        }
        self.publish(&state);
        let active = state.entries.len();
        drop(state);

        debug!(
            toast_id = %id,
            %status,
            delay_ms = deadline.and(auto_dismiss.delay()).map_or(0, millis),
            active,
            "toast created"
        );
        id
    }

    /// [`create`](Self::create) with the manager's default dismissal.
    pub fn notify(
        &self,
        message: ToastMessage,
        status: ToastStatus,
        action: Option<ToastAction>,
    ) -> ToastId {
        self.create(message, status, self.shared.default_dismiss, action)
    }

    /// Drop the toast `id` and cancel its pending timer. Unknown ids are ignored.
    pub fn remove(&self, id: ToastId) {
        let mut state = self.lock();
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        if Self::take_entry(&mut state, id) {
            self.publish(&state);
            debug!(toast_id = %id, active = state.entries.len(), "toast removed");
        }
    }

    /// Ordered copy of the active set, oldest first.
    pub fn active_entries(&self) -> Vec<ToastEntry> {
        self.lock().entries.clone()
    }

    pub fn get(&self, id: ToastId) -> Option<ToastEntry> {
        self.lock().entries.iter().find(|entry| entry.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Run the action attached to `id`. Returns `false` when the toast is gone
    /// or has no action. The toast itself stays in place.
    pub fn activate(&self, id: ToastId) -> bool {
        let action = self
            .lock()
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.action.clone());

        match action {
            Some(action) => {
                debug!(toast_id = %id, label = action.label(), "toast action activated");
                action.activate();
                true
            }
            None => false,
        }
    }

    /// Receiver that observes a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ToastEntry>> {
        self.shared.snapshots.subscribe()
    }

    /// Resolves once no remaining toast is waiting on an expiry timer.
    ///
    /// Loading toasts and toasts that never auto-dismiss are ignored, so this
    /// can finish while the active set is still non-empty.
    pub async fn wait_until_settled(&self) {
        let mut snapshots = self.subscribe();
        let closed = snapshots
            .wait_for(|entries| !entries.iter().any(ToastEntry::expires))
            .await
            .is_err();
        if closed {
            debug!("toast manager closed while waiting for expiries");
        }
    }

    /// Dismiss/activate handle for renderers. It does not keep the manager
    /// alive, so a presenter loop ends once every manager clone is dropped.
    pub fn controls(&self) -> ToastControls {
        ToastControls {
            shared: Arc::downgrade(&self.shared),
        }
    }

    fn schedule_expiry(&self, id: ToastId, deadline: Instant) -> JoinHandle<()> {
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            sleep_until(deadline).await;
            if let Some(manager) = Self::upgrade(&shared) {
                manager.expire(id);
            }
        })
    }

    fn expire(&self, id: ToastId) {
        let mut state = self.lock();
        // Running inside the timer task itself; dropping the handle detaches it.
        state.timers.remove(&id);
        if Self::take_entry(&mut state, id) {
            self.publish(&state);
            debug!(toast_id = %id, active = state.entries.len(), "toast expired");
        }
    }

    fn take_entry(state: &mut State, id: ToastId) -> bool {
        match state.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                state.entries.remove(index);
                true
            }
            None => false,
        }
    }

    fn publish(&self, state: &State) {
        self.shared.snapshots.send_replace(state.entries.clone());
    }

    fn upgrade(shared: &Weak<Shared>) -> Option<Self> {
        shared.upgrade().map(|shared| Self { shared })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The only mutations a renderer may trigger: the close button and the action
/// button of a toast.
#[derive(Clone, Debug)]
pub struct ToastControls {
    shared: Weak<Shared>,
}

impl ToastControls {
    pub fn dismiss(&self, id: ToastId) {
        if let Some(manager) = ToastManager::upgrade(&self.shared) {
            manager.remove(id);
        }
    }

    pub fn activate(&self, id: ToastId) -> bool {
        ToastManager::upgrade(&self.shared).is_some_and(|manager| manager.activate(id))
    }
}

fn millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToastManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ToastManager")
            .field("active", &state.entries.len())
            .field("pending_timers", &state.timers.len())
            .finish_non_exhaustive()
    }
}
