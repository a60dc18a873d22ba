//! Synchronization between user intents, the local store and the remote.
//!
//! # Design
//! `TodoSync` owns the `TodoStore` and a `RemoteTodoService`. Every mutating
//! intent follows confirm-before-apply: the remote call is made first and the
//! store only changes once the server has answered, using the server's record.
//! A failed call leaves the store exactly as it was.
//!
//! Each in-flight intent is tracked under an `OpKey`. State sits behind a
//! lock that is taken for short, synchronous sections only and never held
//! across an `.await`, so intents on different keys overlap freely (a toggle
//! can run while an add is still waiting on the server).
//!
//! Reordering is local only; the server has no notion of order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::{ConfigError, Operation, SyncError, ValidationError};
use crate::filter::{StatusFilter, TodoQuery};
use crate::ids::IdGenerator;
use crate::remote::RemoteTodoService;
use crate::store::TodoStore;
use crate::types::{CreateTodo, Todo, TodoId, TodoPatch, UpdateTodo};
use crate::validate::{validate_permutation, validate_text};

/// Identifies one logical in-flight operation. Adds are keyed by their
/// provisional id, since the real id is only known once the server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKey {
    List,
    Add(TodoId),
    Toggle(TodoId),
    Edit(TodoId),
    Delete(TodoId),
}

impl OpKey {
    pub fn operation(self) -> Operation {
        match self {
            OpKey::List => Operation::List,
            OpKey::Add(_) => Operation::Add,
            OpKey::Toggle(_) => Operation::Toggle,
            OpKey::Edit(_) => Operation::Edit,
            OpKey::Delete(_) => Operation::Delete,
        }
    }
}

/// `Idle -> Pending -> Idle` on success, `Pending -> Failed` otherwise.
/// A failure stays visible until the same key is retried or dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Idle,
    Pending,
    Failed(SyncError),
}

/// A delete the user asked for but has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: TodoId,
    pub text: String,
}

#[derive(Debug, Default)]
struct SyncState {
    store: TodoStore,
    ops: HashMap<OpKey, OpStatus>,
    pending_delete: Option<PendingDelete>,
    query: TodoQuery,
    ids: IdGenerator,
}

impl SyncState {
    fn begin(&mut self, key: OpKey) {
        debug!(?key, "dispatch");
        // Each add gets a fresh key, so a new add is the retry of any
        // earlier failed one.
        if matches!(key, OpKey::Add(_)) {
            self.ops.retain(|k, status| {
                !(matches!(k, OpKey::Add(_)) && matches!(status, OpStatus::Failed(_)))
            });
        }
        self.ops.insert(key, OpStatus::Pending);
    }

    fn confirm(&mut self, key: OpKey) {
        debug!(?key, "confirmed");
        self.ops.remove(&key);
    }

    fn fail(&mut self, key: OpKey, err: SyncError) {
        warn!(?key, error = %err, "remote call failed");
        self.ops.insert(key, OpStatus::Failed(err));
    }
}

pub struct TodoSync<R> {
    remote: R,
    list_attempts: u32,
    state: Mutex<SyncState>,
}

impl TodoSync<Box<dyn RemoteTodoService>> {
    /// Build the remote named by `config` and wrap it.
    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_config(config.remote.connect()?, config))
    }
}

impl<R: RemoteTodoService> TodoSync<R> {
    pub fn new(remote: R) -> Self {
        Self::with_config(remote, &SyncConfig::default())
    }

    pub fn with_config(remote: R, config: &SyncConfig) -> Self {
        Self {
            remote,
            list_attempts: config.list_attempts(),
            state: Mutex::new(SyncState::default()),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn state(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The full sequence, in display order.
    pub fn todos(&self) -> Vec<Todo> {
        self.state().store.todos().to_vec()
    }

    /// The sequence narrowed by the active status filter and search.
    pub fn visible(&self) -> Vec<Todo> {
        let state = self.state();
        state
            .query
            .apply(state.store.todos())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn query(&self) -> TodoQuery {
        self.state().query.clone()
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        self.state().query.status = status;
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.state().query.search = search.into();
    }

    pub fn status(&self, key: OpKey) -> OpStatus {
        self.state().ops.get(&key).cloned().unwrap_or(OpStatus::Idle)
    }

    pub fn is_pending(&self, key: OpKey) -> bool {
        self.status(key) == OpStatus::Pending
    }

    /// Keys with a remote call in flight.
    pub fn pending(&self) -> Vec<OpKey> {
        self.state()
            .ops
            .iter()
            .filter(|(_, status)| **status == OpStatus::Pending)
            .map(|(key, _)| *key)
            .collect()
    }

    /// Failures not yet retried or dismissed.
    pub fn errors(&self) -> Vec<(OpKey, SyncError)> {
        self.state()
            .ops
            .iter()
            .filter_map(|(key, status)| match status {
                OpStatus::Failed(err) => Some((*key, err.clone())),
                _ => None,
            })
            .collect()
    }

    /// Clear a failure. Pending operations are left alone.
    pub fn dismiss(&self, key: OpKey) {
        let mut state = self.state();
        if matches!(state.ops.get(&key), Some(OpStatus::Failed(_))) {
            state.ops.remove(&key);
        }
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Fetch the full list and replace the store with it. On failure the
    /// store keeps its previous contents.
    pub async fn load(&self) -> Result<(), SyncError> {
        let key = OpKey::List;
        self.state().begin(key);

        let mut attempt = 1;
        loop {
            match self.remote.list().await {
                Ok(todos) => {
                    let mut state = self.state();
                    state.store.replace_all(todos);
                    state.confirm(key);
                    return Ok(());
                }
                Err(err) if attempt < self.list_attempts => {
                    warn!(attempt, error = %err, "list failed, retrying");
                    attempt += 1;
                }
                Err(err) => {
                    let err = SyncError::from_remote(Operation::List, None, err);
                    self.state().fail(key, err.clone());
                    return Err(err);
                }
            }
        }
    }

    /// Create a todo. Invalid text is rejected without contacting the
    /// remote. The server's record, not a local guess, lands at the front
    /// of the store.
    pub async fn add(&self, input: CreateTodo) -> Result<Todo, SyncError> {
        if let Err(source) = validate_text(&input.text) {
            warn!(error = %source, "add rejected");
            return Err(SyncError::Validation {
                operation: Operation::Add,
                source,
            });
        }

        let key = {
            let mut state = self.state();
            let floor = state.store.max_id();
            let Some(provisional) = state.ids.next_above(floor) else {
                warn!(floor, "add rejected, no provisional id left");
                return Err(SyncError::Validation {
                    operation: Operation::Add,
                    source: ValidationError::IdsExhausted(floor),
                });
            };
            let key = OpKey::Add(provisional);
            state.begin(key);
            key
        };

        match self.remote.create(&input).await {
            Ok(todo) => {
                let mut state = self.state();
                state.store.insert_front(todo.clone());
                state.confirm(key);
                Ok(todo)
            }
            Err(err) => {
                let err = SyncError::from_remote(Operation::Add, None, err);
                self.state().fail(key, err.clone());
                Err(err)
            }
        }
    }

    /// Set the completion flag of `id`.
    pub async fn toggle(&self, id: TodoId, completed: bool) -> Result<Todo, SyncError> {
        self.update(OpKey::Toggle(id), UpdateTodo::completed(id, completed))
            .await
    }

    /// Replace the text of `id`, validated like `add`.
    pub async fn edit(&self, id: TodoId, text: impl Into<String>) -> Result<Todo, SyncError> {
        let text = text.into();
        if let Err(source) = validate_text(&text) {
            warn!(id, error = %source, "edit rejected");
            return Err(SyncError::Validation {
                operation: Operation::Edit,
                source,
            });
        }
        self.update(OpKey::Edit(id), UpdateTodo::text(id, text)).await
    }

    async fn update(&self, key: OpKey, input: UpdateTodo) -> Result<Todo, SyncError> {
        let id = input.id;
        self.state().begin(key);

        match self.remote.update(&input).await {
            Ok(todo) => {
                let mut state = self.state();
                state.store.update(id, TodoPatch::from(todo.clone()));
                state.confirm(key);
                Ok(todo)
            }
            Err(err) => {
                let err = SyncError::from_remote(key.operation(), Some(id), err);
                self.state().fail(key, err.clone());
                Err(err)
            }
        }
    }

    /// First step of a delete: remember which todo the user wants gone.
    /// Nothing is sent yet. Returns `None` for ids the store does not hold.
    /// A second request replaces the first.
    pub fn request_delete(&self, id: TodoId) -> Option<PendingDelete> {
        let mut state = self.state();
        let todo = state.store.get(id)?;
        let pending = PendingDelete {
            id,
            text: todo.text.clone(),
        };
        state.pending_delete = Some(pending.clone());
        Some(pending)
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.state().pending_delete.clone()
    }

    /// Drop the pending delete without side effects.
    pub fn cancel_delete(&self) {
        if let Some(pending) = self.state().pending_delete.take() {
            debug!(id = pending.id, "delete cancelled");
        }
    }

    /// Second step of a delete: send it. Returns the deleted id, or `None`
    /// when no delete was pending.
    pub async fn confirm_delete(&self) -> Result<Option<TodoId>, SyncError> {
        let id = {
            let mut state = self.state();
            let Some(pending) = state.pending_delete.take() else {
                return Ok(None);
            };
            state.begin(OpKey::Delete(pending.id));
            pending.id
        };
        let key = OpKey::Delete(id);

        match self.remote.delete(id).await {
            Ok(()) => {
                let mut state = self.state();
                state.store.remove(id);
                state.confirm(key);
                Ok(Some(id))
            }
            Err(err) => {
                let err = SyncError::from_remote(Operation::Delete, Some(id), err);
                self.state().fail(key, err.clone());
                Err(err)
            }
        }
    }

    /// Apply a new display order. `ids` must be a permutation of the
    /// current ids; nothing is sent to the remote.
    pub fn reorder(&self, ids: &[TodoId]) -> Result<(), SyncError> {
        let mut state = self.state();
        validate_permutation(state.store.todos(), ids).map_err(reorder_error)?;

        let reordered: Vec<Todo> = ids
            .iter()
            .filter_map(|id| state.store.get(*id).cloned())
            .collect();
        state.store.reorder(reordered);
        debug!(count = ids.len(), "reordered");
        Ok(())
    }

    /// Drop `dragged` onto the position held by `target`, shifting the
    /// todos in between, as a drag gesture does. Rows are named by id, so
    /// the move is the same whether the list on screen is filtered or not.
    pub fn move_item(&self, dragged: TodoId, target: TodoId) -> Result<(), SyncError> {
        let mut ids: Vec<TodoId> = self.state().store.todos().iter().map(|t| t.id).collect();
        let position = |id: TodoId| {
            ids.iter()
                .position(|candidate| *candidate == id)
                .ok_or_else(|| reorder_error(ValidationError::UnknownTodo(id)))
        };
        let from = position(dragged)?;
        let to = position(target)?;
        let id = ids.remove(from);
        ids.insert(to, id);
        self.reorder(&ids)
    }
}

fn reorder_error(source: ValidationError) -> SyncError {
    SyncError::Validation {
        operation: Operation::Reorder,
        source,
    }
}
