//! Ordered in-process collection of todos.
//!
//! # Design
//! The store keeps todos in display order. It never talks to the network and
//! never validates: id uniqueness and reorder permutations are the caller's
//! responsibility. Every operation is total; missing ids are no-ops.

use crate::types::{Todo, TodoId, TodoPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn max_id(&self) -> TodoId {
        self.todos.iter().map(|t| t.id).max().unwrap_or(0)
    }

    /// Overwrite the whole sequence, keeping the given order.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    /// New items appear first. Id collisions are not checked.
    pub fn insert_front(&mut self, todo: Todo) {
        self.todos.insert(0, todo);
    }

    /// Merge `patch` into the record with `id`, keeping its position.
    pub fn update(&mut self, id: TodoId, patch: TodoPatch) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            patch.apply(todo);
        }
    }

    /// Remove the first record with `id`.
    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(index))
    }

    /// Replace the sequence with a caller-supplied permutation.
    pub fn reorder(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }
}
