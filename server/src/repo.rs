//! Service-scoped todo repository.
//!
//! # Design
//! `TodoRepo` owns the ordered list the API serves. It is created once at
//! startup and shared through `Db`; the only way to restore the seed records
//! is the explicit `reset` operation behind `DELETE /todos?id=0`.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Todo, UpdateTodo};

/// Owner tag given to records that do not specify one.
pub const DEFAULT_USER_ID: i64 = 1;

/// The fixed records restored by `reset`.
pub fn seed_todos() -> Vec<Todo> {
    vec![
        Todo {
            id: 1,
            text: "Learn React".to_string(),
            completed: false,
            user_id: DEFAULT_USER_ID,
        },
        Todo {
            id: 2,
            text: "Build a todo app".to_string(),
            completed: true,
            user_id: DEFAULT_USER_ID,
        },
        Todo {
            id: 3,
            text: "Write tests".to_string(),
            completed: false,
            user_id: DEFAULT_USER_ID,
        },
    ]
}

#[derive(Debug, Default)]
pub struct TodoRepo {
    todos: Vec<Todo>,
    last_id: i64,
}

impl TodoRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let last_id = todos.iter().map(|t| t.id).max().unwrap_or(0);
        Self { todos, last_id }
    }

    pub fn seeded() -> Self {
        let mut repo = Self::empty();
        repo.reset();
        repo
    }

    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    /// `None` once no id above the existing ones is left.
    pub fn create(&mut self, text: String, completed: bool, user_id: i64) -> Option<Todo> {
        let todo = Todo {
            id: self.next_id()?,
            text,
            completed,
            user_id,
        };
        self.todos.push(todo.clone());
        Some(todo)
    }

    /// Merge the present fields of `input` into the record with `input.id`.
    pub fn update(&mut self, input: UpdateTodo) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|t| t.id == input.id)?;
        if let Some(text) = input.text {
            todo.text = text;
        }
        if let Some(completed) = input.completed {
            todo.completed = completed;
        }
        if let Some(user_id) = input.user_id {
            todo.user_id = user_id;
        }
        Some(todo.clone())
    }

    pub fn remove(&mut self, id: i64) -> Option<Todo> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(index))
    }

    /// Restore exactly the seed records, discarding everything else.
    pub fn reset(&mut self) {
        self.todos = seed_todos();
        self.last_id = self.last_id.max(3);
    }

    /// Timestamp-seeded but strictly increasing, so rapid creates never
    /// collide and ids never go backwards under clock skew.
    fn next_id(&mut self) -> Option<i64> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        let known_max = self.todos.iter().map(|t| t.id).max().unwrap_or(0);
        let id = now
            .max(self.last_id.checked_add(1)?)
            .max(known_max.checked_add(1)?);
        self.last_id = id;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_repo_has_three_records() {
        let repo = TodoRepo::seeded();
        let ids: Vec<i64> = repo.list().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(repo.list()[1].completed);
    }

    #[test]
    fn create_appends_with_fresh_ids() {
        let mut repo = TodoRepo::seeded();
        let a = repo.create("a".to_string(), false, 1).unwrap();
        let b = repo.create("b".to_string(), false, 1).unwrap();
        assert!(b.id > a.id);
        assert!(a.id > 3);
        assert_eq!(repo.list().last().map(|t| t.id), Some(b.id));
    }

    #[test]
    fn update_preserves_absent_fields() {
        let mut repo = TodoRepo::seeded();
        let updated = repo
            .update(UpdateTodo {
                id: 1,
                text: None,
                completed: Some(true),
                user_id: None,
            })
            .unwrap();
        assert_eq!(updated.text, "Learn React");
        assert!(updated.completed);
        assert_eq!(updated.user_id, 1);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut repo = TodoRepo::seeded();
        let result = repo.update(UpdateTodo {
            id: 99,
            text: Some("x".to_string()),
            completed: None,
            user_id: None,
        });
        assert!(result.is_none());
    }

    #[test]
    fn create_refuses_when_ids_run_out() {
        let mut repo = TodoRepo::with_todos(vec![Todo {
            id: i64::MAX,
            text: "last".to_string(),
            completed: false,
            user_id: 1,
        }]);
        assert!(repo.create("next".to_string(), false, 1).is_none());
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn reset_restores_seed_after_changes() {
        let mut repo = TodoRepo::seeded();
        repo.remove(2);
        repo.create("extra".to_string(), true, 7);
        repo.reset();
        assert_eq!(repo.list(), seed_todos().as_slice());
    }

    #[test]
    fn ids_stay_fresh_after_reset() {
        let mut repo = TodoRepo::seeded();
        let before = repo.create("a".to_string(), false, 1).unwrap();
        repo.reset();
        let after = repo.create("b".to_string(), false, 1).unwrap();
        assert!(after.id > before.id);
    }
}
