//! Client-side mirror of the server task list.
//!
//! The store is a cache of server state: it is replaced wholesale by every
//! reload. Between reloads the mutation controller layers optimistic
//! changes on top of it. Each change is recorded as an
//! [`OptimisticMutation`] carrying the snapshot needed to undo it, and the
//! ids it touches stay locked until the change is settled or reverted.
//!
//! Reloads are ticketed: a ticket is taken before the list is fetched, and
//! every local change or applied reload retires all earlier tickets, so a
//! snapshot fetched before the latest change can never overwrite it.

use std::collections::HashSet;

use crate::models::{NewTask, Task, TaskId};
use crate::{AppError, Result};

/// A locally applied change paired with what is needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimisticMutation {
    /// A placeholder was appended for a create request.
    Insert {
        /// Provisional id of the placeholder.
        provisional_id: TaskId,
    },
    /// Completion was flipped.
    Toggle {
        /// Affected task.
        id: TaskId,
        /// Completion flag before the flip.
        previous: bool,
    },
    /// A task was removed.
    Delete {
        /// Position the task occupied.
        index: usize,
        /// The removed record.
        task: Task,
    },
}

impl OptimisticMutation {
    /// Id whose in-flight guard this mutation holds.
    #[must_use]
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Insert { provisional_id } => *provisional_id,
            Self::Toggle { id, .. } => *id,
            Self::Delete { task, .. } => task.id,
        }
    }
}

/// Aggregate counts shown under the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// All tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// `total - completed`.
    pub pending: usize,
}

impl Stats {
    /// Count a task slice.
    #[must_use]
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// Issued by [`TaskStore::reload_ticket`] before a list is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

/// Ordered task list plus optimistic bookkeeping.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_provisional: TaskId,
    in_flight: HashSet<TaskId>,
    next_ticket: u64,
    oldest_valid: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_provisional: -1,
            in_flight: HashSet::new(),
            next_ticket: 0,
            oldest_valid: 0,
        }
    }

    /// Tasks in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Aggregate counts.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::of(&self.tasks)
    }

    /// Whether an optimistic change for `id` is awaiting the server.
    #[must_use]
    pub fn is_in_flight(&self, id: TaskId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Whether no optimistic change is awaiting the server.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Take a ticket for a reload about to be fetched.
    pub fn reload_ticket(&mut self) -> ReloadTicket {
        let ticket = ReloadTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// Replace the list with the reload fetched under `ticket`.
    ///
    /// Returns `false` and leaves the store untouched while any optimistic
    /// change is in flight, or when a local change or a newer reload was
    /// applied after the ticket was taken.
    pub fn apply_reload(&mut self, ticket: ReloadTicket, tasks: Vec<Task>) -> bool {
        if !self.is_idle() || ticket.0 < self.oldest_valid {
            return false;
        }
        self.tasks = tasks;
        self.oldest_valid = ticket.0 + 1;
        true
    }

    /// Replace the list with a freshly fetched reload.
    pub fn replace_all(&mut self, tasks: Vec<Task>) -> bool {
        let ticket = self.reload_ticket();
        self.apply_reload(ticket, tasks)
    }

    /// Drop everything, including in-flight bookkeeping.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.in_flight.clear();
        self.next_provisional = -1;
        self.retire_tickets();
    }

    /// Append a placeholder for `new_task` under a fresh provisional id.
    pub fn begin_insert(&mut self, new_task: &NewTask) -> OptimisticMutation {
        let provisional_id = self.next_provisional;
        self.next_provisional -= 1;
        self.tasks.push(Task::provisional(provisional_id, new_task));
        self.in_flight.insert(provisional_id);
        self.retire_tickets();
        OptimisticMutation::Insert { provisional_id }
    }

    /// Flip completion of `id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id and `AppError::Busy`
    /// while another change to the same task is in flight.
    pub fn begin_toggle(&mut self, id: TaskId) -> Result<OptimisticMutation> {
        self.ensure_free(id)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::NotFound(format!("task {id}")))?;
        let previous = task.completed;
        task.completed = !previous;
        self.in_flight.insert(id);
        self.retire_tickets();
        Ok(OptimisticMutation::Toggle { id, previous })
    }

    /// Remove `id` from the list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id and `AppError::Busy`
    /// while another change to the same task is in flight.
    pub fn begin_delete(&mut self, id: TaskId) -> Result<OptimisticMutation> {
        self.ensure_free(id)?;
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::NotFound(format!("task {id}")))?;
        let task = self.tasks.remove(index);
        self.in_flight.insert(id);
        self.retire_tickets();
        Ok(OptimisticMutation::Delete { index, task })
    }

    /// The server confirmed `mutation`; release its guard.
    pub fn settle(&mut self, mutation: &OptimisticMutation) {
        self.in_flight.remove(&mutation.task_id());
        self.retire_tickets();
    }

    /// The server rejected `mutation`; apply its inverse and release its guard.
    pub fn revert(&mut self, mutation: OptimisticMutation) {
        self.in_flight.remove(&mutation.task_id());
        self.retire_tickets();
        match mutation {
            OptimisticMutation::Insert { provisional_id } => {
                self.tasks.retain(|task| task.id != provisional_id);
            }
            OptimisticMutation::Toggle { id, previous } => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
                    task.completed = previous;
                }
            }
            OptimisticMutation::Delete { index, task } => {
                let index = index.min(self.tasks.len());
                self.tasks.insert(index, task);
            }
        }
    }

    // Lists fetched before this point predate the local change.
    fn retire_tickets(&mut self) {
        self.oldest_valid = self.next_ticket;
    }

    fn ensure_free(&self, id: TaskId) -> Result<()> {
        if self.is_in_flight(id) {
            return Err(AppError::Busy(format!("task {id} is still being updated")));
        }
        Ok(())
    }
}
