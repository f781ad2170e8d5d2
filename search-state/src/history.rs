use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo stack of snapshots.
///
/// `present` is what callers see. `checkpoint` is the snapshot produced by the
/// last [`History::record`]; [`History::replace`] moves `present` without
/// creating a checkpoint, and those intermediate states are not restored by
/// undo or redo.
#[derive(Clone, Debug)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    checkpoint: T,
    future: Vec<T>,
    limit: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial.clone(),
            checkpoint: initial,
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Makes `state` the new checkpoint. Clears the redo stack and drops the
    /// oldest entries beyond the limit.
    pub fn record(&mut self, state: T) {
        let previous = std::mem::replace(&mut self.checkpoint, state.clone());
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        self.present = state;
    }

    pub fn replace(&mut self, state: T) {
        self.present = state;
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.checkpoint, previous.clone());
        self.future.push(current);
        self.present = previous;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.checkpoint, next.clone());
        self.past.push_back(current);
        self.present = next;
        true
    }
}
