//! Grouped undo/redo history.

/// A single reversible edit.
#[derive(Clone, Debug)]
pub(crate) enum EditOp {
    Insert { offset: usize, text: String },
    Delete { offset: usize, text: String },
}

impl EditOp {
    pub(crate) fn invert(&self) -> Self {
        match self {
            Self::Insert { offset, text } => Self::Delete {
                offset: *offset,
                text: text.clone(),
            },
            Self::Delete { offset, text } => Self::Insert {
                offset: *offset,
                text: text.clone(),
            },
        }
    }
}

/// Default maximum number of undo groups to retain.
pub(crate) const DEFAULT_UNDO_DEPTH: usize = 100;

/// Edit history with bounded depth.
///
/// Consecutive edits accumulate into the current group; a group boundary is
/// committed whenever the selection moves, so one undo reverts one burst of
/// typing. Oldest groups are dropped past the depth limit.
#[derive(Clone, Debug)]
pub(crate) struct History {
    undo_stack: Vec<Vec<EditOp>>,
    redo_stack: Vec<Vec<EditOp>>,
    current_group: Vec<EditOp>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_UNDO_DEPTH)
    }
}

impl History {
    pub(crate) fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            current_group: Vec::new(),
            max_depth,
        }
    }

    pub(crate) fn push(&mut self, op: EditOp) {
        self.current_group.push(op);
        self.redo_stack.clear();
    }

    pub(crate) fn commit(&mut self) {
        if !self.current_group.is_empty() {
            self.undo_stack
                .push(std::mem::take(&mut self.current_group));
            if self.undo_stack.len() > self.max_depth {
                let excess = self.undo_stack.len() - self.max_depth;
                self.undo_stack.drain(..excess);
            }
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Vec<EditOp>> {
        self.commit();
        self.undo_stack.pop()
    }

    pub(crate) fn push_undo_group(&mut self, ops: Vec<EditOp>) {
        self.undo_stack.push(ops);
    }

    pub(crate) fn push_redo(&mut self, ops: Vec<EditOp>) {
        self.redo_stack.push(ops);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Vec<EditOp>> {
        self.redo_stack.pop()
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.current_group.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_group.clear();
    }
}
