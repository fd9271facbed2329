/// Linear snapshot history with a cursor.
///
/// Entries are immutable snapshots of whatever state shape the host wants
/// to version together (here: the item collection plus the chosen
/// template). Committing while the cursor is not at the tail truncates the
/// forward entries; there is no branching.
///
/// [`History::set_and_commit`] is the only way new entries enter the list.
/// Per-frame gesture feedback never commits; each gesture commits exactly
/// once, on release.
#[derive(Clone, Debug)]
pub struct History<T: Clone> {
    entries: Vec<T>,
    /// Index of the current entry; meaningful only when `entries` is
    /// non-empty.
    cursor: usize,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current committed state, if any.
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.cursor)
    }

    /// Computes the next state from the current one and commits it as a
    /// new entry, discarding any redo entries past the cursor.
    pub fn set_and_commit(&mut self, update: impl FnOnce(Option<&T>) -> T) {
        let next = update(self.current());
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(next);
        self.cursor = self.entries.len() - 1;
    }

    /// Steps the cursor back one entry and returns it. `None` at the
    /// boundary; the caller applies the snapshot back into the scene.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Steps the cursor forward one entry, symmetric to [`History::undo`].
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor < self.entries.len() - 1
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
