/// The active source label of a [`Debugger`](crate::Debugger), with the labels it replaced.
///
/// [`push`](SourceStack::push) makes a new label current and remembers the previous one,
/// [`pop`](SourceStack::pop) gives the current label back and restores the previous one.
/// Unmatched pushes are tolerated; they only leave entries behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceStack {
    current: String,
    saved: Vec<String>,
}

impl SourceStack {
    /// Creates a stack with `initial` as the current label and nothing saved.
    #[must_use]
    pub fn new<S: Into<String>>(initial: S) -> Self {
        Self {
            current: initial.into(),
            saved: Vec::new(),
        }
    }

    /// Saves the current label and makes `source` current.
    pub fn push<S: Into<String>>(&mut self, source: S) {
        let previous = std::mem::replace(&mut self.current, source.into());
        self.saved.push(previous);
    }

    /// Removes the most recently pushed label and returns it,
    /// making the label it replaced current again.
    ///
    /// Returns `None`, and changes nothing, if no push is left to undo.
    pub fn pop(&mut self) -> Option<String> {
        let previous = self.saved.pop()?;
        Some(std::mem::replace(&mut self.current, previous))
    }

    /// The current label.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Number of pushes not undone yet.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Pops until only `depth` pushes remain.
    pub(crate) fn unwind_to(&mut self, depth: usize) {
        while self.saved.len() > depth {
            self.pop();
        }
    }
}

#[cfg(test)]
mod test {
    use super::SourceStack;

    #[test]
    fn test_push_pop_round_trip() {
        let mut stack = SourceStack::default();
        stack.push("A");
        stack.push("B");
        assert_eq!(stack.current(), "B");
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().as_deref(), Some("B"));
        assert_eq!(stack.current(), "A");
        assert_eq!(stack.pop().as_deref(), Some("A"));
        assert_eq!(stack.current(), "");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_on_empty_is_lenient() {
        let mut stack = SourceStack::new("global");
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.current(), "global");
    }

    #[test]
    fn test_unwind_drops_leaked_entries() {
        let mut stack = SourceStack::new("global");
        stack.push("outer");
        let depth = stack.depth();
        stack.push("inner");
        stack.push("leaked");
        stack.unwind_to(depth);
        assert_eq!(stack.current(), "outer");
        stack.unwind_to(0);
        assert_eq!(stack.current(), "global");
    }
}
