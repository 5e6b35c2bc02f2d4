//! Per-parse bookkeeping: the custom type registry and the pending
//! documentation buffer.

/// Custom (enum/struct) type names in the order they were first seen.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    names: Vec<String>,
}

impl TypeRegistry {
    /// Returns `true` when the name was not known before.
    pub fn register(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub fn sorted(&self) -> Vec<String> {
        let mut names = self.names.clone();
        names.sort();
        names
    }
}

/// Documentation lines waiting for the next declaration.
#[derive(Debug, Default)]
pub struct CommentBuffer {
    lines: Vec<String>,
}

impl CommentBuffer {
    pub fn push(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    /// Newline-joined contents; the buffer is empty afterwards.
    pub fn take(&mut self) -> String {
        let text = self.lines.join("\n");
        self.lines.clear();
        text
    }

    /// Drop orphaned documentation, returning how many lines were lost.
    pub fn discard(&mut self) -> usize {
        let dropped = self.lines.len();
        self.lines.clear();
        dropped
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_first_insertion() {
        let mut reg = TypeRegistry::default();
        assert!(reg.register("UseTabStyle"));
        assert!(reg.register("BraceWrappingFlags"));
        assert!(!reg.register("UseTabStyle"));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.sorted(), vec!["BraceWrappingFlags", "UseTabStyle"]);
    }

    #[test]
    fn take_joins_and_clears() {
        let mut buf = CommentBuffer::default();
        buf.push("First line.");
        buf.push("");
        buf.push("Second paragraph.");
        assert_eq!(buf.take(), "First line.\n\nSecond paragraph.");
        assert!(buf.is_empty());
        assert_eq!(buf.take(), "");
    }

    #[test]
    fn discard_reports_count() {
        let mut buf = CommentBuffer::default();
        buf.push("orphan");
        assert_eq!(buf.discard(), 1);
        assert_eq!(buf.discard(), 0);
    }
}
