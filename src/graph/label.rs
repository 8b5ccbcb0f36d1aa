use std::fmt;

/// Name of a node output in the filter graph
///
/// Rendered as `[name]` when referenced from a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `[name]` reference form
    pub fn reference(&self) -> String {
        format!("[{}]", self.0)
    }

    /// Private sub-label `{label}_{suffix}`
    pub fn suffixed(&self, suffix: &str) -> Label {
        Label(format!("{}_{}", self.0, suffix))
    }

    /// Private sub-label `{prefix}_{label}`
    pub fn prefixed(&self, prefix: &str) -> Label {
        Label(format!("{}_{}", prefix, self.0))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues `seg0, seg1, ...` for one compile call
///
/// Sub-labels are derived from these, so the segment counter is the only
/// state needed to keep every label in a graph unique.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: usize,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_label(&mut self) -> Label {
        let label = Label(format!("seg{}", self.next));
        self.next += 1;
        label
    }

    /// Number of labels handed out so far
    pub fn issued(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_increase() {
        let mut labels = LabelAllocator::new();
        assert_eq!(labels.next_label().as_str(), "seg0");
        assert_eq!(labels.next_label().as_str(), "seg1");
        assert_eq!(labels.issued(), 2);
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut a = LabelAllocator::new();
        let mut b = LabelAllocator::new();
        a.next_label();
        assert_eq!(b.next_label().as_str(), "seg0");
    }

    #[test]
    fn test_sub_labels() {
        let label = Label::new("seg3");
        assert_eq!(label.suffixed("base").reference(), "[seg3_base]");
        assert_eq!(label.prefixed("orig").as_str(), "orig_seg3");
    }
}
