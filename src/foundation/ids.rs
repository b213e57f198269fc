/// Arena index of a node inside an [`crate::ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIdx(pub(crate) usize);

impl ElementIdx {
    /// Position of this node in the tree arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a page inside the page list an ancestry index was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PageIdx(pub(crate) usize);
