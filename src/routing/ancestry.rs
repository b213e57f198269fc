use std::collections::HashMap;

use crate::{foundation::ids::PageIdx, model::snapshot::Page};

/// Id lookup over a page list; parent links are followed by index.
pub(crate) struct PageIndex<'a> {
    pages: &'a [Page],
    by_id: HashMap<&'a str, PageIdx>,
}

impl<'a> PageIndex<'a> {
    pub(crate) fn new(pages: &'a [Page]) -> Self {
        let mut by_id = HashMap::with_capacity(pages.len());
        for (i, p) in pages.iter().enumerate() {
            by_id.entry(p.id.as_str()).or_insert(PageIdx(i));
        }
        Self { pages, by_id }
    }

    pub(crate) fn idx(&self, id: &str) -> Option<PageIdx> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn page(&self, idx: PageIdx) -> &'a Page {
        &self.pages[idx.0]
    }

    pub(crate) fn parent_of(&self, idx: PageIdx) -> Option<PageIdx> {
        self.page(idx)
            .parent_id
            .as_deref()
            .and_then(|id| self.idx(id))
    }

    /// Parents of `start`, nearest first. Stops at a root, a dangling parent id, or the
    /// first revisited page.
    pub(crate) fn ancestors(&self, start: PageIdx) -> Ancestors<'_, 'a> {
        let mut visited = vec![false; self.pages.len()];
        visited[start.0] = true;
        Ancestors {
            index: self,
            next: self.parent_of(start),
            visited,
            cycled: false,
        }
    }

    /// Direct children of every page, in list order.
    pub(crate) fn children(&self) -> Vec<Vec<PageIdx>> {
        let mut children = vec![Vec::new(); self.pages.len()];
        for i in 0..self.pages.len() {
            if let Some(p) = self.parent_of(PageIdx(i))
                && p.0 != i
            {
                children[p.0].push(PageIdx(i));
            }
        }
        children
    }
}

pub(crate) struct Ancestors<'i, 'a> {
    index: &'i PageIndex<'a>,
    next: Option<PageIdx>,
    visited: Vec<bool>,
    cycled: bool,
}

impl Ancestors<'_, '_> {
    /// `true` once the walk stopped because it came back to a visited page.
    pub(crate) fn cycled(&self) -> bool {
        self.cycled
    }
}

impl Iterator for Ancestors<'_, '_> {
    type Item = PageIdx;

    fn next(&mut self) -> Option<PageIdx> {
        let cur = self.next.take()?;
        if std::mem::replace(&mut self.visited[cur.0], true) {
            self.cycled = true;
            return None;
        }
        self.next = self.index.parent_of(cur);
        Some(cur)
    }
}
