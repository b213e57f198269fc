use std::collections::HashMap;

use crate::{
    config::opts::ResolveOpts,
    foundation::ids::ElementIdx,
    model::element::{Element, ElementKind, Scope},
};

/// One element placed in an [`ElementTree`].
#[derive(Clone, Debug)]
pub struct TreeNode<'a> {
    /// Source element.
    pub element: &'a Element,
    /// Classification decided at ingestion.
    pub kind: ElementKind<'a>,
    parent: Option<ElementIdx>,
    children: Vec<ElementIdx>,
}

impl TreeNode<'_> {
    /// Ordered children.
    pub fn children(&self) -> &[ElementIdx] {
        &self.children
    }

    /// Effective parent after orphan and cycle recovery.
    pub fn parent(&self) -> Option<ElementIdx> {
        self.parent
    }
}

/// Forest built from a flat parent-pointer element list.
///
/// Nodes live in an arena indexed by [`ElementIdx`]; the arena order is the input order.
/// Every level is sorted by `order_index` ascending with ties broken by input position.
/// Building never fails: elements whose parent is missing become extra roots, and
/// parent cycles are broken by promoting one member to a root.
#[derive(Clone, Debug)]
pub struct ElementTree<'a> {
    nodes: Vec<TreeNode<'a>>,
    roots: Vec<ElementIdx>,
}

impl<'a> ElementTree<'a> {
    /// Build a forest from elements that share one scope.
    pub fn build<I>(elements: I, opts: &ResolveOpts) -> Self
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let elements: Vec<&'a Element> = elements.into_iter().collect();
        let n = elements.len();

        let mut idx_by_id = HashMap::<&str, usize>::with_capacity(n);
        for (i, e) in elements.iter().enumerate() {
            idx_by_id.entry(e.id.as_str()).or_insert(i);
        }

        let mut parent = vec![None::<usize>; n];
        for (i, e) in elements.iter().enumerate() {
            let Some(parent_id) = e.parent_id.as_deref() else {
                continue;
            };
            match idx_by_id.get(parent_id) {
                Some(&p) if p != i => parent[i] = Some(p),
                Some(_) => {
                    tracing::debug!(element_id = %e.id, "self-parented element treated as root");
                }
                None => {
                    tracing::debug!(
                        element_id = %e.id,
                        parent_id,
                        "orphaned element promoted to root"
                    );
                }
            }
        }

        let mut children = vec![Vec::<usize>::new(); n];
        for (i, p) in parent.iter().enumerate() {
            if let Some(p) = *p {
                children[p].push(i);
            }
        }

        let mut reached = vec![false; n];
        let mut roots = Vec::<usize>::new();
        for i in 0..n {
            if parent[i].is_none() {
                roots.push(i);
                mark_reached(i, &children, &mut reached);
            }
        }

        // Whatever is still unreached hangs off a parent cycle.
        for i in 0..n {
            if reached[i] {
                continue;
            }
            if let Some(p) = parent[i].take() {
                children[p].retain(|&c| c != i);
            }
            tracing::debug!(element_id = %elements[i].id, "parent cycle broken at element");
            roots.push(i);
            mark_reached(i, &children, &mut reached);
        }

        let sort_key = |&i: &usize| (elements[i].order_index, i);
        roots.sort_by_key(sort_key);
        for list in &mut children {
            list.sort_by_key(sort_key);
        }

        let nodes = elements
            .iter()
            .zip(parent)
            .zip(children)
            .map(|((&element, parent), children)| TreeNode {
                element,
                kind: ElementKind::classify(element, opts),
                parent: parent.map(ElementIdx),
                children: children.into_iter().map(ElementIdx).collect(),
            })
            .collect();

        Self {
            nodes,
            roots: roots.into_iter().map(ElementIdx).collect(),
        }
    }

    /// Build the forest of every element in `scope`, ignoring the rest of `elements`.
    pub fn scoped(elements: &'a [Element], scope: Scope<'_>, opts: &ResolveOpts) -> Self {
        Self::build(elements.iter().filter(|e| e.in_scope(scope)), opts)
    }

    /// Ordered roots.
    pub fn roots(&self) -> &[ElementIdx] {
        &self.roots
    }

    /// Node at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this tree.
    pub fn node(&self, idx: ElementIdx) -> &TreeNode<'a> {
        &self.nodes[idx.0]
    }

    /// Ordered children of `idx`.
    pub fn children(&self, idx: ElementIdx) -> &[ElementIdx] {
        &self.nodes[idx.0].children
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order over the whole forest.
    pub fn walk_preorder(&self) -> Vec<ElementIdx> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ElementIdx> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.children(idx).iter().rev().copied());
        }
        out
    }

    /// Sibling positions from the root list down to `idx`.
    pub fn path_of(&self, idx: ElementIdx) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = idx;
        loop {
            let siblings = match self.nodes[cur.0].parent {
                Some(p) => self.children(p),
                None => self.roots(),
            };
            path.push(siblings.iter().position(|&s| s == cur).unwrap_or(0));
            match self.nodes[cur.0].parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        path.reverse();
        path
    }
}

fn mark_reached(start: usize, children: &[Vec<usize>], reached: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(i) = stack.pop() {
        if std::mem::replace(&mut reached[i], true) {
            continue;
        }
        stack.extend(children[i].iter().copied());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/builder.rs"]
mod tests;
