use std::collections::BTreeSet;

use crate::{
    config::opts::DefaultSlotPolicy, foundation::ids::ElementIdx, model::element::ElementKind,
    tree::builder::ElementTree,
};

/// Where a slot marker sits in its layout tree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPosition {
    /// Marker element id.
    pub element_id: String,
    /// Sibling positions from the layout's root list down to the marker.
    pub path: Vec<usize>,
    /// Marker node in the layout tree arena.
    #[serde(skip)]
    pub node: ElementIdx,
}

/// A slot contract extracted from a layout.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
    /// Slot name.
    pub name: String,
    /// Whether the slot must receive page content.
    pub required: bool,
    /// Display-only description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Marker location.
    pub position: SlotPosition,
}

/// Ordered slot contracts of one layout, in depth-first traversal order.
///
/// When two markers share a name the later one wins: its descriptor is kept at its own
/// traversal position and the earlier marker is remembered as shadowed, so composition
/// renders nothing at it.
#[derive(Clone, Debug, Default)]
pub struct SlotIndex {
    slots: Vec<SlotDescriptor>,
    shadowed: Vec<ElementIdx>,
}

impl SlotIndex {
    /// Scan a layout tree for slot markers.
    ///
    /// Markers are not searched for nested markers; whatever a marker contains is
    /// replaced by page content anyway.
    pub fn from_tree(tree: &ElementTree<'_>) -> Self {
        let mut index = Self::default();
        let mut stack: Vec<ElementIdx> = tree.roots().iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            let node = tree.node(idx);
            match &node.kind {
                ElementKind::SlotMarker(spec) => index.insert(SlotDescriptor {
                    name: spec.name.clone(),
                    required: spec.required,
                    description: spec.description.clone(),
                    position: SlotPosition {
                        element_id: node.element.id.clone(),
                        path: tree.path_of(idx),
                        node: idx,
                    },
                }),
                ElementKind::Regular { .. } => {
                    stack.extend(tree.children(idx).iter().rev().copied());
                }
            }
        }
        index
    }

    fn insert(&mut self, descriptor: SlotDescriptor) {
        if let Some(pos) = self.slots.iter().position(|s| s.name == descriptor.name) {
            let previous = self.slots.remove(pos);
            tracing::debug!(
                slot = %descriptor.name,
                shadowed_element = %previous.position.element_id,
                winning_element = %descriptor.position.element_id,
                "duplicate slot name, last marker wins"
            );
            self.shadowed.push(previous.position.node);
        }
        self.slots.push(descriptor);
    }

    /// Descriptor for `name`.
    pub fn get(&self, name: &str) -> Option<&SlotDescriptor> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Descriptors in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotDescriptor> {
        self.slots.iter()
    }

    /// Number of distinct slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when the layout declares no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` when `idx` is a marker that lost a name collision.
    pub fn is_shadowed(&self, idx: ElementIdx) -> bool {
        self.shadowed.contains(&idx)
    }

    /// Slot receiving untagged page content.
    ///
    /// `filled` holds the names that already received tagged content; only
    /// [`DefaultSlotPolicy::FirstUnfilledRequired`] looks at it. Returns `None` when the
    /// layout has no slots.
    pub fn default_slot(
        &self,
        policy: DefaultSlotPolicy,
        filled: &BTreeSet<&str>,
    ) -> Option<&SlotDescriptor> {
        let first_required = || self.slots.iter().find(|s| s.required);
        let chosen = match policy {
            DefaultSlotPolicy::FirstUnfilledRequired => self
                .slots
                .iter()
                .find(|s| s.required && !filled.contains(s.name.as_str()))
                .or_else(first_required),
            DefaultSlotPolicy::FirstRequired => first_required(),
        };
        chosen.or_else(|| self.slots.first())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slot/index.rs"]
mod tests;
