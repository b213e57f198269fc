use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::opts::ResolveOpts, foundation::ids::ElementIdx, slot::index::SlotIndex,
    tree::builder::ElementTree,
};

/// Partition of a page forest's top-level subtrees by destination slot name.
///
/// Only roots are inspected; descendants travel with their root. A root naming a slot
/// the layout does not declare keeps that name and simply has nowhere to render.
#[derive(Clone, Debug, Default)]
pub struct SlotAssignment {
    groups: BTreeMap<String, Vec<ElementIdx>>,
    targets: Vec<(ElementIdx, Option<String>)>,
    unassigned: Vec<ElementIdx>,
    default_slot: Option<String>,
}

impl SlotAssignment {
    /// Assign every root of `page` to a slot name.
    pub fn partition(page: &ElementTree<'_>, slots: &SlotIndex, opts: &ResolveOpts) -> Self {
        let filled: BTreeSet<&str> = page
            .roots()
            .iter()
            .filter_map(|&root| page.node(root).element.target_slot(opts))
            .collect();
        let default_slot = slots
            .default_slot(opts.default_slot, &filled)
            .map(|s| s.name.clone());

        let mut groups = BTreeMap::<String, Vec<ElementIdx>>::new();
        let mut targets = Vec::with_capacity(page.roots().len());
        let mut unassigned = Vec::new();
        for &root in page.roots() {
            let target = page
                .node(root)
                .element
                .target_slot(opts)
                .or(default_slot.as_deref());
            match target {
                Some(name) => groups.entry(name.to_string()).or_default().push(root),
                None => unassigned.push(root),
            }
            targets.push((root, target.map(str::to_string)));
        }

        Self {
            groups,
            targets,
            unassigned,
            default_slot,
        }
    }

    /// Roots grouped by slot name; roots keep page order inside a group.
    pub fn groups(&self) -> &BTreeMap<String, Vec<ElementIdx>> {
        &self.groups
    }

    /// Roots assigned to `name`.
    pub fn group(&self, name: &str) -> &[ElementIdx] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every root in page order with the slot name it was sent to.
    pub fn targets(&self) -> &[(ElementIdx, Option<String>)] {
        &self.targets
    }

    /// Untagged roots dropped because the layout has no slots.
    pub fn unassigned(&self) -> &[ElementIdx] {
        &self.unassigned
    }

    /// Slot name chosen for untagged content.
    pub fn default_slot(&self) -> Option<&str> {
        self.default_slot.as_deref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slot/assign.rs"]
mod tests;
