use std::collections::BTreeMap;

use crate::{
    compose::resolved::{
        LayoutResolution, Origin, ResolvedElement, SlotValidationError, UnplacedContent,
    },
    config::opts::ResolveOpts,
    foundation::ids::ElementIdx,
    model::{
        element::{Element, ElementKind, Scope},
        snapshot::{Layout, Page},
    },
    slot::{assign::SlotAssignment, index::SlotIndex},
    tree::builder::ElementTree,
};

/// Compose `page` into `layout`.
///
/// `layout` only takes part when it is the one `page.layout_id` points at; otherwise the
/// page forest is returned as-is with [`Origin::Page`]. Never fails: required slots left
/// empty are reported in [`LayoutResolution::validation_errors`] and content with nowhere
/// to go is listed in [`LayoutResolution::unplaced`].
#[tracing::instrument(skip_all, fields(page_id = %page.id))]
pub fn resolve(
    layout: Option<&Layout>,
    page: &Page,
    elements: &[Element],
    opts: &ResolveOpts,
) -> LayoutResolution {
    let page_tree = ElementTree::scoped(elements, Scope::Page(&page.id), opts);

    let layout = layout.filter(|l| page.layout_id.as_deref() == Some(l.id.as_str()));
    let Some(layout) = layout else {
        return LayoutResolution {
            resolved_tree: page_tree
                .roots()
                .iter()
                .map(|&root| resolve_subtree(&page_tree, root, Origin::Page))
                .collect(),
            ..LayoutResolution::default()
        };
    };

    let layout_tree = ElementTree::scoped(elements, Scope::Layout(&layout.id), opts);
    let slots = SlotIndex::from_tree(&layout_tree);
    let assignment = SlotAssignment::partition(&page_tree, &slots, opts);

    let slot_contents: BTreeMap<String, Vec<ResolvedElement>> = assignment
        .groups()
        .iter()
        .map(|(name, roots)| {
            let content = roots
                .iter()
                .map(|&root| resolve_subtree(&page_tree, root, Origin::Page))
                .collect();
            (name.clone(), content)
        })
        .collect();

    let mut resolved_tree = Vec::with_capacity(layout_tree.roots().len());
    for &root in layout_tree.roots() {
        splice(&layout_tree, root, &slots, &slot_contents, &mut resolved_tree);
    }

    let validation_errors = slots
        .iter()
        .filter(|s| s.required)
        .filter(|s| slot_contents.get(&s.name).is_none_or(Vec::is_empty))
        .map(|s| SlotValidationError::required_slot_empty(&s.name))
        .collect();

    let unplaced: Vec<UnplacedContent> = assignment
        .targets()
        .iter()
        .filter(|(_, target)| target.as_deref().is_none_or(|name| slots.get(name).is_none()))
        .map(|(root, target)| UnplacedContent {
            element_id: page_tree.node(*root).element.id.clone(),
            slot_name: target.clone(),
        })
        .collect();
    if !unplaced.is_empty() {
        tracing::debug!(
            layout_id = %layout.id,
            count = unplaced.len(),
            "page content has no matching slot"
        );
    }

    LayoutResolution {
        resolved_tree,
        slot_contents,
        validation_errors,
        has_layout: true,
        unplaced,
    }
}

fn resolve_subtree(tree: &ElementTree<'_>, idx: ElementIdx, origin: Origin) -> ResolvedElement {
    let element = tree.node(idx).element;
    ResolvedElement {
        id: element.id.clone(),
        tag: element.tag.clone(),
        properties: element.properties.clone(),
        order_index: element.order_index,
        origin,
        children: tree
            .children(idx)
            .iter()
            .map(|&child| resolve_subtree(tree, child, origin))
            .collect(),
    }
}

fn splice(
    tree: &ElementTree<'_>,
    idx: ElementIdx,
    slots: &SlotIndex,
    slot_contents: &BTreeMap<String, Vec<ResolvedElement>>,
    out: &mut Vec<ResolvedElement>,
) {
    let node = tree.node(idx);
    match &node.kind {
        ElementKind::SlotMarker(spec) => {
            if slots.is_shadowed(idx) {
                return;
            }
            if let Some(content) = slot_contents.get(&spec.name) {
                out.extend(content.iter().cloned());
            }
        }
        ElementKind::Regular { tag, properties } => {
            let mut children = Vec::with_capacity(tree.children(idx).len());
            for &child in tree.children(idx) {
                splice(tree, child, slots, slot_contents, &mut children);
            }
            out.push(ResolvedElement {
                id: node.element.id.clone(),
                tag: (*tag).to_string(),
                properties: (*properties).clone(),
                order_index: node.element.order_index,
                origin: Origin::Layout,
                children,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/engine.rs"]
mod tests;
