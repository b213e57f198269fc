use super::*;
use serde_json::json;

fn page(id: &str, layout_id: Option<&str>) -> Page {
    Page {
        id: id.to_string(),
        title: id.to_uppercase(),
        slug: id.to_string(),
        parent_id: None,
        layout_id: layout_id.map(str::to_string),
        order_index: 0,
        project_id: "proj".to_string(),
    }
}

fn layout(id: &str) -> Layout {
    Layout {
        id: id.to_string(),
        name: "Main".to_string(),
        slug: None,
        project_id: "proj".to_string(),
        description: None,
    }
}

fn layout_el(id: &str, parent: Option<&str>, order: i64, tag: &str, props: serde_json::Value) -> Element {
    serde_json::from_value(json!({
        "id": id, "parentId": parent, "orderIndex": order, "tag": tag,
        "layoutId": "L", "properties": props,
    }))
    .unwrap()
}

fn slot(id: &str, parent: Option<&str>, order: i64, name: &str, required: bool) -> Element {
    layout_el(id, parent, order, "Slot", json!({ "name": name, "required": required }))
}

fn page_el(id: &str, parent: Option<&str>, order: i64, target: Option<&str>) -> Element {
    let props = match target {
        Some(t) => json!({ "targetSlot": t }),
        None => json!({}),
    };
    serde_json::from_value(json!({
        "id": id, "parentId": parent, "orderIndex": order, "tag": "Section",
        "pageId": "P", "properties": props,
    }))
    .unwrap()
}

/// Layout: shell > [header slot, main > main slot, footer]
fn shell_layout() -> Vec<Element> {
    vec![
        layout_el("shell", None, 0, "Div", json!({ "class": "shell" })),
        slot("s-header", Some("shell"), 0, "header", true),
        layout_el("main", Some("shell"), 1, "Main", json!({})),
        slot("s-main", Some("main"), 0, "main", true),
        layout_el("footer", Some("shell"), 2, "Footer", json!({})),
    ]
}

fn shape(nodes: &[ResolvedElement]) -> Vec<String> {
    fn walk(node: &ResolvedElement, depth: usize, out: &mut Vec<String>) {
        let origin = match node.origin {
            Origin::Layout => "L",
            Origin::Page => "P",
        };
        out.push(format!("{}{}:{origin}", "  ".repeat(depth), node.id));
        for c in &node.children {
            walk(c, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    for n in nodes {
        walk(n, 0, &mut out);
    }
    out
}

#[test]
fn tagged_and_untagged_content_fill_both_required_slots() {
    let mut elements = shell_layout();
    elements.extend([
        page_el("hero", None, 0, Some("header")),
        page_el("article", None, 1, None),
        page_el("para", Some("article"), 0, None),
    ]);
    let l = layout("L");
    let p = page("P", Some("L"));

    let out = resolve(Some(&l), &p, &elements, &ResolveOpts::default());

    assert!(out.has_layout);
    assert!(out.validation_errors.is_empty());
    assert!(out.is_publishable());
    assert!(out.unplaced.is_empty());
    assert_eq!(
        shape(&out.resolved_tree),
        vec![
            "shell:L",
            "  hero:P",
            "  main:L",
            "    article:P",
            "      para:P",
            "  footer:L",
        ]
    );
    assert_eq!(out.slot_contents.len(), 2);
    assert_eq!(out.slot_contents["main"][0].id, "article");
    assert_eq!(out.element_count(), 6);
}

#[test]
fn missing_required_content_is_reported_not_fatal() {
    let mut elements = shell_layout();
    elements.push(page_el("hero", None, 0, Some("header")));
    let opts = ResolveOpts {
        default_slot: crate::DefaultSlotPolicy::FirstRequired,
        ..ResolveOpts::default()
    };

    let out = resolve(Some(&layout("L")), &page("P", Some("L")), &elements, &opts);

    assert_eq!(out.validation_errors.len(), 1);
    let err = &out.validation_errors[0];
    assert_eq!(err.slot_name, "main");
    assert_eq!(err.error_type, crate::SlotErrorKind::RequiredSlotEmpty);
    assert!(err.message.contains("main"));
    assert!(!out.is_publishable());
    assert_eq!(
        shape(&out.resolved_tree),
        vec!["shell:L", "  hero:P", "  main:L", "  footer:L"]
    );
}

#[test]
fn page_without_layout_returns_page_forest() {
    let elements = vec![
        page_el("body", None, 0, None),
        page_el("b2", Some("body"), 1, None),
        page_el("b1", Some("body"), 0, Some("header")),
    ];

    let out = resolve(None, &page("P", None), &elements, &ResolveOpts::default());

    assert!(!out.has_layout);
    assert!(out.slot_contents.is_empty());
    assert!(out.validation_errors.is_empty());
    assert_eq!(shape(&out.resolved_tree), vec!["body:P", "  b1:P", "  b2:P"]);
}

#[test]
fn layout_not_bound_to_page_is_ignored() {
    let mut elements = shell_layout();
    elements.push(page_el("body", None, 0, None));

    let out = resolve(
        Some(&layout("L")),
        &page("P", Some("other")),
        &elements,
        &ResolveOpts::default(),
    );
    assert!(!out.has_layout);
    assert_eq!(shape(&out.resolved_tree), vec!["body:P"]);

    let out = resolve(
        Some(&layout("L")),
        &page("P", None),
        &elements,
        &ResolveOpts::default(),
    );
    assert!(!out.has_layout);
}

#[test]
fn content_for_unknown_slot_is_unplaced() {
    let mut elements = shell_layout();
    elements.extend([
        page_el("hero", None, 0, Some("header")),
        page_el("body", None, 1, None),
        page_el("promo", None, 2, Some("banner")),
    ]);

    let out = resolve(
        Some(&layout("L")),
        &page("P", Some("L")),
        &elements,
        &ResolveOpts::default(),
    );

    assert!(out.slot_contents.contains_key("banner"));
    assert_eq!(
        out.unplaced,
        vec![UnplacedContent {
            element_id: "promo".to_string(),
            slot_name: Some("banner".to_string()),
        }]
    );
    assert!(!shape(&out.resolved_tree).iter().any(|l| l.contains("promo")));
}

#[test]
fn layout_without_slots_drops_untagged_content() {
    let elements = vec![
        layout_el("frame", None, 0, "Div", json!({})),
        page_el("body", None, 0, None),
    ];

    let out = resolve(
        Some(&layout("L")),
        &page("P", Some("L")),
        &elements,
        &ResolveOpts::default(),
    );

    assert!(out.has_layout);
    assert_eq!(shape(&out.resolved_tree), vec!["frame:L"]);
    assert_eq!(
        out.unplaced,
        vec![UnplacedContent {
            element_id: "body".to_string(),
            slot_name: None,
        }]
    );
    assert!(out.validation_errors.is_empty());
}

#[test]
fn shadowed_duplicate_marker_renders_nothing() {
    let elements = vec![
        layout_el("root", None, 0, "Div", json!({})),
        slot("first", Some("root"), 0, "main", false),
        layout_el("mid", Some("root"), 1, "Hr", json!({})),
        slot("second", Some("root"), 2, "main", false),
        page_el("body", None, 0, None),
    ];

    let out = resolve(
        Some(&layout("L")),
        &page("P", Some("L")),
        &elements,
        &ResolveOpts::default(),
    );

    assert_eq!(
        shape(&out.resolved_tree),
        vec!["root:L", "  mid:L", "  body:P"]
    );
}

#[test]
fn marker_children_and_page_side_markers_are_not_expanded() {
    let elements = vec![
        slot("s", None, 0, "main", true),
        layout_el("fallback", Some("s"), 0, "Text", json!({})),
        page_el("body", None, 0, None),
        serde_json::from_value(json!({
            "id": "nested-slot", "parentId": "body", "orderIndex": 0,
            "tag": "Slot", "pageId": "P", "properties": { "name": "main" }
        }))
        .unwrap(),
    ];

    let out = resolve(
        Some(&layout("L")),
        &page("P", Some("L")),
        &elements,
        &ResolveOpts::default(),
    );

    assert_eq!(shape(&out.resolved_tree), vec!["body:P", "  nested-slot:P"]);
    assert_eq!(out.resolved_tree[0].children[0].tag, "Slot");
}

#[test]
fn resolution_is_deterministic() {
    let mut elements = shell_layout();
    elements.extend([
        page_el("c", None, 1, Some("zeta")),
        page_el("a", None, 0, Some("header")),
        page_el("b", None, 1, None),
        page_el("d", None, 2, Some("alpha")),
    ]);
    let l = layout("L");
    let p = page("P", Some("L"));
    let opts = ResolveOpts::default();

    let first = serde_json::to_string(&resolve(Some(&l), &p, &elements, &opts)).unwrap();
    let second = serde_json::to_string(&resolve(Some(&l), &p, &elements, &opts)).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("\"origin\":\"layout\""));
    assert!(first.contains("\"hasLayout\":true"));
}

#[test]
fn duplicate_required_markers_report_one_error() {
    let elements = vec![
        layout_el("root", None, 0, "Div", json!({})),
        slot("a", Some("root"), 0, "main", true),
        slot("b", Some("root"), 1, "main", true),
        slot("c", Some("root"), 2, "aside", false),
        page_el("body", None, 0, Some("aside")),
    ];

    let out = resolve(
        Some(&layout("L")),
        &page("P", Some("L")),
        &elements,
        &ResolveOpts::default(),
    );

    let names: Vec<&str> = out
        .validation_errors
        .iter()
        .map(|e| e.slot_name.as_str())
        .collect();
    assert_eq!(names, vec!["main"]);
}
