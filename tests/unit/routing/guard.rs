use super::*;

fn page(id: &str, parent: Option<&str>) -> Page {
    Page {
        id: id.to_string(),
        title: id.to_string(),
        slug: id.to_string(),
        parent_id: parent.map(str::to_string),
        layout_id: None,
        order_index: 0,
        project_id: "proj".to_string(),
    }
}

/// p1 <- p2 <- ... <- pn, plus a detached page `x`.
fn chain(n: usize) -> Vec<Page> {
    let mut pages = Vec::with_capacity(n + 1);
    for i in 1..=n {
        let parent = (i > 1).then(|| format!("p{}", i - 1));
        pages.push(page(&format!("p{i}"), parent.as_deref()));
    }
    pages.push(page("x", None));
    pages
}

#[test]
fn self_parent_is_circular() {
    let pages = chain(1);
    assert!(has_circular_reference("p1", Some("p1"), &pages));
    assert_eq!(
        check_parent_assignment("p1", Some("p1"), &pages, MAX_NESTING_DEPTH),
        Err(ParentRefusal::Circular)
    );
}

#[test]
fn descendant_parent_is_circular() {
    let pages = chain(3);
    assert!(has_circular_reference("p1", Some("p3"), &pages));
    assert!(!has_circular_reference("p3", Some("p1"), &pages));
    assert!(!has_circular_reference("p1", None, &pages));
    assert!(!has_circular_reference("p1", Some("x"), &pages));
    assert!(!has_circular_reference("p1", Some("missing"), &pages));
}

#[test]
fn existing_cycle_reports_circular() {
    let pages = vec![page("a", Some("b")), page("b", Some("a")), page("c", None)];
    assert!(has_circular_reference("c", Some("a"), &pages));
}

#[test]
fn chain_of_five_refuses_a_sixth_level() {
    let pages = chain(5);
    assert_eq!(
        check_parent_assignment("x", Some("p5"), &pages, MAX_NESTING_DEPTH),
        Err(ParentRefusal::TooDeep { levels: 6, max: 5 })
    );
    assert_eq!(
        check_parent_assignment("x", Some("p4"), &pages, MAX_NESTING_DEPTH),
        Ok(())
    );
}

#[test]
fn moved_subtree_height_counts() {
    let mut pages = chain(3);
    pages.push(page("y", None));
    pages.push(page("y1", Some("y")));
    pages.push(page("y2", Some("y1")));

    assert_eq!(subtree_height("y", &pages), 3);
    assert_eq!(subtree_height("y2", &pages), 1);
    assert_eq!(subtree_height("missing", &pages), 0);
    assert!(matches!(
        check_parent_assignment("y", Some("p3"), &pages, MAX_NESTING_DEPTH),
        Err(ParentRefusal::TooDeep { levels: 6, .. })
    ));
    assert_eq!(
        check_parent_assignment("y", Some("p1"), &pages, MAX_NESTING_DEPTH),
        Ok(())
    );
}

#[test]
fn unknown_parent_is_refused() {
    let pages = chain(2);
    assert_eq!(
        check_parent_assignment("p1", Some("nope"), &pages, MAX_NESTING_DEPTH),
        Err(ParentRefusal::UnknownParent("nope".to_string()))
    );
    assert_eq!(
        check_parent_assignment("p2", None, &pages, MAX_NESTING_DEPTH),
        Ok(())
    );
}

#[test]
fn nesting_depth_counts_ancestors_with_cap() {
    let pages = chain(8);
    assert_eq!(nesting_depth("p1", &pages), 0);
    assert_eq!(nesting_depth("p3", &pages), 2);
    assert_eq!(nesting_depth("p8", &pages), MAX_NESTING_DEPTH);
    assert_eq!(nesting_depth("missing", &pages), 0);

    let looped = vec![page("a", Some("b")), page("b", Some("a"))];
    assert_eq!(nesting_depth("a", &looped), 1);
}

#[test]
fn candidates_exclude_self_descendants_and_too_deep() {
    let mut pages = chain(5);
    pages.push(page("p2-child", Some("p2")));

    let ids: Vec<&str> = parent_candidates("p2", &pages, MAX_NESTING_DEPTH)
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    // p2 subtree is 4 levels high, so only roots can take it.
    assert_eq!(ids, vec!["p1", "x"]);

    let ids: Vec<&str> = parent_candidates("x", &pages, MAX_NESTING_DEPTH)
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p2-child"]);
}

#[test]
fn refusal_converts_to_routing_error() {
    let err: PagewrightError = ParentRefusal::TooDeep { levels: 6, max: 5 }.into();
    assert!(err.to_string().contains("6 levels"));
}

#[test]
fn unbounded_ceiling_does_not_overflow() {
    let pages = chain(7);
    assert_eq!(check_parent_assignment("x", Some("p7"), &pages, usize::MAX), Ok(()));
    assert_eq!(
        check_parent_assignment("p1", Some("p7"), &pages, usize::MAX),
        Err(ParentRefusal::Circular)
    );
    let ids: Vec<&str> = parent_candidates("x", &pages, usize::MAX)
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5", "p6", "p7"]);
}

#[test]
fn configured_cap_bounds_depth() {
    let pages = chain(8);
    assert_eq!(nesting_depth_capped("p8", &pages, 10), 7);
    assert_eq!(nesting_depth_capped("p8", &pages, 3), 3);
}
