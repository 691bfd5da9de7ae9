use super::*;

fn doc_with_input(attrs: &[(&str, &str)]) -> (Document, NodeKey) {
    let mut doc = Document::new();
    let body = doc.body();
    let input = doc.create_child(body, "INPUT", attrs).unwrap();
    (doc, input)
}

#[test]
fn value_attribute_seeds_value_until_dirty() {
    let (mut doc, input) = doc_with_input(&[("value", "12")]);
    assert_eq!(doc.value(input), "12");
    assert!(!doc.is_value_dirty(input));

    doc.set_value(input, "99").unwrap();
    doc.set_attribute(input, "value", "34").unwrap();
    assert_eq!(doc.value(input), "99");
    assert_eq!(doc.attribute(input, "value"), Some("34"));
}

#[test]
fn set_value_strips_newlines_for_single_line_controls() {
    let (mut doc, input) = doc_with_input(&[]);
    doc.set_value(input, "a\r\nb").unwrap();
    assert_eq!(doc.value(input), "ab");

    let area = doc.create_child(doc.body(), "textarea", &[]).unwrap();
    doc.set_value(area, "a\r\nb").unwrap();
    assert_eq!(doc.value(area), "a\nb");
}

#[test]
fn textarea_text_children_become_default_value() {
    let mut doc = Document::new();
    let area = doc.create_child(doc.body(), "textarea", &[]).unwrap();
    doc.append_text(area, "line1\r\n").unwrap();
    doc.append_text(area, "line2").unwrap();
    assert_eq!(doc.value(area), "line1\nline2");
}

#[test]
fn set_value_queues_no_events() {
    let (mut doc, input) = doc_with_input(&[]);
    doc.set_value(input, "1").unwrap();
    assert_eq!(doc.pending_events(), 0);
}

#[test]
fn typing_queues_input_event() {
    let (mut doc, input) = doc_with_input(&[]);
    doc.focus(input);
    doc.type_text(input, "12");
    doc.backspace(input);

    let kinds: Vec<_> = doc.take_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Focus, EventKind::Input, EventKind::Input]);
    assert_eq!(doc.value(input), "1");
}

#[test]
fn backspace_at_start_queues_nothing() {
    let (mut doc, input) = doc_with_input(&[]);
    doc.backspace(input);
    assert!(doc.take_events().is_empty());
}

#[test]
fn focus_moves_blur_to_previous_element() {
    let mut doc = Document::new();
    let body = doc.body();
    let a = doc.create_child(body, "input", &[]).unwrap();
    let b = doc.create_child(body, "input", &[]).unwrap();
    doc.focus(a);
    doc.focus(b);

    let events = doc.take_events();
    assert_eq!(
        events,
        vec![
            UiEvent::new(a, EventKind::Focus),
            UiEvent::new(a, EventKind::Blur),
            UiEvent::new(b, EventKind::Focus),
        ]
    );
    assert_eq!(doc.focused(), Some(b));
}

#[test]
fn composition_replaces_preedit_in_place() {
    let (mut doc, input) = doc_with_input(&[("value", "ab")]);
    doc.select(input, 1, 1, SelectionDirection::None);
    doc.composition_start(input);
    doc.composition_update(input, "k");
    doc.composition_update(input, "か");
    assert_eq!(doc.value(input), "aかb");
    doc.composition_end(input, "カ");
    assert_eq!(doc.value(input), "aカb");
    assert!(!doc.is_composing(input));

    let events = doc.take_events();
    assert_eq!(events.first().map(|e| e.kind), Some(EventKind::CompositionStart));
    assert!(events[1].is_composing);
    assert_eq!(events.last().map(|e| e.kind), Some(EventKind::CompositionEnd));
}

#[test]
fn blur_finishes_composition() {
    let (mut doc, input) = doc_with_input(&[]);
    doc.focus(input);
    doc.composition_start(input);
    doc.composition_update(input, "に");
    doc.blur();

    let kinds: Vec<_> = doc.take_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Focus,
            EventKind::CompositionStart,
            EventKind::Input,
            EventKind::CompositionEnd,
            EventKind::Blur,
        ]
    );
    assert_eq!(doc.value(input), "に");
}

#[test]
fn hidden_inputs_have_no_selection() {
    let (mut doc, input) = doc_with_input(&[("type", "hidden"), ("value", "x")]);
    assert!(doc.selection(input).is_none());
    assert!(!doc.set_selection_range(input, 0, 1, SelectionDirection::Forward));
}

#[test]
fn selection_round_trips_with_direction() {
    let (mut doc, input) = doc_with_input(&[("value", "12345")]);
    assert!(doc.set_selection_range(input, 1, 3, SelectionDirection::Backward));
    let (range, dir) = doc.selection(input).unwrap();
    assert_eq!((range.start, range.end), (1, 3));
    assert_eq!(dir, SelectionDirection::Backward);
}

#[test]
fn class_tokens() {
    let (mut doc, input) = doc_with_input(&[("class", "a  b")]);
    doc.add_class(input, "c").unwrap();
    doc.add_class(input, "c").unwrap();
    assert_eq!(doc.attribute(input, "class"), Some("a  b c"));
    doc.remove_class(input, "b").unwrap();
    assert_eq!(doc.attribute(input, "class"), Some("a c"));
    assert!(!doc.has_class(input, "b"));
}

#[test]
fn invalid_attribute_names_are_rejected() {
    let (mut doc, input) = doc_with_input(&[]);
    assert_eq!(
        doc.set_attribute(input, "a b", "x"),
        Err(DomError::InvalidAttributeName("a b".into()))
    );
    assert_eq!(
        doc.set_attribute(input, "", "x"),
        Err(DomError::InvalidAttributeName(String::new()))
    );
}

#[test]
fn attribute_names_are_case_insensitive() {
    let (mut doc, input) = doc_with_input(&[("Data-X", "1")]);
    assert_eq!(doc.attribute(input, "data-x"), Some("1"));
    doc.set_attribute(input, "DATA-X", "2").unwrap();
    assert_eq!(doc.attributes(input).collect::<Vec<_>>(), vec![("data-x", Some("2"))]);
    assert!(doc.remove_attribute(input, "data-x").unwrap());
    assert!(!doc.has_attribute(input, "data-x"));
}

#[test]
fn get_element_by_id_uses_tree_order() {
    let mut doc = Document::new();
    let body = doc.body();
    let div = doc.create_child(body, "div", &[]).unwrap();
    let first = doc.create_child(div, "input", &[("id", "x")]).unwrap();
    let _second = doc.create_child(body, "input", &[("id", "x")]).unwrap();
    assert_eq!(doc.get_element_by_id("x"), Some(first));
    assert_eq!(doc.get_element_by_id("y"), None);
}

#[test]
fn form_controls_in_tree_order() {
    let mut doc = Document::new();
    let body = doc.body();
    let a = doc.create_child(body, "input", &[]).unwrap();
    let div = doc.create_child(body, "div", &[]).unwrap();
    let b = doc.create_child(div, "textarea", &[]).unwrap();
    let c = doc.create_child(body, "input", &[("type", "hidden")]).unwrap();
    assert_eq!(doc.form_controls(doc.root()), vec![a, b, c]);
    assert_eq!(doc.form_controls(div), vec![b]);
}

#[test]
fn remove_node_drops_listeners_and_values() {
    let (mut doc, input) = doc_with_input(&[("value", "1")]);
    let id = doc.add_event_listener(input, EventKind::Input);
    doc.focus(input);
    doc.remove_node(input).unwrap();

    assert!(!doc.contains(input));
    assert!(!doc.has_listener(id));
    assert_eq!(doc.value(input), "");
    assert_eq!(doc.focused(), None);
    assert_eq!(doc.remove_node(input), Err(DomError::MissingNode(input)));
}

#[test]
fn insert_after_and_next_sibling() {
    let (mut doc, input) = doc_with_input(&[]);
    let tail = doc.create_child(doc.body(), "span", &[]).unwrap();
    let display = doc.create_element("input");
    doc.insert_after(input, display).unwrap();
    assert_eq!(doc.next_sibling(input), Some(display));
    assert_eq!(doc.next_sibling(display), Some(tail));
    assert!(doc.is_connected(display));
}

#[test]
fn listener_matches_target_and_kind() {
    let (mut doc, input) = doc_with_input(&[]);
    let id = doc.add_event_listener(input, EventKind::Blur);
    assert!(doc.listener_matches(id, &UiEvent::new(input, EventKind::Blur)));
    assert!(!doc.listener_matches(id, &UiEvent::new(input, EventKind::Focus)));
    assert_eq!(doc.listener_count(input), 1);
    assert!(doc.remove_event_listener(id));
    assert_eq!(doc.listener_count(input), 0);
}
