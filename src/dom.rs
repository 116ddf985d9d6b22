//! A small mutation layer over [`scraper`]'s document tree. [`scraper`]
//! itself is query-oriented; the tree behind it ([`ego_tree::Tree`]) is
//! public and supports node moves, which is all the pipeline needs:
//! rewrite attributes, graft parsed fragments into a page, move children
//! into a wrapper, and drop empty paragraphs. Serialization goes back
//! through [`Html::html`], which preserves untouched structure.
//!
//! New nodes are never built by hand. Markup is parsed with
//! [`Html::parse_fragment`] and its nodes are deep-copied into the target
//! document, so everything in the tree went through the same parser.

use ego_tree::{NodeId, NodeRef, Tree};
use html5ever::{LocalName, Namespace, QualName};
use scraper::node::Node;
use scraper::{Html, Selector};

/// The id of the document's `<body>` element, if it has one.
pub fn body(doc: &Html) -> Option<NodeId> {
    find(doc, &Selector::parse("body").expect("body selector"))
}

/// The id of the document's `<head>` element, if it has one.
pub fn head(doc: &Html) -> Option<NodeId> {
    find(doc, &Selector::parse("head").expect("head selector"))
}

/// The id of the first element matching `selector`.
pub fn find(doc: &Html, selector: &Selector) -> Option<NodeId> {
    doc.select(selector).next().map(|el| el.id())
}

/// True if the document already carries a viewport `<meta>` tag.
pub fn has_viewport(doc: &Html) -> bool {
    let selector = Selector::parse(r#"meta[name="viewport"]"#).expect("viewport selector");
    doc.select(&selector).next().is_some()
}

/// Sets (inserting or replacing) an attribute on an element node.
/// Non-element nodes are left untouched.
pub fn set_attr(doc: &mut Html, node: NodeId, name: &str, value: &str) {
    let mut node = match doc.tree.get_mut(node) {
        Some(node) => node,
        None => return,
    };
    if let Node::Element(element) = node.value() {
        element.attrs.insert(
            QualName::new(None, Namespace::from(""), LocalName::from(name)),
            value.into(),
        );
    }
}

/// Parses `html` as a fragment and appends its nodes, in order, as the
/// last children of `target`.
pub fn append_fragment(doc: &mut Html, target: NodeId, html: &str) {
    let fragment = Html::parse_fragment(html);
    for id in import_fragment(doc, &fragment) {
        doc.tree
            .get_mut(target)
            .expect("fragment target")
            .append_id(id);
    }
}

/// Parses `html` as a fragment and inserts its nodes, in order, as the
/// first children of `target`.
pub fn prepend_fragment(doc: &mut Html, target: NodeId, html: &str) {
    let fragment = Html::parse_fragment(html);
    let ids = import_fragment(doc, &fragment);
    for id in ids.into_iter().rev() {
        doc.tree
            .get_mut(target)
            .expect("fragment target")
            .prepend_id(id);
    }
}

/// Moves the direct children of `parent` accepted by `keep` into a new
/// wrapper element parsed from `wrapper`, preserving their order, then
/// inserts the wrapper as the first child of `parent`.
pub fn wrap_children<F>(doc: &mut Html, parent: NodeId, wrapper: &str, keep: F)
where
    F: Fn(NodeRef<'_, Node>) -> bool,
{
    let children: Vec<NodeId> = match doc.tree.get(parent) {
        Some(node) => node.children().filter(|c| keep(*c)).map(|c| c.id()).collect(),
        None => return,
    };

    let fragment = Html::parse_fragment(wrapper);
    let element = fragment
        .root_element()
        .children()
        .find(|child| child.value().is_element());
    let wrapper_id = match element {
        Some(element) => copy_orphan(&mut doc.tree, element),
        None => return,
    };

    for child in children {
        doc.tree
            .get_mut(wrapper_id)
            .expect("wrapper node")
            .append_id(child);
    }
    doc.tree
        .get_mut(parent)
        .expect("wrap parent")
        .prepend_id(wrapper_id);
}

/// Detaches every `<p>` element with no text content. Text is collected
/// over all descendants, so a paragraph holding only markup (an image,
/// say) counts as empty and is removed with its contents.
pub fn remove_empty_paragraphs(doc: &mut Html) {
    let selector = Selector::parse("p").expect("p selector");
    let empty: Vec<NodeId> = doc
        .select(&selector)
        .filter(|p| p.text().all(|t| t.trim().is_empty()))
        .map(|p| p.id())
        .collect();
    for id in empty {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Deep-copies a fragment's nodes into `doc` as orphans and returns their
/// ids in fragment order. Callers attach them with `append_id` or
/// `prepend_id`.
fn import_fragment(doc: &mut Html, fragment: &Html) -> Vec<NodeId> {
    fragment
        .root_element()
        .children()
        .map(|child| copy_orphan(&mut doc.tree, child))
        .collect()
}

fn copy_orphan(tree: &mut Tree<Node>, source: NodeRef<'_, Node>) -> NodeId {
    let id = tree.orphan(source.value().clone()).id();
    copy_children(tree, id, source);
    id
}

fn copy_children(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    for child in source.children() {
        let id = tree
            .get_mut(parent)
            .expect("copied parent")
            .append(child.value().clone())
            .id();
        copy_children(tree, id, child);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_set_attr_replaces_existing() {
        let mut doc = parse(r#"<html><body><img src="a.heic" alt="x"></body></html>"#);
        let img = find(&doc, &Selector::parse("img").unwrap()).unwrap();
        set_attr(&mut doc, img, "src", "a.png");
        let html = doc.html();
        assert!(html.contains(r#"src="a.png""#));
        assert!(html.contains(r#"alt="x""#));
        assert!(!html.contains("a.heic"));
    }

    #[test]
    fn test_set_attr_inserts_missing() {
        let mut doc = parse(r#"<html><body><div class="gridItem"></div></body></html>"#);
        let div = find(&doc, &Selector::parse("div").unwrap()).unwrap();
        set_attr(&mut doc, div, "style", "height: 250px;");
        assert!(doc.html().contains(r#"style="height: 250px;""#));
    }

    #[test]
    fn test_append_fragment_lands_last() {
        let mut doc = parse("<html><body><p>hello</p></body></html>");
        let body = body(&doc).unwrap();
        append_fragment(&mut doc, body, "<div id=\"tail\">x</div>");
        assert!(doc
            .html()
            .contains(r#"<p>hello</p><div id="tail">x</div></body>"#));
    }

    #[test]
    fn test_append_fragment_keeps_script_text_raw() {
        let mut doc = parse("<html><body></body></html>");
        let body = body(&doc).unwrap();
        append_fragment(&mut doc, body, "<script>var x = \"<b>hi</b>\";</script>");
        assert!(doc.html().contains(r#"var x = "<b>hi</b>";"#));
    }

    #[test]
    fn test_prepend_fragment_preserves_order() {
        let mut doc = parse("<html><body><p>end</p></body></html>");
        let body = body(&doc).unwrap();
        prepend_fragment(&mut doc, body, "<i>1</i><u>2</u>");
        assert!(doc.html().contains("<body><i>1</i><u>2</u><p>end</p></body>"));
    }

    #[test]
    fn test_wrap_all_children() {
        let mut doc = parse(
            r#"<html><body><p id="a">one</p><div id="b">two</div></body></html>"#,
        );
        let body = body(&doc).unwrap();
        wrap_children(&mut doc, body, r#"<div class="shell"></div>"#, |_| true);
        assert!(doc.html().contains(
            r#"<body><div class="shell"><p id="a">one</p><div id="b">two</div></div></body>"#
        ));
    }

    #[test]
    fn test_wrap_children_filtered() {
        let mut doc = parse(
            "<html><body><p>keep</p><script>skip()</script><div>also</div></body></html>",
        );
        let body = body(&doc).unwrap();
        wrap_children(&mut doc, body, r#"<div class="shell"></div>"#, |node| {
            node.value()
                .as_element()
                .map(|el| el.name() == "p" || el.name() == "div")
                .unwrap_or(false)
        });
        let html = doc.html();
        assert!(html.contains(r#"<div class="shell"><p>keep</p><div>also</div></div>"#));
        assert!(html.contains("<script>skip()</script>"));
        // the script stays a direct body child, after the wrapper
        assert!(
            html.find(r#"class="shell""#).unwrap() < html.find("<script>").unwrap()
        );
    }

    #[test]
    fn test_remove_empty_paragraphs() {
        let mut doc = parse(
            "<html><body><p>text</p><p>  </p><p></p><p><img src=\"x.png\"></p></body></html>",
        );
        remove_empty_paragraphs(&mut doc);
        let html = doc.html();
        assert!(html.contains("<p>text</p>"));
        assert_eq!(html.matches("<p>").count(), 1);
        // a paragraph with markup but no text goes too, contents included
        assert!(!html.contains("x.png"));
    }

    #[test]
    fn test_has_viewport() {
        let with = parse(r#"<html><head><meta name="viewport" content="w"></head><body></body></html>"#);
        let without = parse("<html><head></head><body></body></html>");
        assert!(has_viewport(&with));
        assert!(!has_viewport(&without));
    }
}
