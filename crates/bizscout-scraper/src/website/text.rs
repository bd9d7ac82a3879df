//! Visible-text helpers over a parsed HTML document.

use scraper::{ElementRef, Node};

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "template", "head", "svg"];

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text nodes under `root`, in document order, whitespace-collapsed
/// and with empty nodes dropped.
pub(crate) fn visible_blocks(root: ElementRef<'_>) -> Vec<String> {
    root.descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                return None;
            }
            let collapsed = collapse_whitespace(text);
            (!collapsed.is_empty()).then_some(collapsed)
        })
        .collect()
}

/// Whitespace-collapsed text content of one element (hidden children
/// excluded).
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    visible_blocks(element).join(" ")
}
