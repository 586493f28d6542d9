//! Naive block layout.
//!
//! Every rendered element becomes a block stacked under its previous
//! sibling. This is enough to answer "does the element occupy layout space",
//! which is what visibility checks need.

use super::dom::{Dom, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const NON_RENDERED: &[&str] = &["head", "script", "style", "template", "title", "meta", "link"];

/// Bounding box for an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the box has zero area
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside this bounding box
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Width of the initial containing block
    pub viewport_width: f64,
    /// Height of one line of text
    pub line_height: f64,
}

/// Boxes of every rendered, connected element
#[derive(Debug, Clone, Default)]
pub struct Layout {
    boxes: HashMap<NodeId, BoundingBox>,
}

impl Layout {
    /// Lay out the whole document
    #[must_use]
    pub fn compute(dom: &Dom, context: LayoutContext) -> Self {
        let mut layout = Self::default();
        let mut y = 0.0;
        for child in dom.children(dom.document()) {
            y += layout.place(dom, *child, 0.0, y, context.viewport_width, context);
        }
        layout
    }

    /// Box of `node`, if it is rendered
    #[must_use]
    pub fn bounding_box(&self, node: NodeId) -> Option<BoundingBox> {
        self.boxes.get(&node).copied()
    }

    /// Client rectangles of `node`: one per box, empty when not rendered
    #[must_use]
    pub fn client_rects(&self, node: NodeId) -> Vec<BoundingBox> {
        self.bounding_box(node).into_iter().collect()
    }

    fn place(
        &mut self,
        dom: &Dom,
        node: NodeId,
        x: f64,
        y: f64,
        available: f64,
        context: LayoutContext,
    ) -> f64 {
        if let Some(text) = dom.text(node) {
            return if text.trim().is_empty() {
                0.0
            } else {
                context.line_height * text.trim().lines().count() as f64
            };
        }
        if !is_rendered(dom, node) {
            return 0.0;
        }
        let style = inline_style(dom, node);
        let width = style
            .get("width")
            .and_then(|v| parse_px(v))
            .unwrap_or(available);
        let mut content_height = 0.0;
        for child in dom.children(node) {
            content_height += self.place(dom, *child, x, y + content_height, width, context);
        }
        let height = style
            .get("height")
            .and_then(|v| parse_px(v))
            .unwrap_or(content_height);
        self.boxes
            .insert(node, BoundingBox::new(x, y, width, height));
        height
    }
}

fn is_rendered(dom: &Dom, node: NodeId) -> bool {
    let Some(element) = dom.element(node) else {
        return false;
    };
    if NON_RENDERED.iter().any(|tag| element.is_html(tag)) {
        return false;
    }
    if element.has_attr("hidden") {
        return false;
    }
    if element.is_html("input")
        && element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return false;
    }
    inline_style(dom, node)
        .get("display")
        .map_or(true, |display| display != "none")
}

fn inline_style(dom: &Dom, node: NodeId) -> HashMap<String, String> {
    dom.attr(node, "style")
        .unwrap_or_default()
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| {
            let value = value.trim().trim_end_matches("!important").trim();
            (
                property.trim().to_ascii_lowercase(),
                value.to_ascii_lowercase(),
            )
        })
        .collect()
}

fn parse_px(value: &str) -> Option<f64> {
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| *n >= 0.0)
}
