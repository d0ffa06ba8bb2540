//! Markdown syntax tree (mdast) as handed over by the host.
//!
//! Only two node shapes are modelled: `image` (resolution input) and the
//! `<img>` `mdxJsxTextElement` the pass writes. Every node read from JSON,
//! except images, is kept as a [`GenericNode`] that round-trips its fields
//! untouched. That includes JSX elements the host produced, so the pass can
//! walk arbitrary trees without knowing their full vocabulary.
//!
//! Replacing an image is a single assignment into its slot:
//!
//! ```ignore
//! *slot = Node::Element(JsxElement::img(attributes));
//! ```

mod jsx;

pub use jsx::{AttrValue, AttributeType, ExpressionType, JsxAttribute, JsxElement, ValueExpression};

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const IMAGE_TYPE: &str = "image";
pub const JSX_TEXT_ELEMENT_TYPE: &str = "mdxJsxTextElement";

// ============================================================================
// Node
// ============================================================================

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `![alt](url "title")`
    Image(ImageNode),
    /// Inline JSX element, produced by rewriting an image (never parsed)
    Element(JsxElement),
    /// Any other node (root, paragraph, text, ...)
    Other(GenericNode),
}

/// Markdown image reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `position`, `data` and anything else the host attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageNode {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Node of a type this crate does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl GenericNode {
    /// Parent node with the given children.
    pub fn parent(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            children: Some(children),
            fields: Map::new(),
        }
    }

    /// Literal node (`text`, `inlineCode`, ...) carrying a `value`.
    pub fn literal(kind: impl Into<String>, value: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("value".to_owned(), Value::String(value.into()));
        Self {
            kind: kind.into(),
            children: None,
            fields,
        }
    }
}

impl Node {
    /// Shorthand for a `root` node.
    pub fn root(children: Vec<Node>) -> Self {
        Self::Other(GenericNode::parent("root", children))
    }

    /// Shorthand for a `paragraph` node.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::Other(GenericNode::parent("paragraph", children))
    }

    /// Shorthand for a `text` node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Other(GenericNode::literal("text", value))
    }

    /// The mdast `type` string.
    pub fn kind(&self) -> &str {
        match self {
            Self::Image(_) => IMAGE_TYPE,
            Self::Element(_) => JSX_TEXT_ELEMENT_TYPE,
            Self::Other(node) => &node.kind,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Image(_) => &[],
            Self::Element(elem) => &elem.children,
            Self::Other(node) => node.children.as_deref().unwrap_or(&[]),
        }
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Self::Image(_) => &mut [],
            Self::Element(elem) => &mut elem.children,
            Self::Other(node) => node.children.as_deref_mut().unwrap_or(&mut []),
        }
    }

    pub fn as_image(&self) -> Option<&ImageNode> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&JsxElement> {
        match self {
            Self::Element(elem) => Some(elem),
            _ => None,
        }
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Collect a mutable handle to every image slot in the tree, in document order.
///
/// The handles are disjoint borrows, so each can be rewritten independently
/// (and concurrently) without locking. Rewritten elements are not image
/// nodes, so a second pass over the same tree finds nothing to do for them.
pub fn image_slots(root: &mut Node) -> Vec<&mut Node> {
    let mut slots = Vec::new();
    collect_image_slots(root, &mut slots);
    slots
}

fn collect_image_slots<'a>(node: &'a mut Node, slots: &mut Vec<&'a mut Node>) {
    if matches!(node, Node::Image(_)) {
        slots.push(node);
        return;
    }
    for child in node.children_mut() {
        collect_image_slots(child, slots);
    }
}

/// Count nodes matching `pred` (depth-first, including `root`).
pub fn count_nodes(root: &Node, pred: &impl Fn(&Node) -> bool) -> usize {
    let own = usize::from(pred(root));
    own + root
        .children()
        .iter()
        .map(|child| count_nodes(child, pred))
        .sum::<usize>()
}

// ============================================================================
// Serde
// ============================================================================

/// Borrowed view used to serialize known node types with their `type` tag.
#[derive(Serialize)]
#[serde(tag = "type")]
enum Tagged<'a> {
    #[serde(rename = "image")]
    Image(&'a ImageNode),
    #[serde(rename = "mdxJsxTextElement")]
    Element(&'a JsxElement),
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Image(image) => Tagged::Image(image).serialize(serializer),
            Self::Element(elem) => Tagged::Element(elem).serialize(serializer),
            Self::Other(node) => node.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_value(value).map_err(de::Error::custom)
    }
}

impl Node {
    /// Convert a JSON value into a tree.
    ///
    /// Children are detached and converted before their parent, so every
    /// node is decoded exactly once regardless of depth.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut object) = value else {
            return Err(de::Error::custom("node must be a JSON object"));
        };

        let is_image = match object.get("type") {
            Some(Value::String(kind)) => kind == IMAGE_TYPE,
            Some(_) => return Err(de::Error::custom("node `type` must be a string")),
            None => return Err(de::Error::missing_field("type")),
        };
        if is_image {
            object.remove("type");
            return serde_json::from_value(Value::Object(object)).map(Node::Image);
        }

        let children = match object.remove("children") {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(Node::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => return Err(de::Error::custom("node `children` must be an array")),
        };

        let mut node: GenericNode = serde_json::from_value(Value::Object(object))?;
        node.children = children;
        Ok(Node::Other(node))
    }
}

// ============================================================================
// Tests
// ============================================================================
