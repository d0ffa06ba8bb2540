//! MDX JSX element nodes.
//!
//! These types describe what the image pass writes. JSX elements already in
//! the host's tree are read as generic nodes and never pass through them.

use serde::{Deserialize, Serialize};

use super::Node;

/// `mdxJsxTextElement`: `<name {...attributes}>children</name>` inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxElement {
    pub name: Option<String>,
    pub attributes: Vec<JsxAttribute>,
    pub children: Vec<Node>,
}

impl JsxElement {
    /// Childless `<img>` element.
    pub fn img(attributes: Vec<JsxAttribute>) -> Self {
        Self {
            name: Some("img".to_owned()),
            attributes,
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.as_ref())
    }

    /// Attribute names in order.
    pub fn attr_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|attr| attr.name.as_str()).collect()
    }
}

/// Marker for the `"type"` tag of an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    #[default]
    #[serde(rename = "mdxJsxAttribute")]
    Attribute,
}

/// `name="value"`, `name={expression}` or a bare `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxAttribute {
    #[serde(rename = "type", default)]
    pub kind: AttributeType,
    pub name: String,
    #[serde(default)]
    pub value: Option<AttrValue>,
}

impl JsxAttribute {
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Self {
            kind: AttributeType::Attribute,
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttrValue::Text(value.into()))
    }

    pub fn number(name: impl Into<String>, value: u32) -> Self {
        Self::new(name, AttrValue::Number(value))
    }

    pub fn expression(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(name, AttrValue::Expression(ValueExpression::new(source)))
    }
}

/// Attribute value as found in mdast JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Expression(ValueExpression),
    Number(u32),
    Text(String),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&str> {
        match self {
            Self::Expression(expr) => Some(&expr.value),
            _ => None,
        }
    }
}

/// Marker for the `"type"` tag of an expression value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionType {
    #[default]
    #[serde(rename = "mdxJsxAttributeValueExpression")]
    ValueExpression,
}

/// `{source}` attribute value; the host compiles `value` as JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueExpression {
    #[serde(rename = "type")]
    pub kind: ExpressionType,
    pub value: String,
}

impl ValueExpression {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            kind: ExpressionType::ValueExpression,
            value: source.into(),
        }
    }
}
