//! Vertex, edge and property types.

use std::collections::BTreeMap;
use std::fmt;

/// Label of the edges linking category → style and style → product.
pub const HAS_EDGE_LABEL: &str = "has";

/// The kinds of vertex the jobs write.
///
/// Category and style vertices carry the value they were derived from; the
/// store label is rendered from it (`category::Shoes`, `style::Running`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexKind {
    Product,
    Category(String),
    Style(String),
}

impl VertexKind {
    /// The vertex label as stored in the graph.
    pub fn label(&self) -> String {
        match self {
            VertexKind::Product => "product".to_string(),
            VertexKind::Category(name) => format!("category::{name}"),
            VertexKind::Style(name) => format!("style::{name}"),
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A scalar property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Removes the property when written with `set_properties`
    Null,
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}

/// Property name to value, ordered so writes are deterministic.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A vertex to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: String,
    pub kind: VertexKind,
    pub properties: Properties,
}

impl Vertex {
    pub fn new(id: impl Into<String>, kind: VertexKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A directed, labeled edge between two vertex ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub label: String,
    pub from: String,
    pub to: String,
}

impl Edge {
    /// A `has` edge, the only kind the jobs create.
    pub fn has(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: HAS_EDGE_LABEL.to_string(),
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_labels() {
        assert_eq!(VertexKind::Product.label(), "product");
        assert_eq!(
            VertexKind::Category("Shoes".to_string()).label(),
            "category::Shoes"
        );
        assert_eq!(
            VertexKind::Style("Running".to_string()).to_string(),
            "style::Running"
        );
    }

    #[test]
    fn test_optional_property_values() {
        assert_eq!(PropertyValue::from(Some("x")), PropertyValue::Text("x".to_string()));
        assert_eq!(PropertyValue::from(None::<i64>), PropertyValue::Null);
    }

    #[test]
    fn test_has_edge() {
        let edge = Edge::has("a", "b");
        assert_eq!(edge.label, "has");
        assert_eq!(edge.from, "a");
        assert_eq!(edge.to, "b");
    }
}
