//! Cypher statement builders.
//!
//! Statements are built as plain text plus named parameters so they can be
//! checked without a server. Labels and property keys come from catalog data,
//! so they are always backtick-quoted; values are always passed as parameters
//! except `null`, which is written literally.

use graph_sink::{Edge, Properties, PropertyValue, Vertex};
use neo4rs::Query;

/// A Cypher statement and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub cypher: String,
    pub params: Vec<(String, PropertyValue)>,
}

impl Statement {
    fn new(cypher: String) -> Self {
        Self {
            cypher,
            params: Vec::new(),
        }
    }

    fn param(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    pub fn to_query(&self) -> Query {
        self.params
            .iter()
            .fold(Query::new(self.cypher.clone()), |query, (name, value)| {
                bind(query, name, value)
            })
    }

    pub fn create_vertex(vertex: &Vertex) -> Self {
        let (assignments, params) = assignments(&vertex.properties, false);
        let mut cypher = format!(
            "CREATE (n:{} {{id: $id}})",
            quote_identifier(&vertex.kind.label())
        );
        if !assignments.is_empty() {
            cypher.push_str(" SET ");
            cypher.push_str(&assignments.join(", "));
        }
        Statement {
            cypher,
            params: std::iter::once(("id".to_string(), vertex.id.as_str().into()))
                .chain(params)
                .collect(),
        }
    }

    /// Ends with `RETURN` so the caller can tell whether the vertex existed.
    pub fn set_properties(id: &str, properties: &Properties) -> Self {
        let (assignments, params) = assignments(properties, true);
        let mut cypher = "MATCH (n {id: $id})".to_string();
        if !assignments.is_empty() {
            cypher.push_str(" SET ");
            cypher.push_str(&assignments.join(", "));
        }
        cypher.push_str(" RETURN n.id AS id");
        Statement {
            cypher,
            params: std::iter::once(("id".to_string(), id.into()))
                .chain(params)
                .collect(),
        }
    }

    /// Appends to a list property unless the value is already in it.
    pub fn add_property_value(id: &str, key: &str, value: &PropertyValue) -> Self {
        let key = quote_identifier(key);
        Statement::new(format!(
            "MATCH (n {{id: $id}}) \
             SET n.{key} = CASE WHEN $value IN coalesce(n.{key}, []) \
             THEN n.{key} ELSE coalesce(n.{key}, []) + $value END \
             RETURN n.id AS id"
        ))
        .param("id", id)
        .param("value", value.clone())
    }

    pub fn drop_vertex(id: &str) -> Self {
        Statement::new("MATCH (n {id: $id}) DETACH DELETE n".to_string()).param("id", id)
    }

    pub fn add_edge(edge: &Edge) -> Self {
        Statement::new(format!(
            "MATCH (a {{id: $from}}), (b {{id: $to}}) \
             CREATE (a)-[r:{}]->(b) RETURN type(r) AS label",
            quote_identifier(&edge.label)
        ))
        .param("from", edge.from.as_str())
        .param("to", edge.to.as_str())
    }
}

/// `n.key = $pN` for each property. Nulls are skipped on create and written as
/// `n.key = null` (which removes the property) on update.
fn assignments(
    properties: &Properties,
    write_nulls: bool,
) -> (Vec<String>, Vec<(String, PropertyValue)>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    for (key, value) in properties {
        let target = format!("n.{}", quote_identifier(key));
        if value.is_null() {
            if write_nulls {
                clauses.push(format!("{target} = null"));
            }
            continue;
        }
        let name = format!("p{}", params.len());
        clauses.push(format!("{target} = ${name}"));
        params.push((name, value.clone()));
    }
    (clauses, params)
}

fn quote_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

fn bind(query: Query, name: &str, value: &PropertyValue) -> Query {
    match value {
        PropertyValue::Text(s) => query.param(name, s.as_str()),
        PropertyValue::Int(i) => query.param(name, *i),
        PropertyValue::Float(f) => query.param(name, *f),
        PropertyValue::Bool(b) => query.param(name, *b),
        PropertyValue::Null => query,
    }
}
