//! Bulk load: build the category → style → product graph from a full table scan.
//!
//! The load runs in four phases:
//!
//! 1. Extract every record from the table
//! 2. Derive the distinct categories and styles, each with a fresh id
//! 3. Insert product vertices (with their labels), then category and style vertices
//! 4. Insert `has` edges, category → style and style → product
//!
//! Phases 2 and the edge derivation of phase 4 are pure ([`GraphPlan::build`]);
//! [`apply_plan`] performs the writes. Every vertex exists before the first
//! edge is written.
//!
//! The load is meant for an empty graph. Re-running it against a populated
//! graph creates a second set of category and style vertices.

use std::collections::{HashMap, HashSet};

use catalog_types::Product;
use dynamodb_source::{scan_all, TableScanner};
use graph_sink::{Edge, GraphSink, Vertex, VertexKind};
use uuid::Uuid;

use crate::mapping::{add_confident_labels, decode_product, product_vertex};
use crate::JobError;

/// A category or style vertex derived from the product records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVertex {
    pub id: String,
    pub name: String,
}

/// Everything the load writes, in write order.
#[derive(Debug, Clone, Default)]
pub struct GraphPlan {
    pub products: Vec<Product>,
    pub categories: Vec<DerivedVertex>,
    pub styles: Vec<DerivedVertex>,
    pub category_style_edges: Vec<Edge>,
    pub style_product_edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkLoadReport {
    pub products: usize,
    pub categories: usize,
    pub styles: usize,
    pub category_style_edges: usize,
    pub style_product_edges: usize,
    pub labels_written: usize,
}

/// Distinct names in first-seen order, each with an id from `new_id`.
#[derive(Default)]
struct Registry {
    ids: HashMap<String, String>,
    order: Vec<DerivedVertex>,
}

impl Registry {
    fn id_for(&mut self, name: &str, new_id: &mut impl FnMut() -> String) -> String {
        if let Some(id) = self.ids.get(name) {
            return id.clone();
        }
        let id = new_id();
        self.ids.insert(name.to_string(), id.clone());
        self.order.push(DerivedVertex {
            id: id.clone(),
            name: name.to_string(),
        });
        id
    }
}

/// Edges in first-seen order, each (from, to) pair once.
#[derive(Default)]
struct EdgeSet {
    seen: HashSet<(String, String)>,
    edges: Vec<Edge>,
}

impl EdgeSet {
    fn insert(&mut self, from: &str, to: &str) {
        if self.seen.insert((from.to_string(), to.to_string())) {
            self.edges.push(Edge::has(from, to));
        }
    }
}

impl GraphPlan {
    /// Derive categories, styles and edges from `products`.
    ///
    /// `new_id` is called once per distinct category and style name.
    pub fn build(products: Vec<Product>, mut new_id: impl FnMut() -> String) -> Self {
        let mut categories = Registry::default();
        let mut styles = Registry::default();
        let mut category_style = EdgeSet::default();
        let mut style_product = EdgeSet::default();

        for product in &products {
            let category_id = categories.id_for(&product.category, &mut new_id);
            let style_id = styles.id_for(&product.style, &mut new_id);
            category_style.insert(&category_id, &style_id);
            style_product.insert(&style_id, &product.id);
        }

        GraphPlan {
            products,
            categories: categories.order,
            styles: styles.order,
            category_style_edges: category_style.edges,
            style_product_edges: style_product.edges,
        }
    }

    pub fn category_vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.categories.iter().map(|c| {
            Vertex::new(c.id.clone(), VertexKind::Category(c.name.clone()))
                .with_property("name", c.name.as_str())
        })
    }

    pub fn style_vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.styles.iter().map(|s| {
            Vertex::new(s.id.clone(), VertexKind::Style(s.name.clone()))
                .with_property("name", s.name.as_str())
        })
    }
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Write a plan: all vertices first, then all edges.
pub async fn apply_plan<S: GraphSink + ?Sized>(
    sink: &S,
    plan: &GraphPlan,
) -> Result<BulkLoadReport, JobError> {
    let mut report = BulkLoadReport::default();

    tracing::info!("Inserting {} product vertices", plan.products.len());
    for product in &plan.products {
        sink.create_vertex(&product_vertex(product))
            .await
            .map_err(JobError::graph)?;
        report.labels_written += add_confident_labels(sink, product).await?;
        report.products += 1;
    }

    tracing::info!(
        "Inserting {} category and {} style vertices",
        plan.categories.len(),
        plan.styles.len()
    );
    for vertex in plan.category_vertices() {
        tracing::debug!("Creating {} vertex {}", vertex.kind, vertex.id);
        sink.create_vertex(&vertex).await.map_err(JobError::graph)?;
        report.categories += 1;
    }
    for vertex in plan.style_vertices() {
        tracing::debug!("Creating {} vertex {}", vertex.kind, vertex.id);
        sink.create_vertex(&vertex).await.map_err(JobError::graph)?;
        report.styles += 1;
    }

    tracing::info!(
        "Inserting {} category-style and {} style-product edges",
        plan.category_style_edges.len(),
        plan.style_product_edges.len()
    );
    for edge in &plan.category_style_edges {
        sink.add_edge(edge).await.map_err(JobError::graph)?;
        report.category_style_edges += 1;
    }
    for edge in &plan.style_product_edges {
        sink.add_edge(edge).await.map_err(JobError::graph)?;
        report.style_product_edges += 1;
    }

    Ok(report)
}

/// Scan the whole table and load it into the graph.
///
/// Every record is decoded before the first write, so a bad record leaves
/// the graph untouched.
pub async fn run_bulk_load<T, S>(scanner: &T, sink: &S) -> Result<BulkLoadReport, JobError>
where
    T: TableScanner + ?Sized,
    S: GraphSink + ?Sized,
{
    tracing::info!("Starting bulk load from '{}'", scanner.table_name());

    let items = scan_all(scanner).await.map_err(JobError::document_store)?;
    let products = items
        .iter()
        .map(decode_product)
        .collect::<Result<Vec<_>, _>>()?;

    let plan = GraphPlan::build(products, new_uuid);
    let report = apply_plan(sink, &plan).await?;

    tracing::info!(
        "Bulk load completed: {} products, {} categories, {} styles, {} edges",
        report.products,
        report.categories,
        report.styles,
        report.category_style_edges + report.style_product_edges
    );
    Ok(report)
}
