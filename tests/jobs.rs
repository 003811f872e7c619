//! End-to-end job tests over the in-memory graph and a paged in-memory table.

use anyhow::Result;
use async_trait::async_trait;
use catalog_types::{AttributeValue, Item};
use dynamodb_source::{parse_batch, ScanPage, TableScanner};
use graph_sink::{Edge, MemoryGraph, PropertyValue, VertexKind};
use product_graph_sync::mapping::LABELS_PROPERTY;
use product_graph_sync::{
    close_after, run_bulk_load, run_export, run_incremental_sync, JobError,
};
use serde_json::json;

/// Serves fixed pages, keyed by page index.
struct PagedTable {
    pages: Vec<Vec<Item>>,
}

impl PagedTable {
    fn new(items: Vec<Item>, page_size: usize) -> Self {
        Self {
            pages: items.chunks(page_size).map(<[Item]>::to_vec).collect(),
        }
    }
}

fn page_key(index: usize) -> Item {
    Item::from([("page".to_string(), AttributeValue::N(index.to_string()))])
}

#[async_trait]
impl TableScanner for PagedTable {
    fn table_name(&self) -> &str {
        "products"
    }

    async fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage> {
        let index = match exclusive_start_key.as_ref().and_then(|k| k.get("page")) {
            Some(AttributeValue::N(n)) => n.parse()?,
            _ => 0,
        };
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let last_evaluated_key = (index + 1 < self.pages.len()).then(|| page_key(index + 1));
        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}

struct UnreachableTable;

#[async_trait]
impl TableScanner for UnreachableTable {
    fn table_name(&self) -> &str {
        "products"
    }

    async fn scan_page(&self, _exclusive_start_key: Option<Item>) -> Result<ScanPage> {
        anyhow::bail!("dispatch failure: connection refused")
    }
}

fn product(id: &str, category: &str, style: &str) -> Item {
    let labels = AttributeValue::L(vec![
        label("Shoe", "80"),
        label("Red", "50"),
    ]);
    [
        ("id", AttributeValue::S(id.to_string())),
        ("sk", AttributeValue::S(String::new())),
        ("name", AttributeValue::S(format!("Product {id}"))),
        ("category", AttributeValue::S(category.to_string())),
        ("style", AttributeValue::S(style.to_string())),
        ("price", AttributeValue::N("10".to_string())),
        ("current_stock", AttributeValue::N("5".to_string())),
        ("featured", AttributeValue::S("true".to_string())),
        ("image_labels", labels),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn label(name: &str, confidence: &str) -> AttributeValue {
    AttributeValue::M(
        [
            ("name".to_string(), AttributeValue::S(name.to_string())),
            (
                "confidence".to_string(),
                AttributeValue::N(confidence.to_string()),
            ),
        ]
        .into_iter()
        .collect(),
    )
}

#[tokio::test]
async fn test_bulk_load_single_product() {
    let table = PagedTable::new(vec![product("p1", "Shoes", "Running")], 10);
    let graph = MemoryGraph::new();

    let report = close_after(&graph, run_bulk_load(&table, &graph))
        .await
        .unwrap();

    assert_eq!(report.products, 1);
    assert_eq!(report.categories, 1);
    assert_eq!(report.styles, 1);
    assert!(graph.is_closed().await);

    let categories = graph
        .vertex_ids(&VertexKind::Category("Shoes".to_string()))
        .await;
    let styles = graph
        .vertex_ids(&VertexKind::Style("Running".to_string()))
        .await;
    assert_eq!(categories.len(), 1);
    assert_eq!(styles.len(), 1);

    assert_eq!(
        graph.edges().await,
        vec![
            Edge::has(categories[0].clone(), styles[0].clone()),
            Edge::has(styles[0].clone(), "p1"),
        ]
    );

    let p1 = graph.vertex("p1").await.unwrap();
    assert_eq!(p1.values(LABELS_PROPERTY), &[PropertyValue::from("shoe")]);
    assert_eq!(p1.property("featured"), Some(&PropertyValue::Bool(true)));
    assert_eq!(p1.property("sk"), None);
}

#[tokio::test]
async fn test_bulk_load_counts_distinct_values_across_pages() {
    let items = vec![
        product("p1", "Shoes", "Running"),
        product("p2", "Shoes", "Running"),
        product("p3", "Shoes", "Hiking"),
        product("p4", "Hats", "Casual"),
        product("p5", "Bags", "Casual"),
    ];
    let table = PagedTable::new(items, 2);
    let graph = MemoryGraph::new();

    let report = run_bulk_load(&table, &graph).await.unwrap();

    let summary = graph.summary().await;
    assert_eq!(summary.products, 5);
    assert_eq!(summary.categories, 3);
    assert_eq!(summary.styles, 3);
    // Shoes-Running, Shoes-Hiking, Hats-Casual, Bags-Casual
    assert_eq!(report.category_style_edges, 4);
    assert_eq!(report.style_product_edges, 5);
    assert_eq!(summary.edges, 9);
}

#[tokio::test]
async fn test_bulk_load_bad_record_writes_nothing() {
    let mut broken = product("p2", "Shoes", "Running");
    broken.remove("category");
    let table = PagedTable::new(vec![product("p1", "Shoes", "Running"), broken], 10);
    let graph = MemoryGraph::new();

    let err = run_bulk_load(&table, &graph).await.unwrap_err();

    assert!(matches!(err, JobError::BadRecord { ref id, .. } if id.as_deref() == Some("p2")));
    assert_eq!(graph.summary().await.products, 0);
}

#[tokio::test]
async fn test_scan_failure_is_connectivity() {
    let graph = MemoryGraph::new();

    let err = close_after(&graph, run_bulk_load(&UnreachableTable, &graph))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "connectivity");
    assert!(format!("{:#}", anyhow::Error::from(err)).starts_with("connectivity error: document store"));
    assert!(graph.is_closed().await);
}

#[tokio::test]
async fn test_stream_batch_after_bulk_load() {
    let table = PagedTable::new(vec![product("p1", "Shoes", "Running")], 10);
    let graph = MemoryGraph::new();
    run_bulk_load(&table, &graph).await.unwrap();

    let batch = json!({
        "Records": [
            {
                "eventName": "MODIFY",
                "dynamodb": {
                    "Keys": {"id": {"S": "p1"}},
                    "NewImage": {
                        "id": {"S": "p1"},
                        "name": {"S": "Trail Runner"},
                        "category": {"S": "Shoes"},
                        "style": {"S": "Running"},
                        "price": {"N": "12.5"},
                        "image_labels": {"L": [
                            {"M": {"name": {"S": "Sneaker"}, "confidence": {"N": "99.1"}}}
                        ]}
                    }
                }
            },
            {
                "eventName": "INSERT",
                "dynamodb": {
                    "Keys": {"id": {"S": "p2"}},
                    "NewImage": {
                        "id": {"S": "p2"},
                        "name": {"S": "Sun Hat"},
                        "category": {"S": "Hats"},
                        "style": {"S": "Casual"}
                    }
                }
            },
            {
                "eventName": "REMOVE",
                "dynamodb": {"Keys": {"id": {"S": "p2"}}}
            }
        ]
    });
    let events = parse_batch(&batch.to_string()).unwrap();

    let report = run_incremental_sync(&graph, &events).await.unwrap();

    assert_eq!((report.inserted, report.modified, report.removed), (1, 1, 1));
    let p1 = graph.vertex("p1").await.unwrap();
    assert_eq!(
        p1.property("product_name"),
        Some(&PropertyValue::from("Trail Runner"))
    );
    assert_eq!(p1.property("price"), Some(&PropertyValue::Float(12.5)));
    assert_eq!(p1.property("current_stock"), None);
    assert_eq!(p1.property("featured"), None);
    assert_eq!(
        p1.values(LABELS_PROPERTY),
        &[PropertyValue::from("shoe"), PropertyValue::from("sneaker")]
    );
    assert!(graph.vertex("p2").await.is_none());
}

#[tokio::test]
async fn test_export_all_pages() {
    let items = vec![
        product("p1", "Shoes", "Running"),
        product("p2", "Hats", "Casual"),
        product("p3", "Bags", "Casual"),
    ];
    let table = PagedTable::new(items, 2);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.yaml");

    let count = run_export(&table, &path).await.unwrap();

    assert_eq!(count, 3);
    let written: serde_json::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let products = written.as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0]["id"], "p1");
    assert_eq!(products[0]["price"], 10);
    assert_eq!(products[0]["featured"], "true");
    assert_eq!(
        products[0]["image_labels"],
        json!([
            {"confidence": 80.0, "name": "Shoe"},
            {"confidence": 50.0, "name": "Red"}
        ])
    );
}
