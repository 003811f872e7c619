//! Product record to graph mapping shared by the sync and bulk-load jobs.

use catalog_types::{item_id, Item, Number, Product};
use graph_sink::{GraphSink, Properties, PropertyValue, Vertex, VertexKind};

use crate::JobError;

/// Multi-valued property holding the lower-cased names of confident image labels.
pub const LABELS_PROPERTY: &str = "labels_confidence_gt_75";

/// Decode an item, attaching its id (when readable) to any error.
pub fn decode_product(item: &Item) -> Result<Product, JobError> {
    Product::from_item(item).map_err(|e| JobError::bad_record(item_id(item), e))
}

/// Every tracked scalar property of a product vertex.
///
/// Absent optional fields map to `Null`: skipped on create, removed on update,
/// so an update always rewrites the complete property set.
pub fn product_properties(product: &Product) -> Properties {
    Properties::from([
        ("product_name".to_string(), product.name.as_str().into()),
        ("current_stock".to_string(), number(product.current_stock)),
        ("style".to_string(), product.style.as_str().into()),
        (
            "gender_affinity".to_string(),
            product.gender_affinity.clone().into(),
        ),
        ("image".to_string(), product.image.clone().into()),
        ("category".to_string(), product.category.as_str().into()),
        ("description".to_string(), product.description.clone().into()),
        ("price".to_string(), number(product.price)),
        ("featured".to_string(), product.featured.into()),
    ])
}

pub fn product_vertex(product: &Product) -> Vertex {
    Vertex {
        id: product.id.clone(),
        kind: VertexKind::Product,
        properties: product_properties(product),
    }
}

/// Add each confident label to the product's label property, one call per label.
///
/// Values already on the vertex are kept; nothing is ever removed here.
/// Returns the number of label writes issued, including writes of a label
/// the vertex already held.
pub async fn add_confident_labels<S: GraphSink + ?Sized>(
    sink: &S,
    product: &Product,
) -> Result<usize, JobError> {
    let mut written = 0;
    for label in product.confident_labels() {
        tracing::trace!("Adding label '{}' to {}", label, product.id);
        sink.add_property_value(&product.id, LABELS_PROPERTY, &PropertyValue::Text(label))
            .await
            .map_err(JobError::graph)?;
        written += 1;
    }
    Ok(written)
}

fn number(value: Option<Number>) -> PropertyValue {
    match value {
        Some(Number::Int(i)) => PropertyValue::Int(i),
        Some(Number::Float(f)) => PropertyValue::Float(f),
        None => PropertyValue::Null,
    }
}
