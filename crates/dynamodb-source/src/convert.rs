//! Conversion between SDK attribute values and catalog attribute values.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use base64::{engine::general_purpose, Engine as _};
use catalog_types::{AttributeValue, Item};

pub fn from_sdk_item(item: HashMap<String, SdkValue>) -> Result<Item> {
    item.into_iter()
        .map(|(key, value)| Ok((key, from_sdk_value(value)?)))
        .collect()
}

pub fn to_sdk_item(item: Item) -> Result<HashMap<String, SdkValue>> {
    item.into_iter()
        .map(|(key, value)| Ok((key, to_sdk_value(value)?)))
        .collect()
}

fn from_sdk_value(value: SdkValue) -> Result<AttributeValue> {
    Ok(match value {
        SdkValue::S(s) => AttributeValue::S(s),
        SdkValue::N(n) => AttributeValue::N(n),
        SdkValue::Bool(b) => AttributeValue::Bool(b),
        SdkValue::Null(b) => AttributeValue::Null(b),
        SdkValue::L(values) => AttributeValue::L(
            values
                .into_iter()
                .map(from_sdk_value)
                .collect::<Result<_>>()?,
        ),
        SdkValue::M(map) => AttributeValue::M(from_sdk_item(map)?),
        SdkValue::Ss(values) => AttributeValue::Ss(values),
        SdkValue::Ns(values) => AttributeValue::Ns(values),
        SdkValue::B(blob) => AttributeValue::B(general_purpose::STANDARD.encode(blob.as_ref())),
        SdkValue::Bs(blobs) => AttributeValue::Bs(
            blobs
                .iter()
                .map(|blob| general_purpose::STANDARD.encode(blob.as_ref()))
                .collect(),
        ),
        other => bail!("Unsupported DynamoDB attribute value: {other:?}"),
    })
}

fn to_sdk_value(value: AttributeValue) -> Result<SdkValue> {
    Ok(match value {
        AttributeValue::S(s) => SdkValue::S(s),
        AttributeValue::N(n) => SdkValue::N(n),
        AttributeValue::Bool(b) => SdkValue::Bool(b),
        AttributeValue::Null(b) => SdkValue::Null(b),
        AttributeValue::L(values) => SdkValue::L(
            values
                .into_iter()
                .map(to_sdk_value)
                .collect::<Result<_>>()?,
        ),
        AttributeValue::M(map) => SdkValue::M(to_sdk_item(map)?),
        AttributeValue::Ss(values) => SdkValue::Ss(values),
        AttributeValue::Ns(values) => SdkValue::Ns(values),
        AttributeValue::B(encoded) => SdkValue::B(decode_blob(&encoded)?),
        AttributeValue::Bs(encoded) => SdkValue::Bs(
            encoded
                .iter()
                .map(|e| decode_blob(e))
                .collect::<Result<_>>()?,
        ),
    })
}

fn decode_blob(encoded: &str) -> Result<Blob> {
    general_purpose::STANDARD
        .decode(encoded)
        .map(Blob::new)
        .map_err(|e| anyhow!("Invalid base64 binary attribute: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_values_convert_both_ways() {
        let label = HashMap::from([
            ("name".to_string(), SdkValue::S("Shoe".to_string())),
            ("confidence".to_string(), SdkValue::N("80".to_string())),
        ]);
        let sdk_item = HashMap::from([
            ("id".to_string(), SdkValue::S("p1".to_string())),
            ("image_labels".to_string(), SdkValue::L(vec![SdkValue::M(label)])),
            ("thumb".to_string(), SdkValue::B(Blob::new(vec![1u8, 2, 3]))),
        ]);

        let item = from_sdk_item(sdk_item.clone()).unwrap();
        assert_eq!(item["thumb"], AttributeValue::B("AQID".to_string()));
        assert_eq!(
            item["image_labels"].as_list("image_labels").unwrap()[0]
                .as_map("label")
                .unwrap()["confidence"],
            AttributeValue::N("80".to_string())
        );

        assert_eq!(to_sdk_item(item).unwrap(), sdk_item);
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let item = Item::from([("b".to_string(), AttributeValue::B("***".to_string()))]);
        assert!(to_sdk_item(item).is_err());
    }
}
