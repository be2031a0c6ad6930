//! Product index schema definition / 商品索引的 Schema 定义
//!
//! 建索引时显式下发字段映射，与实体定义一同维护 / the field mapping is sent
//! explicitly at index-creation time and versioned next to the entity type.

use serde_json::{json, Value};

/// Index settings and field mappings for the product index / 商品索引的设置与字段映射
///
/// - `name`: analyzed text, tokens lowercased by the standard analyzer / 分词字段
/// - `category`: keyword, exact match only / 精确匹配
/// - `price`: double / 价格
/// - `inStock`: boolean / 是否有货
pub fn product_mappings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "text"
                },
                "category": {
                    "type": "keyword"
                },
                "price": {
                    "type": "double"
                },
                "inStock": {
                    "type": "boolean"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_structure() {
        let mapping = product_mappings();

        assert!(mapping["settings"]["number_of_shards"].is_number());

        let properties = &mapping["mappings"]["properties"];
        assert_eq!(properties["name"]["type"], "text");
        assert_eq!(properties["category"]["type"], "keyword");
        assert_eq!(properties["price"]["type"], "double");
        assert_eq!(properties["inStock"]["type"], "boolean");
        assert_eq!(properties["id"]["type"], "keyword");
    }
}
