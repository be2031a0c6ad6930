use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 商品实体 / Product entity stored in the search index
///
/// `category` 为精确匹配字段，`name` 为分词字段 / `category` is an exact-match
/// keyword field while `name` is analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 商品ID，为空时由服务端生成 / Product ID, generated when left empty
    #[serde(default)]
    pub id: String,
    /// 商品名称 / Product name
    pub name: String,
    /// 商品分类 / Product category
    pub category: String,
    /// 商品价格 / Product price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// 是否有货 / In stock flag
    pub in_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;

    #[test]
    fn test_product_wire_format() {
        let json = r#"{"id":"1","name":"Shoe","category":"footwear","price":49.99,"inStock":true}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "1");
        assert_eq!(product.name, "Shoe");
        assert_eq!(product.category, "footwear");
        assert_eq!(product.price.to_f64().unwrap(), 49.99);
        assert!(product.in_stock);

        // 序列化字段名保持 camelCase / serialized field names stay camelCase
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("inStock").is_some());
        assert!(value.get("in_stock").is_none());
        assert!(value["price"].is_number());
    }

    #[test]
    fn test_missing_id_defaults_to_empty() {
        let json = r#"{"name":"Sofa","category":"furniture","price":199.0,"inStock":false}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.id.is_empty());
        assert!(!product.in_stock);
    }
}
