//! Product index facade - primitive operations against Elasticsearch / 商品索引
//!
//! 只暴露原语操作，不控制流程 / only exposes primitive operations, flow stays
//! with the callers:
//! - save / bulk_save: 写入 / index documents
//! - find_by_id / find_all: 读取 / fetch documents
//! - delete_by_id: 删除 / delete a document
//! - search: 执行任意查询体 / run an arbitrary search body
//! - average_price_per_category / count_per_category: 聚合 / aggregations
//!
//! 客户端句柄由外部构造后注入，本模块不读取任何全局配置 / the client handle is
//! constructed by the caller and injected, no global configuration is read here.

use std::collections::HashMap;

use elasticsearch::http::request::JsonBody;
use elasticsearch::http::response::Response;
use elasticsearch::http::StatusCode;
use elasticsearch::indices::{IndicesCreateParts, IndicesExistsParts};
use elasticsearch::{BulkParts, DeleteParts, Elasticsearch, GetParts, IndexParts, SearchParts};
use serde_json::{json, Value};

use super::{query, schema, SearchError};
use crate::models::Product;

/// Elasticsearch 商品索引句柄 / handle to the product index
pub struct ProductIndex {
    client: Elasticsearch,
    index: String,
}

impl ProductIndex {
    /// 创建索引句柄 / create a handle over an injected client
    pub fn new(client: Elasticsearch, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    /// 索引名称 / name of the backing index
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// 确保索引存在，不存在则按显式映射创建 / create the index with the
    /// explicit field mapping if it does not exist yet
    pub async fn ensure_index(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            let response = self
                .client
                .indices()
                .create(IndicesCreateParts::Index(&self.index))
                .body(schema::product_mappings())
                .send()
                .await?;
            check_response(response).await?;
            tracing::info!("Created index \"{}\" with product mappings", self.index);
        }

        Ok(())
    }

    /// 按ID写入商品，已存在则覆盖 / overwrite-by-id upsert
    pub async fn save(&self, product: &Product) -> Result<(), SearchError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index, &product.id))
            .body(product)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    /// 批量写入，一个商品一条index操作，单次提交 / one index operation per
    /// product keyed by id, submitted as a single batch
    ///
    /// 单条失败由引擎自行处理，这里只记录 / per-item failures are owned by the
    /// engine and only logged here.
    pub async fn bulk_save(&self, products: &[Product]) -> Result<(), SearchError> {
        if products.is_empty() {
            return Ok(());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(products.len() * 2);
        for product in products {
            body.push(json!({ "index": { "_id": product.id } }).into());
            body.push(serde_json::to_value(product)?.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(body)
            .send()
            .await?;
        let response = check_response(response).await?;

        let value = response.json::<Value>().await?;
        if value["errors"].as_bool().unwrap_or(false) {
            tracing::warn!("批量写入存在失败条目 / bulk index reported item errors");
        }

        Ok(())
    }

    /// 按ID查找 / fetch a product by identifier
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, SearchError> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index, id))
            .send()
            .await?;

        // 文档不存在返回None而不是错误 / absence is a domain outcome, not an error
        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_response(response).await?;
        let value = response.json::<Value>().await?;
        if !value["found"].as_bool().unwrap_or(false) {
            return Ok(None);
        }

        let product = serde_json::from_value(value["_source"].clone())?;
        Ok(Some(product))
    }

    /// 查询全部商品（返回条数为引擎默认分页）/ list products, page size is the
    /// engine default
    pub async fn find_all(&self) -> Result<Vec<Product>, SearchError> {
        self.search(query::match_all()).await
    }

    /// 按ID删除 / delete by identifier
    pub async fn delete_by_id(&self, id: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index, id))
            .send()
            .await?;

        // 删除不存在的文档视为成功 / deleting a missing document is a success
        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        check_response(response).await?;
        Ok(())
    }

    /// 执行查询体并取回商品列表 / run any builder-produced body
    pub async fn search(&self, body: Value) -> Result<Vec<Product>, SearchError> {
        let value = self.raw_search(body).await?;
        parse_hits(&value)
    }

    /// 每个分类的平均价格 / average price per category
    pub async fn average_price_per_category(&self) -> Result<HashMap<String, f64>, SearchError> {
        let value = self.raw_search(query::avg_price_per_category()).await?;
        Ok(parse_avg_price_buckets(&value))
    }

    /// 每个分类的商品数 / document count per category
    pub async fn count_per_category(&self) -> Result<HashMap<String, u64>, SearchError> {
        let value = self.raw_search(query::count_per_category()).await?;
        Ok(parse_count_buckets(&value))
    }

    /// 发送查询并返回原始响应体 / send a search body, return the raw response
    async fn raw_search(&self, body: Value) -> Result<Value, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(body)
            .send()
            .await?;
        let response = check_response(response).await?;
        Ok(response.json::<Value>().await?)
    }
}

/// 非2xx响应转为错误 / turn a non-success response into an error
async fn check_response(response: Response) -> Result<Response, SearchError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SearchError::Engine(format!("status {}: {}", status, body)))
}

/// 从搜索响应中取出命中的商品 / extract hit sources from a search response
fn parse_hits(value: &Value) -> Result<Vec<Product>, SearchError> {
    let hits = match value["hits"]["hits"].as_array() {
        Some(hits) => hits,
        None => return Ok(Vec::new()),
    };

    let mut products = Vec::with_capacity(hits.len());
    for hit in hits {
        products.push(serde_json::from_value(hit["_source"].clone())?);
    }
    Ok(products)
}

/// 解析平均价格聚合桶 / parse the average-price terms buckets
fn parse_avg_price_buckets(value: &Value) -> HashMap<String, f64> {
    let mut result = HashMap::new();
    if let Some(buckets) = value["aggregations"]["by_category"]["buckets"].as_array() {
        for bucket in buckets {
            if let (Some(key), Some(avg)) = (
                bucket["key"].as_str(),
                bucket["avg_price"]["value"].as_f64(),
            ) {
                result.insert(key.to_string(), avg);
            }
        }
    }
    result
}

/// 解析分类计数聚合桶 / parse the per-category doc-count buckets
fn parse_count_buckets(value: &Value) -> HashMap<String, u64> {
    let mut result = HashMap::new();
    if let Some(buckets) = value["aggregations"]["by_category"]["buckets"].as_array() {
        for bucket in buckets {
            if let (Some(key), Some(count)) =
                (bucket["key"].as_str(), bucket["doc_count"].as_u64())
            {
                result.insert(key.to_string(), count);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hits() {
        let value = json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_id": "1", "_source": { "id": "1", "name": "Shoe", "category": "footwear", "price": 49.99, "inStock": true } },
                    { "_id": "2", "_source": { "id": "2", "name": "Boot", "category": "footwear", "price": 89.0, "inStock": false } }
                ]
            }
        });

        let products = parse_hits(&value).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Shoe");
        assert_eq!(products[1].id, "2");
        assert!(!products[1].in_stock);
    }

    #[test]
    fn test_parse_hits_empty_response() {
        let value = json!({ "hits": { "total": { "value": 0 }, "hits": [] } });
        assert!(parse_hits(&value).unwrap().is_empty());

        // 缺失hits字段时返回空列表
        let value = json!({});
        assert!(parse_hits(&value).unwrap().is_empty());
    }

    #[test]
    fn test_parse_avg_price_buckets() {
        let value = json!({
            "aggregations": {
                "by_category": {
                    "buckets": [
                        { "key": "footwear", "doc_count": 3, "avg_price": { "value": 59.97 } },
                        { "key": "furniture", "doc_count": 1, "avg_price": { "value": 199.0 } }
                    ]
                }
            }
        });

        let result = parse_avg_price_buckets(&value);
        assert_eq!(result.len(), 2);
        assert_eq!(result["footwear"], 59.97);
        assert_eq!(result["furniture"], 199.0);
    }

    #[test]
    fn test_parse_count_buckets() {
        let value = json!({
            "aggregations": {
                "by_category": {
                    "buckets": [
                        { "key": "footwear", "doc_count": 3 },
                        { "key": "furniture", "doc_count": 1 }
                    ]
                }
            }
        });

        let result = parse_count_buckets(&value);
        assert_eq!(result.len(), 2);
        assert_eq!(result["footwear"], 3);
        assert_eq!(result["furniture"], 1);
    }

    #[test]
    fn test_parse_buckets_missing_aggregations() {
        let value = json!({ "hits": { "hits": [] } });
        assert!(parse_avg_price_buckets(&value).is_empty());
        assert!(parse_count_buckets(&value).is_empty());
    }
}
