//! 商品接口 / Product endpoints
//!
//! 每个路由只对应一次查询构造或一次索引原语调用，状态码在这里决定 / each route
//! maps to exactly one builder or facade call; status codes are decided here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::state::AppState;
use yaoshop_backend::models::Product;
use yaoshop_backend::search::{query, SearchError};

/// 引擎调用失败统一返回500 / map a facade error to a 500 response
fn engine_error(context: &str, err: SearchError) -> (StatusCode, Json<Value>) {
    tracing::error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "搜索引擎请求失败"})),
    )
}

/// POST /api/products - 创建商品
///
/// 写入失败不再吞掉，直接返回500 / write failures are surfaced instead of
/// being swallowed behind a 201.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(mut product): Json<Product>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<Value>)> {
    // 未提供ID时生成 / generate an id when the client did not assign one
    if product.id.is_empty() {
        product.id = Uuid::new_v4().to_string();
    }

    state
        .index
        .save(&product)
        .await
        .map_err(|e| engine_error("商品写入失败", e))?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// POST /api/products/bulk - 批量创建商品
pub async fn bulk_save(
    State(state): State<Arc<AppState>>,
    Json(mut products): Json<Vec<Product>>,
) -> Result<(StatusCode, Json<Vec<Product>>), (StatusCode, Json<Value>)> {
    for product in products.iter_mut() {
        if product.id.is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
    }

    state
        .index
        .bulk_save(&products)
        .await
        .map_err(|e| engine_error("商品批量写入失败", e))?;

    Ok((StatusCode::CREATED, Json(products)))
}

/// GET /api/products/:id - 按ID查询
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, (StatusCode, Json<Value>)> {
    let product = state
        .index
        .find_by_id(&id)
        .await
        .map_err(|e| engine_error("商品查询失败", e))?
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "商品不存在"}))))?;

    Ok(Json(product))
}

/// GET /api/products - 查询全部商品
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .find_all()
        .await
        .map_err(|e| engine_error("商品列表查询失败", e))?;

    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

/// GET /api/products/name?name= - 按名称分词匹配
pub async fn get_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::name_match(&params.name))
        .await
        .map_err(|e| engine_error("名称查询失败", e))?;

    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InStockQuery {
    pub in_stock: bool,
}

/// GET /api/products/inStock?inStock= - 按是否有货过滤
pub async fn get_by_in_stock(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InStockQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::in_stock_term(params.in_stock))
        .await
        .map_err(|e| engine_error("库存过滤查询失败", e))?;

    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeQuery {
    pub min_price: Decimal,
    pub max_price: Decimal,
}

/// GET /api/products/query/range/search?minPrice=&maxPrice= - 价格区间查询
pub async fn range_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PriceRangeQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::price_range(params.min_price, params.max_price))
        .await
        .map_err(|e| engine_error("价格区间查询失败", e))?;

    Ok(Json(products))
}

/// GET /api/products/query/wildCard/search?name= - 名称前缀查询
///
/// 只返回商品名称，最多5条 / returns product names only, capped at five.
pub async fn wildcard_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::name_wildcard(&params.name))
        .await
        .map_err(|e| engine_error("通配符查询失败", e))?;

    let names = products.into_iter().map(|p| p.name).collect();
    Ok(Json(names))
}

/// GET /api/products/query/fuzzy/search?name= - 名称模糊查询
pub async fn fuzzy_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::name_fuzzy(&params.name))
        .await
        .map_err(|e| engine_error("模糊查询失败", e))?;

    Ok(Json(products))
}

/// GET /api/products/query/multiMatch/search?name= - 跨字段匹配查询
pub async fn multi_match_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::multi_match(&params.name))
        .await
        .map_err(|e| engine_error("跨字段查询失败", e))?;

    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoolSearchQuery {
    pub category: String,
    pub price: Decimal,
    pub in_stock: bool,
}

/// GET /api/products/query/bool/search?category=&price=&inStock= - 组合查询
pub async fn bool_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoolSearchQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state
        .index
        .search(query::bool_combination(
            &params.category,
            params.price,
            params.in_stock,
        ))
        .await
        .map_err(|e| engine_error("组合查询失败", e))?;

    Ok(Json(products))
}

/// GET /api/products/aggregations/metrics/averagePrice - 分类平均价格
pub async fn average_price_per_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HashMap<String, f64>>, (StatusCode, Json<Value>)> {
    let result = state
        .index
        .average_price_per_category()
        .await
        .map_err(|e| engine_error("平均价格聚合失败", e))?;

    Ok(Json(result))
}

/// GET /api/products/aggregations/metrics/docCount - 分类商品数
pub async fn count_per_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HashMap<String, u64>>, (StatusCode, Json<Value>)> {
    let result = state
        .index
        .count_per_category()
        .await
        .map_err(|e| engine_error("分类计数聚合失败", e))?;

    Ok(Json(result))
}

/// DELETE /api/products/:id - 按ID删除
///
/// 先查询再删除，用于决定404还是204 / the lookup exists purely to pick the
/// status code.
pub async fn delete_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let existing = state
        .index
        .find_by_id(&id)
        .await
        .map_err(|e| engine_error("商品查询失败", e))?;

    if existing.is_none() {
        return Err((StatusCode::NOT_FOUND, Json(json!({"error": "商品不存在"}))));
    }

    state
        .index
        .delete_by_id(&id)
        .await
        .map_err(|e| engine_error("商品删除失败", e))?;

    Ok(StatusCode::NO_CONTENT)
}
