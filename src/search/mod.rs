//! Search module - Elasticsearch facade for the product index / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - query builders only translate parameters, they never perform I/O
//! - the facade ([`ProductIndex`]) only exposes primitive operations:
//!   save, bulk_save, find, delete, search, aggregate
//! - Call direction: API handlers → Search (unidirectional) / 调用方向
//!
//! 查询构造与索引 Schema 分离，便于单独测试 / query construction and the
//! index schema are kept separate so both stay unit-testable.

pub mod index;
pub mod query;
pub mod schema;

pub use index::ProductIndex;

use thiserror::Error;

/// 搜索引擎调用错误 / Errors surfaced by the search facade
///
/// 写入失败同样通过该类型上抛，不做静默处理 / write failures travel through
/// this type as well instead of being silently dropped.
#[derive(Debug, Error)]
pub enum SearchError {
    /// 请求未能到达引擎 / the request never reached the engine
    #[error("elasticsearch request failed: {0}")]
    Transport(#[from] elasticsearch::Error),
    /// 引擎返回错误状态码 / the engine rejected the request
    #[error("elasticsearch returned an error response: {0}")]
    Engine(String),
    /// 响应体无法解析 / the response body could not be decoded
    #[error("failed to decode elasticsearch response: {0}")]
    Decode(#[from] serde_json::Error),
}
