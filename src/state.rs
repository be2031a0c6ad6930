use yaoshop_backend::search::ProductIndex;

/// 应用共享状态 / Shared application state
///
/// 索引句柄在启动时构造并注入，请求处理无额外状态 / the index handle is built
/// once at startup and injected; request handling itself is stateless.
pub struct AppState {
    pub index: ProductIndex,
}
