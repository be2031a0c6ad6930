use axum::{
    routing::{delete, get, post},
    Router,
};
use elasticsearch::http::transport::Transport;
use elasticsearch::Elasticsearch;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use state::AppState;
use yaoshop_backend::config;
use yaoshop_backend::search::ProductIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yaoshop_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().expect("Failed to load configuration");
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // 构造Elasticsearch客户端并注入索引句柄 / build the client once and inject it
    let es_url = app_config.get_elasticsearch_url();
    let transport = Transport::single_node(&es_url)?;
    let client = Elasticsearch::new(transport);
    let index = ProductIndex::new(client, app_config.elasticsearch.index.clone());

    // 启动时确保索引与字段映射就绪 / make sure the index and mappings exist
    index.ensure_index().await?;
    tracing::info!(
        "Elasticsearch index \"{}\" ready at {}",
        index.index_name(),
        es_url
    );

    let state = Arc::new(AppState { index });

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        .route("/api/products", post(api::products::create_product))
        .route("/api/products", get(api::products::list_products))
        .route("/api/products/bulk", post(api::products::bulk_save))
        .route("/api/products/name", get(api::products::get_by_name))
        .route("/api/products/inStock", get(api::products::get_by_in_stock))
        .route(
            "/api/products/query/range/search",
            get(api::products::range_search),
        )
        .route(
            "/api/products/query/wildCard/search",
            get(api::products::wildcard_search),
        )
        .route(
            "/api/products/query/fuzzy/search",
            get(api::products::fuzzy_search),
        )
        .route(
            "/api/products/query/multiMatch/search",
            get(api::products::multi_match_search),
        )
        .route(
            "/api/products/query/bool/search",
            get(api::products::bool_search),
        )
        .route(
            "/api/products/aggregations/metrics/averagePrice",
            get(api::products::average_price_per_category),
        )
        .route(
            "/api/products/aggregations/metrics/docCount",
            get(api::products::count_per_category),
        )
        .route("/api/products/:id", get(api::products::get_by_id))
        .route("/api/products/:id", delete(api::products::delete_by_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
