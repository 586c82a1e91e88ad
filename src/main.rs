use receiving_reconciler::service::sinks_for;
use receiving_reconciler::{api, AppConfig, BatchProcessor, Reconciler};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    // 对账服务与下游
    let processor = BatchProcessor::new(Reconciler::new(config.reconcile.exhausted_line_policy));
    let sinks = sinks_for(
        &config.output.dir,
        config.output.write_json,
        config.output.write_manifest,
    );
    info!(
        "Exhausted line policy: {:?}, output dir: {} ({} sinks)",
        processor.reconciler().policy(),
        config.output.dir.display(),
        sinks.len()
    );

    let app = api::router(api::AppState::new(processor, sinks));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/reconcile         - reconcile one batch");
    info!("  POST /api/reconcile/labels  - reconcile and return label manifest");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
