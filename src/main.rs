use clap::Parser;
use tracing::{error, info};

use table_query_builder::api::repl;
use table_query_builder::core::session::QuerySession;
use table_query_builder::infra::config::AppConfig;
use table_query_builder::infra::http::HttpBackend;
use table_query_builder::infra::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::parse();
    init_logging(config.verbose);

    let backend = HttpBackend::new(&config.api_url, config.timeout())?;
    let mut session = QuerySession::new();

    // 启动时拉取一次表清单；失败不退出，可用 tables 命令重试
    match session.load_tables(&backend).await {
        Ok(tables) => info!("后端 {} 可用，{} 张表", config.api_url, tables.len()),
        Err(e) => error!("无法连接后端 {}: {}", config.api_url, e),
    }

    println!("🚀 查询构建器已就绪，后端 {}（输入 help 查看命令）", config.api_url);
    repl::run(&mut session, &backend, &config.output_dir).await?;
    Ok(())
}
