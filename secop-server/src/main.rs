//! SECOP服务器主程序

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use secop_database::{DatabasePool, SubmissionRepository};
use secop_funnel::TempSubmissionStore;
use secop_integration::FanoutNotifier;
use secop_web::{AppState, WebServer};
use tracing::{error, info};

use crate::config::SecopConfig;

/// SECOP服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "secop-server")]
#[command(about = "SECOP (Second Opinion Platform) 病例提交服务器")]
struct Args {
    /// 监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 数据库连接字符串
    #[arg(short, long)]
    database_url: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .init();

    info!("启动SECOP服务器...");

    // 加载配置，命令行参数优先
    let mut config = SecopConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    info!("SECOP服务器配置:");
    info!("  监听地址: {}:{}", config.server.host, config.server.port);
    info!("  数据库最大连接数: {}", config.database.max_connections);
    info!("  临时提交保留: {}分钟", config.funnel.retention_minutes);

    // 建立数据库连接并引导表结构
    let pool = DatabasePool::connect(&config.database.url, config.database.max_connections).await?;
    let repository = Arc::new(SubmissionRepository::new(pool));
    repository.create_tables().await?;

    // 临时提交存储与过期清理
    let temp_store = Arc::new(TempSubmissionStore::new(chrono::Duration::minutes(
        config.funnel.retention_minutes,
    )));
    TempSubmissionStore::spawn_gc(
        Arc::clone(&temp_store),
        std::time::Duration::from_secs(config.funnel.gc_interval_secs),
    );

    // 下游扇出通知器
    let notifier = Arc::new(FanoutNotifier::new(config.integration.clone()));

    let state = AppState::new(repository, notifier, temp_store);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let server = WebServer::new(addr, state);
    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e.into());
    }

    Ok(())
}
