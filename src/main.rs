use std::sync::Arc;

use clap::Parser;
use salon_admin::admin::{self, AdminState};
use salon_admin::model::arg::Args;
use salon_admin::model::config::Config;
use salon_admin::platform::SupabaseClient;

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 加载 .env（不存在时忽略）
    match args.env_file.as_deref() {
        Some(path) => {
            if let Err(e) = dotenvy::from_filename(path) {
                tracing::warn!("加载 {} 失败: {}", path, e);
            }
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    // 加载配置：配置文件（可选）+ 环境变量
    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let config = Config::load_with_env(&config_path).unwrap_or_else(|e| {
        tracing::error!("加载配置失败: {}", e);
        std::process::exit(1);
    });

    // 验证配置
    if let Err(errors) = config.validate() {
        tracing::error!("配置验证失败:");
        for error in &errors {
            tracing::error!("  - {}", error);
        }
        std::process::exit(1);
    }

    if config.proxy_url.is_some() {
        tracing::info!("已配置 HTTP 代理");
    }

    let platform = SupabaseClient::from_config(&config).unwrap_or_else(|e| {
        tracing::error!("创建平台客户端失败: {}", e);
        std::process::exit(1);
    });
    tracing::info!("Supabase 项目: {}", platform.base_url());

    let state = AdminState::new(Arc::new(platform), &config);

    if config.reconcile_on_startup {
        tracing::info!("启动时执行一致性检查");
        if let Err(e) = state.reconciler.run().await {
            tracing::warn!("启动一致性检查失败: {}", e);
        }
    }

    if let Some(interval_secs) = config.reconcile_interval_secs {
        tracing::info!("定期一致性检查已启用: 每 {} 秒", interval_secs);
        let _reconcile_task = admin::start_reconcile_task(state.reconciler.clone(), interval_secs);
    }

    if config.require_admin_session {
        tracing::info!("管理接口需要管理员会话");
    } else {
        tracing::warn!("管理接口未启用会话校验 (requireAdminSession=false)");
    }

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: 允许任意来源");
    } else {
        tracing::info!("CORS: {}", config.cors_origins.join(", "));
    }

    let app = admin::create_router(state, &config.cors_origins);

    // 启动服务器
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("启动服务: http://{}", addr);
    tracing::info!("可用 API:");
    tracing::info!("  POST   /api/create-user");
    tracing::info!("  DELETE /api/delete-user/:id");
    tracing::info!("  PUT    /api/update-user/:id");
    tracing::info!("  PUT    /api/restore-user/:id");
    tracing::info!("  GET    /api/session");
    tracing::info!("  POST   /api/navigation");
    tracing::info!("  GET    /api/client-config");
    tracing::info!("  GET    /health");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("监听 {} 失败: {}", addr, e);
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("服务异常退出: {}", e);
        std::process::exit(1);
    }
}
