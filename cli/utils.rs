//! CLI 公共工具

use std::sync::Arc;

use anyhow::{Context, Result};

use salon_admin::admin::{Reconciler, UserService};
use salon_admin::model::config::Config;
use salon_admin::platform::SupabaseClient;

/// 命令执行上下文
pub struct CliContext {
    pub platform: Arc<SupabaseClient>,
    pub service: UserService,
    pub reconciler: Reconciler,
}

/// 加载配置并连接平台
pub fn connect(config_path: &str, env_file: Option<&str>) -> Result<CliContext> {
    match env_file {
        Some(path) => {
            dotenvy::from_filename(path).with_context(|| format!("加载 {} 失败", path))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let config = Config::load_with_env(config_path)
        .with_context(|| format!("加载配置失败: {}", config_path))?;

    if let Err(errors) = config.validate() {
        anyhow::bail!("配置验证失败: {}", errors.join("; "));
    }

    let platform = Arc::new(SupabaseClient::from_config(&config)?);
    let service = UserService::new(platform.clone(), platform.clone(), &config.default_color)
        .with_compensation(config.compensate_orphaned_identity);
    let reconciler = Reconciler::new(platform.clone(), platform.clone());

    Ok(CliContext {
        platform,
        service,
        reconciler,
    })
}
