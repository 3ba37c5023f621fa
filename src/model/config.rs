use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 新建员工未指定颜色时使用的 UI 颜色
pub const DEFAULT_PROFILE_COLOR: &str = "#3B82F6";

/// 沙龙 Admin API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Supabase 项目地址（服务端，密钥级）
    #[serde(default)]
    pub supabase_url: String,

    /// Supabase service_role 密钥（绝不能下发到浏览器）
    #[serde(default)]
    pub supabase_service_role_key: String,

    /// 前端使用的公开项目地址（可选，未配置时回退到 supabaseUrl）
    #[serde(default)]
    pub public_supabase_url: Option<String>,

    /// 前端使用的 anon 公钥（可选）
    #[serde(default)]
    pub public_anon_key: Option<String>,

    /// 允许的跨域来源，为空时允许任意来源
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// 新建员工的默认颜色
    #[serde(default = "default_color")]
    pub default_color: String,

    /// 管理接口是否要求管理员会话（Authorization: Bearer <access_token>）
    #[serde(default)]
    pub require_admin_session: bool,

    /// 资料写入失败时删除刚创建的身份，避免孤儿账号
    #[serde(default = "default_compensate_orphaned_identity")]
    pub compensate_orphaned_identity: bool,

    /// 启动时执行一次一致性检查
    #[serde(default)]
    pub reconcile_on_startup: bool,

    /// 周期性一致性检查间隔（秒，未配置时不启用）
    #[serde(default)]
    pub reconcile_interval_secs: Option<u64>,

    /// 上游请求超时（秒，未配置时使用 HTTP 客户端默认行为）
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,

    /// HTTP 代理地址（可选）
    /// 支持格式: http://host:port, https://host:port, socks5://host:port
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// 代理认证用户名（可选）
    #[serde(default)]
    pub proxy_username: Option<String>,

    /// 代理认证密码（可选）
    #[serde(default)]
    pub proxy_password: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_color() -> String {
    DEFAULT_PROFILE_COLOR.to_string()
}

fn default_compensate_orphaned_identity() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            supabase_url: String::new(),
            supabase_service_role_key: String::new(),
            public_supabase_url: None,
            public_anon_key: None,
            cors_origins: Vec::new(),
            default_color: default_color(),
            require_admin_session: false,
            compensate_orphaned_identity: default_compensate_orphaned_identity(),
            reconcile_on_startup: false,
            reconcile_interval_secs: None,
            upstream_timeout_secs: None,
            proxy_url: None,
            proxy_username: None,
            proxy_password: None,
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config/config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置（通常完全依赖环境变量）
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置文件后叠加进程环境变量
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 抽象出来便于测试，生产环境传入 `std::env::var`
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("HOST") {
            self.host = v;
        }
        if let Some(v) = get("PORT") {
            self.port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT 无效: {} ({})", v, e))?;
        }
        if let Some(v) = get("SUPABASE_URL") {
            self.supabase_url = v;
        }
        if let Some(v) = get("SUPABASE_SERVICE_ROLE_KEY") {
            self.supabase_service_role_key = v;
        }
        if let Some(v) = get("VITE_SUPABASE_URL") {
            self.public_supabase_url = Some(v);
        }
        if let Some(v) = get("VITE_SUPABASE_ANON_KEY") {
            self.public_anon_key = Some(v);
        }
        if let Some(v) = get("CORS_ORIGINS") {
            self.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = get("DEFAULT_COLOR") {
            self.default_color = v;
        }
        if let Some(v) = get("REQUIRE_ADMIN_SESSION") {
            self.require_admin_session = parse_bool("REQUIRE_ADMIN_SESSION", &v)?;
        }
        if let Some(v) = get("COMPENSATE_ORPHANED_IDENTITY") {
            self.compensate_orphaned_identity = parse_bool("COMPENSATE_ORPHANED_IDENTITY", &v)?;
        }
        if let Some(v) = get("RECONCILE_ON_STARTUP") {
            self.reconcile_on_startup = parse_bool("RECONCILE_ON_STARTUP", &v)?;
        }
        if let Some(v) = get("RECONCILE_INTERVAL_SECS") {
            self.reconcile_interval_secs = Some(parse_u64("RECONCILE_INTERVAL_SECS", &v)?);
        }
        if let Some(v) = get("UPSTREAM_TIMEOUT_SECS") {
            self.upstream_timeout_secs = Some(parse_u64("UPSTREAM_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("PROXY_URL") {
            self.proxy_url = Some(v);
        }

        Ok(())
    }

    /// 前端可见的项目地址
    pub fn client_supabase_url(&self) -> &str {
        self.public_supabase_url
            .as_deref()
            .unwrap_or(&self.supabase_url)
    }

    /// 验证配置有效性
    ///
    /// 检查必填字段和格式是否正确，一次性返回全部问题
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push("host 不能为空".to_string());
        }

        if self.port == 0 {
            errors.push("port 不能为 0".to_string());
        }

        if self.supabase_url.trim().is_empty() {
            errors.push("SUPABASE_URL 未配置".to_string());
        } else if !self.supabase_url.starts_with("http://")
            && !self.supabase_url.starts_with("https://")
        {
            errors.push(format!(
                "SUPABASE_URL 格式不正确: {}，应以 http:// 或 https:// 开头",
                self.supabase_url
            ));
        }

        if self.supabase_service_role_key.trim().is_empty() {
            errors.push("SUPABASE_SERVICE_ROLE_KEY 未配置".to_string());
        }

        if self.default_color.trim().is_empty() {
            errors.push("defaultColor 不能为空".to_string());
        }

        for origin in &self.cors_origins {
            if http::HeaderValue::from_str(origin).is_err() {
                errors.push(format!("corsOrigins 包含无效来源: {}", origin));
            }
        }

        if let Some(ref proxy_url) = self.proxy_url {
            if !proxy_url.is_empty()
                && !proxy_url.starts_with("http://")
                && !proxy_url.starts_with("https://")
                && !proxy_url.starts_with("socks5://")
            {
                errors.push(format!(
                    "proxyUrl 格式不正确: {}，应以 http://、https:// 或 socks5:// 开头",
                    proxy_url
                ));
            }
        }

        if self.reconcile_interval_secs == Some(0) {
            errors.push("reconcileIntervalSecs 不能为 0".to_string());
        }

        if self.upstream_timeout_secs == Some(0) {
            errors.push("upstreamTimeoutSecs 不能为 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} 无效: {}，应为 true 或 false", key, other),
    }
}

fn parse_u64(key: &str, value: &str) -> anyhow::Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} 无效: {} ({})", key, value, e))
}
