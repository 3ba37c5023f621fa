//! 上游 HTTP 客户端构建

use std::time::Duration;

use reqwest::{Client, Proxy};

use crate::model::config::Config;

/// 代理配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// 从应用配置中读取代理设置（空字符串视为未配置）
    pub fn from_config(config: &Config) -> Option<Self> {
        let url = config.proxy_url.as_ref().filter(|u| !u.trim().is_empty())?;
        let mut proxy = Self::new(url);
        if let (Some(username), Some(password)) = (&config.proxy_username, &config.proxy_password)
        {
            proxy = proxy.with_auth(username, password);
        }
        Some(proxy)
    }
}

/// 构建 HTTP 客户端
///
/// `timeout` 为 `None` 时不设置整体超时，慢请求只会阻塞当前请求
pub fn build_client(proxy: Option<&ProxyConfig>, timeout: Option<Duration>) -> anyhow::Result<Client> {
    let mut builder = Client::builder().use_rustls_tls();

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_config) = proxy {
        let mut proxy = Proxy::all(&proxy_config.url)?;
        if let (Some(username), Some(password)) = (&proxy_config.username, &proxy_config.password)
        {
            proxy = proxy.basic_auth(username, password);
        }
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}
