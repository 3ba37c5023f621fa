use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::PlatformError;
use crate::http_client::{ProxyConfig, build_client};
use crate::model::config::Config;

/// Supabase 管理客户端
///
/// 持有 service_role 密钥，所有请求都以最高权限发出
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"***")
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(http: Client, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            service_key: service_key.into(),
        }
    }

    /// 根据应用配置构建（代理、超时）
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let proxy = ProxyConfig::from_config(config);
        let timeout = config.upstream_timeout_secs.map(Duration::from_secs);
        let http = build_client(proxy.as_ref(), timeout)?;
        Ok(Self::new(
            http,
            &config.supabase_url,
            &config.supabase_service_role_key,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 以 service_role 身份发起的请求
    pub(super) fn admin_request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// 以终端用户 access token 发起的请求（apikey 仍需携带）
    pub(super) fn user_request(
        &self,
        method: reqwest::Method,
        path: &str,
        access_token: &str,
    ) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.service_key)
            .bearer_auth(access_token)
    }
}

/// 非 2xx 响应转换为 [`PlatformError::Upstream`]
pub(super) async fn check_status(response: Response) -> Result<Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PlatformError::from_response_body(status, &body))
}

/// 检查状态并解析 JSON 响应体
pub(super) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| PlatformError::Decode(e.to_string()))
}
