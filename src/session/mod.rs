//! 会话上下文
//!
//! 角色不信任客户端缓存：每次请求都用 access token 向平台确认身份，
//! 再读取该身份的资料得到角色与 active 状态。

pub mod navigation;

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode, header};
use serde::Serialize;

use crate::admin::error::AdminServiceError;
use crate::admin::types::Role;
use crate::platform::{IdentityAdmin, PlatformError, ProfileStore};

/// 服务端确认过的会话
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: String,
    pub email: Option<String>,
    /// 资料中的角色，没有资料时为 `None`
    pub role: Option<String>,
    pub active: bool,
}

impl SessionContext {
    /// 已停用的账号不享有管理员权限
    pub fn is_admin(&self) -> bool {
        self.active && self.role.as_deref().and_then(Role::parse) == Some(Role::Admin)
    }
}

/// 从请求头提取 Bearer token
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// 平台明确拒绝了令牌（而不是平台本身不可用）
fn is_rejected_token(e: &PlatformError) -> bool {
    matches!(
        e.status(),
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
    )
}

/// 会话解析器
pub struct SessionResolver {
    identities: Arc<dyn IdentityAdmin>,
    profiles: Arc<dyn ProfileStore>,
}

impl SessionResolver {
    pub fn new(identities: Arc<dyn IdentityAdmin>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            identities,
            profiles,
        }
    }

    /// 解析 access token 对应的会话
    pub async fn resolve(&self, access_token: &str) -> Result<SessionContext, AdminServiceError> {
        let identity = self
            .identities
            .identity_for_token(access_token)
            .await
            .map_err(|e| {
                if is_rejected_token(&e) {
                    tracing::debug!("会话令牌校验失败: {}", e);
                    AdminServiceError::Unauthenticated
                } else {
                    tracing::error!("会话解析失败: {}", e);
                    AdminServiceError::Upstream(e)
                }
            })?;

        let profile = self.profiles.get_profile(&identity.id).await?;

        Ok(SessionContext {
            user_id: identity.id,
            email: identity.email,
            role: profile.as_ref().map(|p| p.role.clone()),
            active: profile.is_some_and(|p| p.is_active),
        })
    }

    /// 从请求头解析会话，没有令牌时返回 `Unauthenticated`
    pub async fn resolve_headers(
        &self,
        headers: &HeaderMap,
    ) -> Result<SessionContext, AdminServiceError> {
        let token = extract_bearer(headers).ok_or(AdminServiceError::Unauthenticated)?;
        self.resolve(&token).await
    }

    /// 要求管理员会话
    pub async fn require_admin(
        &self,
        headers: &HeaderMap,
    ) -> Result<SessionContext, AdminServiceError> {
        let session = self.resolve_headers(headers).await?;
        if !session.is_admin() {
            tracing::warn!("非管理员尝试访问管理接口: {}", session.user_id);
            return Err(AdminServiceError::Forbidden);
        }
        Ok(session)
    }
}
