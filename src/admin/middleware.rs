//! Admin API 共享状态与中间件

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::reconcile::Reconciler;
use super::service::UserService;
use super::types::ClientConfigResponse;
use crate::model::config::Config;
use crate::platform::{IdentityAdmin, ProfileStore};
use crate::session::SessionResolver;

/// Admin API 共享状态
#[derive(Clone)]
pub struct AdminState {
    /// 账号生命周期服务
    pub service: Arc<UserService>,
    /// 会话解析器
    pub sessions: Arc<SessionResolver>,
    /// 一致性检查器
    pub reconciler: Arc<Reconciler>,
    /// 管理接口是否要求管理员会话
    pub require_admin_session: bool,
    /// 前端公开配置
    pub client_config: ClientConfigResponse,
}

impl AdminState {
    /// 用同一个平台实现构建全部组件
    pub fn new<P>(platform: Arc<P>, config: &Config) -> Self
    where
        P: IdentityAdmin + ProfileStore + 'static,
    {
        let service = UserService::new(platform.clone(), platform.clone(), &config.default_color)
            .with_compensation(config.compensate_orphaned_identity);

        Self {
            service: Arc::new(service),
            sessions: Arc::new(SessionResolver::new(platform.clone(), platform.clone())),
            reconciler: Arc::new(Reconciler::new(platform.clone(), platform)),
            require_admin_session: config.require_admin_session,
            client_config: ClientConfigResponse {
                supabase_url: config.client_supabase_url().to_string(),
                supabase_anon_key: config.public_anon_key.clone(),
            },
        }
    }
}

/// 管理员会话中间件
///
/// 未启用 `require_admin_session` 时直接放行
pub async fn admin_session_middleware(
    State(state): State<AdminState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.require_admin_session {
        return next.run(request).await;
    }

    let session = state.sessions.require_admin(request.headers()).await;
    match session {
        Ok(session) => {
            tracing::debug!("管理员 {} 调用 {}", session.user_id, request.uri().path());
            next.run(request).await
        }
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// CORS 中间件层
///
/// `origins` 为空或包含 `*` 时允许任意来源
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
