//! Admin API 路由配置

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use super::{
    handlers::{
        check_navigation, create_user, delete_user, get_client_config, get_session, restore_user,
        update_user,
    },
    middleware::{AdminState, admin_session_middleware, cors_layer},
};
use crate::health::{HealthCheckState, health_check};

/// 创建应用路由
///
/// # 端点
///
/// ## 账号生命周期
/// - `POST /api/create-user` - 创建员工账号
/// - `DELETE /api/delete-user/{id}` - 停用账号（软删除）
/// - `PUT /api/update-user/{id}` - 编辑名称、角色、颜色
/// - `PUT /api/restore-user/{id}` - 恢复账号
///
/// ## 会话
/// - `GET /api/session` - 服务端确认的会话上下文
/// - `POST /api/navigation` - 导航守卫检查
/// - `GET /api/client-config` - 前端公开配置
///
/// ## 其他
/// - `GET /health` - 健康检查
///
/// # 认证
/// 启用 `requireAdminSession` 后生命周期接口需要
/// `Authorization: Bearer <access_token>`，且该用户必须是启用状态的管理员
pub fn create_router(state: AdminState, cors_origins: &[String]) -> Router {
    let lifecycle_routes = Router::new()
        .route("/create-user", post(create_user))
        .route("/delete-user/{id}", delete(delete_user))
        .route("/update-user/{id}", put(update_user))
        .route("/restore-user/{id}", put(restore_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_session_middleware,
        ));

    let session_routes = Router::new()
        .route("/session", get(get_session))
        .route("/navigation", post(check_navigation))
        .route("/client-config", get(get_client_config));

    let health_state = Arc::new(HealthCheckState::new(state.reconciler.clone()));

    Router::new()
        .route("/health", get(health_check))
        .with_state(health_state)
        .nest("/api", lifecycle_routes.merge(session_routes))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
