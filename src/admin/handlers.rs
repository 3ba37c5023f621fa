//! Admin API HTTP 处理器

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use super::{
    error::AdminServiceError,
    middleware::AdminState,
    types::{
        CreateUserRequest, CreateUserResponse, MessageResponse, NavigationRequest,
        NavigationResponse, UpdateUserRequest,
    },
};
use crate::session::{extract_bearer, navigation};

fn error_response(e: AdminServiceError) -> Response {
    (e.status_code(), Json(e.into_response())).into_response()
}

/// 请求体解析失败（缺字段、类型错误、非 JSON）统一返回 400
fn body_error(rejection: JsonRejection) -> Response {
    tracing::warn!("请求体无效: {}", rejection.body_text());
    error_response(AdminServiceError::InvalidRequest(rejection.body_text()))
}

/// 路径参数解析失败（如非法的百分号编码）同样返回 400 JSON
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, Response> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::warn!("路径参数无效: {}", rejection.body_text());
        error_response(AdminServiceError::InvalidRequest(rejection.body_text()))
    })
}

/// POST /api/create-user
/// 创建员工账号（身份 + 资料）
pub async fn create_user(
    State(state): State<AdminState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_error(rejection),
    };

    match state.service.create_user(payload).await {
        Ok(user) => Json(CreateUserResponse {
            message: "Usuario creado correctamente".to_string(),
            user,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/delete-user/:id
/// 停用账号（软删除）
pub async fn delete_user(
    State(state): State<AdminState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.deactivate_user(&id).await {
        Ok(()) => Json(MessageResponse::new("Usuario dado de baja correctamente")).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/update-user/:id
/// 编辑名称、角色、颜色
pub async fn update_user(
    State(state): State<AdminState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_error(rejection),
    };

    match state.service.update_profile(&id, payload).await {
        Ok(()) => Json(MessageResponse::new("Actualizado")).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/restore-user/:id
/// 恢复已停用的账号
pub async fn restore_user(
    State(state): State<AdminState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.restore_user(&id).await {
        Ok(()) => Json(MessageResponse::new("Usuario reactivado correctamente")).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/session
/// 返回服务端确认的会话上下文
pub async fn get_session(State(state): State<AdminState>, headers: HeaderMap) -> Response {
    match state.sessions.resolve_headers(&headers).await {
        Ok(session) => Json(session).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/navigation
/// 用服务端会话计算导航守卫结果，无效令牌按未登录处理
pub async fn check_navigation(
    State(state): State<AdminState>,
    headers: HeaderMap,
    payload: Result<Json<NavigationRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_error(rejection),
    };

    let session = match extract_bearer(&headers) {
        Some(token) => match state.sessions.resolve(&token).await {
            Ok(session) => Some(session),
            Err(AdminServiceError::Unauthenticated) => None,
            Err(e) => return error_response(e),
        },
        None => None,
    };

    let decision = navigation::guard(&payload.path, session.as_ref());
    Json(NavigationResponse {
        decision,
        route: navigation::match_route(&payload.path).map(|r| r.name),
    })
    .into_response()
}

/// GET /api/client-config
/// 前端所需的公开平台配置
pub async fn get_client_config(State(state): State<AdminState>) -> impl IntoResponse {
    Json(state.client_config.clone())
}
