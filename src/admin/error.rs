//! Admin API 错误类型

use axum::http::StatusCode;

use super::types::ErrorResponse;
use crate::platform::PlatformError;

/// Admin 服务错误
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    /// 请求体缺失、格式错误或必填字段为空
    #[error("{0}")]
    InvalidRequest(String),

    /// 上游调用失败，消息原样透传
    #[error(transparent)]
    Upstream(#[from] PlatformError),

    /// 生命周期多步操作中的某一步失败
    #[error("{action}: {source}")]
    Lifecycle {
        action: &'static str,
        #[source]
        source: PlatformError,
    },

    /// 缺少或无效的会话令牌
    #[error("Sesión no válida o ausente")]
    Unauthenticated,

    /// 会话有效但不是管理员
    #[error("Acceso denegado: Solo para administradores.")]
    Forbidden,
}

impl AdminServiceError {
    pub fn lifecycle(action: &'static str) -> impl FnOnce(PlatformError) -> Self {
        move |source| AdminServiceError::Lifecycle { action, source }
    }

    /// HTTP 状态码
    ///
    /// 四个管理接口的所有失败统一为 400
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminServiceError::InvalidRequest(_)
            | AdminServiceError::Upstream(_)
            | AdminServiceError::Lifecycle { .. } => StatusCode::BAD_REQUEST,
            AdminServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AdminServiceError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// 转换为 JSON 错误响应体
    pub fn into_response(self) -> ErrorResponse {
        ErrorResponse::new(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(message: &str) -> PlatformError {
        PlatformError::Upstream {
            status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = AdminServiceError::from(upstream("User already registered"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().error, "User already registered");
    }

    #[test]
    fn test_lifecycle_prefixes_action() {
        let err = AdminServiceError::lifecycle("No se pudo dar de baja")(upstream("User not found"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No se pudo dar de baja: User not found");
    }

    #[test]
    fn test_session_errors() {
        assert_eq!(
            AdminServiceError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AdminServiceError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert!(!AdminServiceError::Forbidden.into_response().error.is_empty());
    }
}
