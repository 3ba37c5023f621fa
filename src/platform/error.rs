//! 平台调用错误类型定义

use reqwest::StatusCode;

/// 平台调用错误
///
/// `Display` 即上游原始错误消息，调用方直接透传给前端
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// 上游返回非 2xx 状态
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// 网络或连接错误
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// 响应体无法解析
    #[error("无法解析平台响应: {0}")]
    Decode(String),
}

impl PlatformError {
    /// 从上游错误响应构造
    ///
    /// 平台不同组件的错误体字段不一致（GoTrue: `msg` / `error_description`，
    /// PostgREST: `message`），按顺序取第一个非空字符串
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("平台请求失败: {}", status)
            } else {
                trimmed.to_string()
            }
        });

        PlatformError::Upstream { status, message }
    }

    /// 上游状态码（仅 `Upstream` 有）
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PlatformError::Upstream { status, .. } => Some(*status),
            PlatformError::Transport(e) => e.status(),
            PlatformError::Decode(_) => None,
        }
    }

    /// 检查是否为"资源不存在"错误
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gotrue_error_body() {
        let body = r#"{"code":422,"error_code":"email_exists","msg":"A user with this email address has already been registered"}"#;
        let err = PlatformError::from_response_body(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            err.to_string(),
            "A user with this email address has already been registered"
        );
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[test]
    fn test_postgrest_error_body() {
        let body = r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value violates unique constraint \"profiles_pkey\""}"#;
        let err = PlatformError::from_response_body(StatusCode::CONFLICT, body);
        assert!(err.to_string().starts_with("duplicate key value"));
    }

    #[test]
    fn test_oauth_style_error_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let err = PlatformError::from_response_body(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn test_plain_text_and_empty_body() {
        let err = PlatformError::from_response_body(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.to_string(), "upstream down");

        let err = PlatformError::from_response_body(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_is_not_found() {
        let err = PlatformError::from_response_body(StatusCode::NOT_FOUND, r#"{"msg":"User not found"}"#);
        assert!(err.is_not_found());
        assert!(!PlatformError::Decode("x".to_string()).is_not_found());
    }
}
