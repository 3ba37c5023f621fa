//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::platform::Identity;
use crate::session::navigation::NavigationDecision;

// ============ 角色 ============

/// 已知的员工角色
///
/// 资料表中的角色以字符串存储，这里只用于识别，不做强制校验
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// 管理员
    Admin,
    /// 普通员工
    Employee,
}

impl Role {
    /// 识别角色字符串，未知值返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

// ============ 请求 ============

/// 创建员工账号请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    /// 显示名称
    pub name: String,
    /// 'admin' 或 'employee'
    pub role: String,
    /// UI 颜色（可选，未提供时使用默认颜色）
    #[serde(default)]
    pub color: Option<String>,
}

/// 编辑员工资料请求
///
/// 三个字段都必须提供，不存在部分更新
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub role: String,
    pub color: String,
}

/// 导航检查请求
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationRequest {
    /// 目标路径，例如 `/equipo`
    pub path: String,
}

// ============ 响应 ============

/// 创建成功响应
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    /// 平台返回的完整身份记录
    pub user: Identity,
}

/// 操作成功响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 导航检查响应
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    #[serde(flatten)]
    pub decision: NavigationDecision,
    /// 匹配到的路由名称
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<&'static str>,
}

/// 前端公开配置
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub supabase_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_anon_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_create_request_color_optional() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"secret123","name":"Ana","role":"employee"}"#,
        )
        .unwrap();
        assert!(req.color.is_none());
    }

    #[test]
    fn test_update_request_requires_all_fields() {
        let result: Result<UpdateUserRequest, _> =
            serde_json::from_str(r#"{"name":"Ana","role":"employee"}"#);
        assert!(result.is_err());
    }
}
