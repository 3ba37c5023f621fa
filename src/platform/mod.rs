//! 外部身份与数据平台（Supabase）
//!
//! 两个抽象边界：
//! - [`IdentityAdmin`]：身份管理（创建账号、封禁/解封、按 access token 查询）
//! - [`ProfileStore`]：`profiles` 表的行级读写
//!
//! [`SupabaseClient`] 同时实现两者，测试使用 `memory` 模块中的内存实现。

mod auth_admin;
mod client;
pub mod error;
#[cfg(test)]
pub mod memory;
mod profiles;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::SupabaseClient;
pub use error::PlatformError;

/// 停用时的封禁时长（约 100 年，视为永久）
pub const PERMANENT_BAN_DURATION: &str = "876600h";

/// 恢复时的封禁时长（清除封禁）
pub const LIFT_BAN_DURATION: &str = "0s";

/// 平台身份记录
///
/// 只解析业务需要的字段，其余字段原样保留在 `extra` 中，
/// 以便创建接口把完整的身份记录返回给调用方
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    /// 在给定时刻是否处于封禁状态
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        self.banned_until.is_some_and(|until| until > now)
    }

    pub fn is_banned(&self) -> bool {
        self.is_banned_at(Utc::now())
    }
}

/// 创建身份请求
#[derive(Debug, Clone, Serialize)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    /// 直接确认邮箱，员工无需验证即可登录
    pub email_confirm: bool,
}

/// 封禁时长
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanDuration {
    /// 长期封禁（停用）
    Permanent,
    /// 解除封禁（恢复）
    Lift,
}

impl BanDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            BanDuration::Permanent => PERMANENT_BAN_DURATION,
            BanDuration::Lift => LIFT_BAN_DURATION,
        }
    }

    /// 根据资料的 active 标志推导应有的封禁状态
    pub fn for_active(active: bool) -> Self {
        if active {
            BanDuration::Lift
        } else {
            BanDuration::Permanent
        }
    }
}

/// 员工资料行（`profiles` 表）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// 与身份 ID 相同
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub role: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub color: String,
    /// 数据库默认值为 true，插入时不显式写入；缺失或为 null 时视为启用
    #[serde(
        default = "default_active",
        deserialize_with = "nullable_active",
        skip_serializing
    )]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_active))
}

/// 资料部分更新，`None` 字段不写入
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ProfilePatch {
    pub fn active(active: bool) -> Self {
        Self {
            is_active: Some(active),
            ..Self::default()
        }
    }
}

/// 身份管理 API
#[async_trait]
pub trait IdentityAdmin: Send + Sync {
    /// 创建身份
    async fn create_identity(&self, request: &NewIdentity) -> Result<Identity, PlatformError>;

    /// 按 ID 查询身份
    async fn get_identity(&self, id: &str) -> Result<Identity, PlatformError>;

    /// 设置封禁时长
    async fn set_ban_duration(&self, id: &str, duration: BanDuration)
    -> Result<Identity, PlatformError>;

    /// 删除身份（仅用于补偿）
    async fn delete_identity(&self, id: &str) -> Result<(), PlatformError>;

    /// 用终端用户的 access token 查询其身份
    async fn identity_for_token(&self, access_token: &str) -> Result<Identity, PlatformError>;
}

/// `profiles` 表读写
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn insert_profile(&self, profile: &Profile) -> Result<(), PlatformError>;

    /// 按主键更新；行不存在时上游不报错
    async fn update_profile(&self, id: &str, patch: &ProfilePatch) -> Result<(), PlatformError>;

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, PlatformError>;

    async fn list_profiles(&self) -> Result<Vec<Profile>, PlatformError>;
}
