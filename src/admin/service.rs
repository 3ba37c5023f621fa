//! 员工账号生命周期服务
//!
//! 每个操作都是最多两步的顺序上游调用，无重试、无事务：
//! - 创建：身份 → 资料（资料失败时可选删除身份作为补偿）
//! - 停用：资料 is_active=false → 长期封禁
//! - 恢复：资料 is_active=true → 解除封禁
//! - 编辑：只改资料的 full_name / role / color

use std::sync::Arc;

use super::error::AdminServiceError;
use super::types::{CreateUserRequest, Role, UpdateUserRequest};
use crate::platform::{
    BanDuration, Identity, IdentityAdmin, NewIdentity, Profile, ProfilePatch, ProfileStore,
};

const DEACTIVATE_ACTION: &str = "No se pudo dar de baja";
const RESTORE_ACTION: &str = "No se pudo restaurar";

/// 用户 ID 必须是 UUID，避免拼接进上游路径时被篡改
///
/// HTTP 与 CLI 两个入口共用
pub fn parse_user_id(id: &str) -> Result<String, AdminServiceError> {
    uuid::Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| AdminServiceError::InvalidRequest(format!("ID de usuario no válido: {}", id)))
}

/// 账号生命周期服务
pub struct UserService {
    identities: Arc<dyn IdentityAdmin>,
    profiles: Arc<dyn ProfileStore>,
    default_color: String,
    compensate_orphaned_identity: bool,
}

impl UserService {
    pub fn new(
        identities: Arc<dyn IdentityAdmin>,
        profiles: Arc<dyn ProfileStore>,
        default_color: impl Into<String>,
    ) -> Self {
        Self {
            identities,
            profiles,
            default_color: default_color.into(),
            compensate_orphaned_identity: true,
        }
    }

    /// 设置资料写入失败时是否删除刚创建的身份
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate_orphaned_identity = enabled;
        self
    }

    /// 创建员工账号
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<Identity, AdminServiceError> {
        require_non_empty("email", &req.email)?;
        require_non_empty("password", &req.password)?;
        require_non_empty("name", &req.name)?;
        require_non_empty("role", &req.role)?;
        warn_unknown_role(&req.role);

        tracing::info!("创建用户: {} ({})", req.email, req.role);

        let identity = self
            .identities
            .create_identity(&NewIdentity {
                email: req.email.clone(),
                password: req.password,
                email_confirm: true,
            })
            .await
            .inspect_err(|e| tracing::error!("创建身份失败: {}", e))?;

        let color = req
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.default_color.clone());

        let profile = Profile {
            id: identity.id.clone(),
            email: req.email,
            full_name: req.name,
            role: req.role,
            color,
            is_active: true,
        };

        if let Err(e) = self.profiles.insert_profile(&profile).await {
            tracing::error!("写入资料失败: {} (身份 {})", e, identity.id);
            self.compensate(&identity.id).await;
            return Err(e.into());
        }

        tracing::info!("用户创建成功: {}", identity.id);
        Ok(identity)
    }

    /// 删除资料写入失败后遗留的身份
    async fn compensate(&self, id: &str) {
        if !self.compensate_orphaned_identity {
            tracing::warn!("身份 {} 已成为孤儿账号（未启用补偿）", id);
            return;
        }

        match self.identities.delete_identity(id).await {
            Ok(()) => tracing::info!("已删除孤儿身份: {}", id),
            Err(e) => tracing::error!("删除孤儿身份 {} 失败: {}", id, e),
        }
    }

    /// 停用账号（软删除）
    ///
    /// 先隐藏资料，再封禁身份；封禁失败时资料已是停用状态
    pub async fn deactivate_user(&self, id: &str) -> Result<(), AdminServiceError> {
        let id = parse_user_id(id)?;
        tracing::info!("停用用户: {}", id);
        self.set_lifecycle(&id, false, DEACTIVATE_ACTION).await
    }

    /// 恢复账号
    pub async fn restore_user(&self, id: &str) -> Result<(), AdminServiceError> {
        let id = parse_user_id(id)?;
        tracing::info!("恢复用户: {}", id);
        self.set_lifecycle(&id, true, RESTORE_ACTION).await
    }

    async fn set_lifecycle(
        &self,
        id: &str,
        active: bool,
        action: &'static str,
    ) -> Result<(), AdminServiceError> {
        self.profiles
            .update_profile(id, &ProfilePatch::active(active))
            .await
            .inspect_err(|e| tracing::error!("{}: 更新资料失败: {}", action, e))
            .map_err(AdminServiceError::lifecycle(action))?;

        self.identities
            .set_ban_duration(id, BanDuration::for_active(active))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "{}: 资料已更新但封禁状态未同步 ({}): {}",
                    action,
                    id,
                    e
                )
            })
            .map_err(AdminServiceError::lifecycle(action))?;

        Ok(())
    }

    /// 编辑员工资料（名称、角色、颜色），不影响身份
    pub async fn update_profile(
        &self,
        id: &str,
        req: UpdateUserRequest,
    ) -> Result<(), AdminServiceError> {
        let id = parse_user_id(id)?;
        warn_unknown_role(&req.role);

        let patch = ProfilePatch {
            full_name: Some(req.name),
            role: Some(req.role),
            color: Some(req.color),
            is_active: None,
        };

        self.profiles
            .update_profile(&id, &patch)
            .await
            .inspect_err(|e| tracing::error!("更新资料失败 ({}): {}", id, e))?;
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AdminServiceError> {
    if value.trim().is_empty() {
        return Err(AdminServiceError::InvalidRequest(format!(
            "El campo {} es obligatorio",
            field
        )));
    }
    Ok(())
}

/// 角色不在已知集合中时只记录警告，交由平台决定是否接受
fn warn_unknown_role(role: &str) {
    if Role::parse(role).is_none() {
        tracing::warn!("未知角色: {}", role);
    }
}
