//! 员工账号命令

use anyhow::{Context, Result};

use salon_admin::admin::service::parse_user_id;
use salon_admin::admin::types::{CreateUserRequest, UpdateUserRequest};
use salon_admin::platform::{IdentityAdmin, ProfileStore};

use crate::utils::CliContext;

/// 列出所有员工资料
pub async fn list(ctx: &CliContext) -> Result<()> {
    let profiles = ctx.platform.list_profiles().await?;

    if profiles.is_empty() {
        println!("没有找到员工资料");
        return Ok(());
    }

    println!("共 {} 名员工:\n", profiles.len());
    for profile in profiles {
        let status = if profile.is_active { "启用" } else { "停用" };
        println!("ID: {}", profile.id);
        println!("  名称: {}", profile.full_name);
        println!("  邮箱: {}", profile.email);
        println!("  角色: {}", profile.role);
        println!("  颜色: {}", profile.color);
        println!("  状态: {}", status);
        println!();
    }

    Ok(())
}

/// 查看单个员工，同时显示资料与身份封禁状态
pub async fn show(ctx: &CliContext, id: &str) -> Result<()> {
    let id = parse_user_id(id)?;
    let profile = ctx
        .platform
        .get_profile(&id)
        .await?
        .with_context(|| format!("资料不存在: {}", id))?;
    let identity = ctx.platform.get_identity(&id).await?;

    println!("ID: {}", profile.id);
    println!("  名称: {}", profile.full_name);
    println!("  邮箱: {}", profile.email);
    println!("  角色: {}", profile.role);
    println!("  颜色: {}", profile.color);
    println!("  资料状态: {}", if profile.is_active { "启用" } else { "停用" });

    match identity.banned_until {
        Some(until) if identity.is_banned() => {
            println!("  封禁至: {}", until.format("%Y-%m-%d %H:%M:%S"))
        }
        _ => println!("  封禁: 否"),
    }

    if profile.is_active == identity.is_banned() {
        println!("\n⚠ 资料与封禁状态不一致，可运行 'reconcile' 修复");
    }

    Ok(())
}

/// 创建员工账号
pub async fn create(
    ctx: &CliContext,
    email: String,
    password: String,
    name: String,
    role: String,
    color: Option<String>,
) -> Result<()> {
    let identity = ctx
        .service
        .create_user(CreateUserRequest {
            email,
            password,
            name,
            role,
            color,
        })
        .await?;

    println!("用户创建成功");
    println!("  ID: {}", identity.id);
    println!("  邮箱: {}", identity.email.unwrap_or_default());
    Ok(())
}

/// 停用账号
pub async fn deactivate(ctx: &CliContext, id: &str) -> Result<()> {
    ctx.service.deactivate_user(id).await?;
    println!("用户 {} 已停用", id);
    Ok(())
}

/// 恢复账号
pub async fn restore(ctx: &CliContext, id: &str) -> Result<()> {
    ctx.service.restore_user(id).await?;
    println!("用户 {} 已恢复", id);
    Ok(())
}

/// 编辑资料
pub async fn update(
    ctx: &CliContext,
    id: &str,
    name: String,
    role: String,
    color: String,
) -> Result<()> {
    ctx.service
        .update_profile(id, UpdateUserRequest { name, role, color })
        .await?;
    println!("用户 {} 资料已更新", id);
    Ok(())
}
