//! Admin API 模块
//!
//! 代理需要 service_role 权限的员工账号操作
//!
//! # 功能
//! - 创建员工账号（身份 + 资料）
//! - 停用 / 恢复账号（资料 active 标志 + 身份封禁）
//! - 编辑员工资料（名称、角色、颜色）
//! - 资料与封禁状态的一致性检查
//!
//! # 使用
//! ```ignore
//! let platform = Arc::new(SupabaseClient::from_config(&config)?);
//! let state = AdminState::new(platform, &config);
//! let app = create_router(state, &config.cors_origins);
//! ```

pub mod error;
mod handlers;
mod middleware;
pub mod reconcile;
mod router;
pub mod service;
pub mod types;

pub use error::AdminServiceError;
pub use middleware::AdminState;
pub use reconcile::{Reconciler, start_reconcile_task};
pub use router::create_router;
pub use service::UserService;
