//! 沙龙管理后台 Admin API
//!
//! 为前端提供需要 Supabase service_role 权限的员工账号管理接口

pub mod admin;
pub mod health;
pub mod http_client;
pub mod model;
pub mod platform;
pub mod session;
