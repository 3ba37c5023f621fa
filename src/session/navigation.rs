//! 前端路由表与导航守卫
//!
//! 守卫接收显式的 [`SessionContext`]（由服务端解析），判断顺序：
//! 1. 需要登录但没有会话，或会话对应的账号已停用 → `/login`
//! 2. 需要管理员但角色不是管理员 → 提示并回到首页
//! 3. 已登录访问 `/login` → 首页
//! 4. 其余放行

use serde::Serialize;

use super::SessionContext;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// 非管理员访问管理页面时的提示
pub const ADMIN_ONLY_ALERT: &str = "⛔ Acceso denegado: Solo para administradores.";

/// 路由记录
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
}

const fn route(
    path: &'static str,
    name: &'static str,
    requires_auth: bool,
    requires_admin: bool,
) -> RouteRecord {
    RouteRecord {
        path,
        name,
        requires_auth,
        requires_admin,
    }
}

/// 路由表
///
/// 除登录页外都挂在带侧边栏的父布局下，父布局要求登录
pub const ROUTES: &[RouteRecord] = &[
    route("/login", "login", false, false),
    route("/", "dashboard", true, false),
    route("/calendario", "calendar", true, false),
    route("/servicios", "services", true, false),
    route("/clientes", "clients", true, false),
    route("/equipo", "team", true, true),
    route("/configuracion", "settings", true, true),
    route("/fichar", "timetracker", true, false),
    route("/control-horario", "admintime", true, true),
    route("/reportes", "reports", true, true),
];

/// 守卫结果
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum NavigationDecision {
    Allow,
    Redirect { to: &'static str },
    /// 阻断并提示，随后跳转
    Deny {
        to: &'static str,
        alert: &'static str,
    },
}

/// 归一化路径：去掉查询串、片段和末尾斜杠
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { HOME_PATH } else { trimmed }
}

/// 查找匹配的路由记录
pub fn match_route(path: &str) -> Option<&'static RouteRecord> {
    let path = normalize(path);
    ROUTES.iter().find(|r| r.path == path)
}

/// 导航守卫
pub fn guard(path: &str, session: Option<&SessionContext>) -> NavigationDecision {
    let Some(record) = match_route(path) else {
        return NavigationDecision::Allow;
    };

    // 已停用账号的令牌在过期前仍可通过平台校验，按未登录处理
    let session = session.filter(|s| s.active);

    if record.requires_auth && session.is_none() {
        return NavigationDecision::Redirect { to: LOGIN_PATH };
    }

    if record.requires_admin && !session.is_some_and(SessionContext::is_admin) {
        return NavigationDecision::Deny {
            to: HOME_PATH,
            alert: ADMIN_ONLY_ALERT,
        };
    }

    if record.path == LOGIN_PATH && session.is_some() {
        return NavigationDecision::Redirect { to: HOME_PATH };
    }

    NavigationDecision::Allow
}
