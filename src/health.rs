//! 健康检查模块
//!
//! 服务本身无状态，健康状态只反映最近一次一致性检查的结果。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

use crate::admin::reconcile::{ReconcileReport, Reconciler};

/// 健康检查响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// 服务状态
    pub status: HealthStatus,
    /// 检查时间
    pub timestamp: String,
    /// 服务版本
    pub version: String,
    /// 最近一次一致性检查（未执行过时省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reconcile: Option<ReconcileReport>,
}

/// 健康状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// 健康
    Healthy,
    /// 降级（存在未修复的不一致记录）
    Degraded,
}

impl HealthStatus {
    pub fn from_report(report: Option<&ReconcileReport>) -> Self {
        match report {
            Some(report) if !report.is_clean() => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }
}

/// 健康检查状态
pub struct HealthCheckState {
    /// 一致性检查器
    pub reconciler: Arc<Reconciler>,
    /// 服务版本
    pub version: String,
}

impl HealthCheckState {
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self {
            reconciler,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// GET /health
pub async fn health_check(State(state): State<Arc<HealthCheckState>>) -> Response {
    let last_reconcile = state.reconciler.last_report();
    let status = HealthStatus::from_report(last_reconcile.as_ref());

    let response = HealthResponse {
        status,
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        last_reconcile,
    };

    // 降级仍返回 200，在响应体中标记
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");

        let json = serde_json::to_string(&HealthStatus::Degraded).unwrap();
        assert_eq!(json, "\"degraded\"");
    }

    #[test]
    fn test_status_from_report() {
        assert_eq!(HealthStatus::from_report(None), HealthStatus::Healthy);

        let clean = ReconcileReport {
            checked: 3,
            repaired: vec!["a".to_string()],
            ..ReconcileReport::default()
        };
        assert_eq!(HealthStatus::from_report(Some(&clean)), HealthStatus::Healthy);

        let dirty = ReconcileReport {
            failed: vec!["b".to_string()],
            ..ReconcileReport::default()
        };
        assert_eq!(HealthStatus::from_report(Some(&dirty)), HealthStatus::Degraded);
    }
}
