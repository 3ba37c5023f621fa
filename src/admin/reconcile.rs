//! 资料 active 标志与身份封禁状态的一致性检查
//!
//! 生命周期操作先写资料再写封禁，中途失败会留下不一致记录。
//! 这里以资料为准重新下发封禁状态；没有身份的资料只报告不处理。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::{Duration, interval};

use crate::platform::{BanDuration, IdentityAdmin, ProfileStore};

/// 单次检查结果
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// 检查的资料数
    pub checked: usize,
    /// 发现的不一致记录（无论是否修复）
    pub mismatched: Vec<String>,
    /// 已修复的不一致记录
    pub repaired: Vec<String>,
    /// 没有对应身份的资料
    pub orphaned: Vec<String>,
    /// 检查或修复失败的记录
    pub failed: Vec<String>,
    /// 完成时间
    pub finished_at: Option<DateTime<Utc>>,
}

impl ReconcileReport {
    /// 是否所有记录都已一致
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty() && self.failed.is_empty()
    }
}

/// 一致性检查器
pub struct Reconciler {
    identities: Arc<dyn IdentityAdmin>,
    profiles: Arc<dyn ProfileStore>,
    last_report: RwLock<Option<ReconcileReport>>,
}

impl Reconciler {
    pub fn new(identities: Arc<dyn IdentityAdmin>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            identities,
            profiles,
            last_report: RwLock::new(None),
        }
    }

    /// 最近一次检查结果
    pub fn last_report(&self) -> Option<ReconcileReport> {
        self.last_report.read().clone()
    }

    /// 执行一次完整检查并修复
    pub async fn run(&self) -> anyhow::Result<ReconcileReport> {
        self.reconcile(true).await
    }

    /// 只检查不修复，结果不计入 `last_report`
    pub async fn dry_run(&self) -> anyhow::Result<ReconcileReport> {
        self.reconcile(false).await
    }

    async fn reconcile(&self, repair: bool) -> anyhow::Result<ReconcileReport> {
        let profiles = self.profiles.list_profiles().await?;
        let now = Utc::now();
        let mut report = ReconcileReport {
            checked: profiles.len(),
            ..ReconcileReport::default()
        };

        for profile in profiles {
            let identity = match self.identities.get_identity(&profile.id).await {
                Ok(identity) => identity,
                Err(e) if e.is_not_found() => {
                    tracing::warn!("资料 {} 没有对应的身份", profile.id);
                    report.orphaned.push(profile.id);
                    continue;
                }
                Err(e) => {
                    tracing::error!("查询身份 {} 失败: {}", profile.id, e);
                    report.failed.push(profile.id);
                    continue;
                }
            };

            let banned = identity.is_banned_at(now);
            if banned != profile.is_active {
                continue;
            }

            report.mismatched.push(profile.id.clone());
            if !repair {
                tracing::info!(
                    "状态不一致: {} is_active={} banned={}",
                    profile.id,
                    profile.is_active,
                    banned
                );
                continue;
            }

            tracing::warn!(
                "状态不一致: {} is_active={} banned={}，按资料修复",
                profile.id,
                profile.is_active,
                banned
            );
            match self
                .identities
                .set_ban_duration(&profile.id, BanDuration::for_active(profile.is_active))
                .await
            {
                Ok(_) => report.repaired.push(profile.id),
                Err(e) => {
                    tracing::error!("修复 {} 失败: {}", profile.id, e);
                    report.failed.push(profile.id);
                }
            }
        }

        report.finished_at = Some(Utc::now());
        tracing::info!(
            "一致性检查完成: 检查={}, 不一致={}, 修复={}, 孤儿={}, 失败={}",
            report.checked,
            report.mismatched.len(),
            report.repaired.len(),
            report.orphaned.len(),
            report.failed.len()
        );

        if repair {
            *self.last_report.write() = Some(report.clone());
        }
        Ok(report)
    }
}

/// 启动后台一致性检查任务
pub fn start_reconcile_task(
    reconciler: Arc<Reconciler>,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(interval_secs));
        ticker.tick().await; // 跳过第一次立即触发

        loop {
            ticker.tick().await;
            tracing::info!("执行定期一致性检查");
            if let Err(e) = reconciler.run().await {
                tracing::error!("一致性检查失败: {}", e);
            }
        }
    })
}
