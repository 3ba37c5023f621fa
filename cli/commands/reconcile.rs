//! 一致性检查命令

use anyhow::Result;

use salon_admin::admin::reconcile::ReconcileReport;

use crate::utils::CliContext;

/// 执行一致性检查
///
/// `dry_run` 时只列出不一致的记录
pub async fn run(ctx: &CliContext, dry_run: bool) -> Result<()> {
    let report = if dry_run {
        ctx.reconciler.dry_run().await?
    } else {
        ctx.reconciler.run().await?
    };

    print_report(&report, dry_run);

    if !report.failed.is_empty() {
        anyhow::bail!("{} 条记录处理失败", report.failed.len());
    }
    Ok(())
}

fn print_report(report: &ReconcileReport, dry_run: bool) {
    println!("检查 {} 条资料", report.checked);
    if dry_run {
        print_ids("不一致", &report.mismatched);
    } else {
        print_ids("已修复", &report.repaired);
    }
    if !report.orphaned.is_empty() {
        print_ids("没有身份的资料", &report.orphaned);
    }
    if !report.failed.is_empty() {
        print_ids("失败", &report.failed);
    }
}

fn print_ids(label: &str, ids: &[String]) {
    println!("  {}: {}", label, ids.len());
    for id in ids {
        println!("    - {}", id);
    }
}
