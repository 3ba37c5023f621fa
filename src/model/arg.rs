use clap::Parser;

/// 沙龙管理后台 Admin API
#[derive(Parser, Debug)]
#[command(name = "salon-admin")]
#[command(version, about = "沙龙管理后台 Admin API 服务", long_about = None)]
pub struct Args {
    /// 配置文件路径（可选，环境变量优先）
    #[arg(short, long)]
    pub config: Option<String>,

    /// .env 文件路径（默认读取当前目录的 .env）
    #[arg(long)]
    pub env_file: Option<String>,
}
