//! 沙龙管理后台 CLI
//!
//! 运维命令行工具：不经过前端直接管理员工账号、执行一致性检查

mod commands;
mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "salon-cli")]
#[command(version, about = "沙龙管理后台命令行工具", long_about = None)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true, default_value = "config/config.json")]
    config: String,

    /// .env 文件路径
    #[arg(long, global = true)]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 员工账号管理
    #[command(subcommand)]
    Users(UsersCommands),

    /// 检查并修复资料 active 标志与封禁状态不一致的记录
    Reconcile {
        /// 只输出报告，不修复
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum UsersCommands {
    /// 列出所有员工资料
    List,

    /// 查看单个员工（资料 + 封禁状态）
    Show {
        /// 用户 ID
        id: String,
    },

    /// 创建员工账号
    Create {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// 显示名称
        #[arg(short, long)]
        name: String,

        /// 角色 (admin/employee)
        #[arg(short, long, default_value = "employee")]
        role: String,

        /// UI 颜色
        #[arg(long)]
        color: Option<String>,
    },

    /// 停用账号
    Deactivate {
        /// 用户 ID
        id: String,
    },

    /// 恢复账号
    Restore {
        /// 用户 ID
        id: String,
    },

    /// 编辑资料（三个字段都必须提供）
    Update {
        /// 用户 ID
        id: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        role: String,

        #[arg(long)]
        color: String,
    },
}

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match utils::connect(&cli.config, cli.env_file.as_deref()) {
        Ok(ctx) => match cli.command {
            Commands::Users(cmd) => match cmd {
                UsersCommands::List => commands::users::list(&ctx).await,
                UsersCommands::Show { id } => commands::users::show(&ctx, &id).await,
                UsersCommands::Create {
                    email,
                    password,
                    name,
                    role,
                    color,
                } => commands::users::create(&ctx, email, password, name, role, color).await,
                UsersCommands::Deactivate { id } => commands::users::deactivate(&ctx, &id).await,
                UsersCommands::Restore { id } => commands::users::restore(&ctx, &id).await,
                UsersCommands::Update {
                    id,
                    name,
                    role,
                    color,
                } => commands::users::update(&ctx, &id, name, role, color).await,
            },
            Commands::Reconcile { dry_run } => commands::reconcile::run(&ctx, dry_run).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}
