use clap::Parser;
use std::path::PathBuf;

/// 播放器嵌入链接解析工具
#[derive(Parser, Debug)]
#[command(name = "splres")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "解析播放器嵌入链接，列出所有可播放的流", long_about = None)]
pub struct Cli {
    /// 嵌入链接
    #[arg(long, value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    #[arg(required_unless_present = "page")]
    pub url: Option<String>,

    /// 在 HTML 文件中查找嵌入链接
    #[arg(long, value_name = "FILE")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    #[arg(conflicts_with = "url")]
    pub page: Option<PathBuf>,

    /// 以 JSON 输出结果
    #[arg(long)]
    pub json: bool,

    /// 不解析 DASH 清单
    #[arg(long)]
    pub no_dash: bool,

    /// 不解析 HLS 播放列表
    #[arg(long)]
    pub no_hls: bool,

    /// 请求超时（秒）
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}
