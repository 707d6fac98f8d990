use colored::*;

use crate::common::models::{MediaResult, StreamCandidate};
use crate::parser::utils::FormatTool;

/// 漂亮的终端输出工具
pub struct PrettyLogger;

impl PrettyLogger {
    /// 显示成功消息
    pub fn success(message: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), message.as_ref());
    }

    /// 显示信息消息
    pub fn info(message: impl AsRef<str>) {
        println!("{} {}", "ℹ".blue().bold(), message.as_ref());
    }

    /// 显示警告消息
    pub fn warning(message: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow().bold(), message.as_ref());
    }

    /// 显示错误消息
    pub fn error(message: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), message.as_ref());
    }

    /// 显示分割线
    pub fn separator() {
        println!("{}", "─".repeat(50).bright_black());
    }

    /// 显示视频信息
    pub fn video_info(result: &MediaResult) {
        let duration = result
            .duration
            .map(|d| FormatTool::format_duration(d as f64))
            .unwrap_or_else(|| "--:--".to_string());
        println!(
            "{} {} ({})",
            "🎬".magenta().bold(),
            result.title.bold(),
            duration.cyan()
        );
        println!("   id: {}", result.id);
        println!("   封面: {}", result.thumbnail);
    }

    /// 显示单个流
    pub fn stream(index: usize, stream: &StreamCandidate) {
        let resolution = stream.resolution().unwrap_or_else(|| "audio".to_string());
        let bitrate = stream
            .tbr
            .map(FormatTool::format_bitrate)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {:<24} {:<10} {:<12} {:<20} {}",
            index + 1,
            stream.format_id.bold(),
            resolution.cyan(),
            bitrate,
            stream.protocol.to_string().bright_black(),
            stream.vcodec.as_deref().unwrap_or("-"),
        );
    }
}

/// 便捷宏用于漂亮的日志输出
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::success(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::warning(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::error(format!($($arg)*))
    };
}
