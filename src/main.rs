use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

use spl_resolver::common::logger::PrettyLogger;
use spl_resolver::{
    ClientConfig, EmbedParser, PlayerClient, ResolveOptions, find_embeds, log_info, log_success,
    log_warning,
};

mod cli;

/// 在 HTML 文件中查找嵌入链接
fn scan_page(path: &Path, as_json: bool) -> Result<()> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("读取页面失败: {}", path.display()))?;
    let embeds = find_embeds(&html);
    debug!("页面 {} 中找到 {} 个嵌入链接", path.display(), embeds.len());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&embeds)?);
        return Ok(());
    }

    if embeds.is_empty() {
        log_warning!("没有找到嵌入链接");
    }
    for embed in &embeds {
        println!("{}", embed);
    }
    Ok(())
}

/// 解析单个嵌入链接
async fn resolve_embed(args: &cli::Cli, url: &str) -> Result<()> {
    let config = ClientConfig {
        timeout: Duration::from_secs(args.timeout),
        ..ClientConfig::default()
    };
    let client = PlayerClient::new(&config).context("创建 HTTP 客户端失败")?;

    let options = ResolveOptions {
        include_dash: !args.no_dash,
        include_hls: !args.no_hls,
    };
    debug!("解析选项: {:?}", options);

    info!("开始解析...");
    let parser = EmbedParser::new(client, options);
    let result = parser.resolve(url).await.map_err(|e| {
        error!("解析失败: {}", e);
        e
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    PrettyLogger::video_info(&result);
    PrettyLogger::separator();
    if result.formats.is_empty() {
        log_warning!("没有可用的流");
    }
    for (index, stream) in result.formats.iter().enumerate() {
        PrettyLogger::stream(index, stream);
    }
    PrettyLogger::separator();
    log_success!("共 {} 个流", result.formats.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // 初始化日志，输出到 stderr 以免污染 JSON
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Some(page) = &args.page {
        if !args.json {
            log_info!("扫描页面: {}", page.display().to_string().cyan());
        }
        return scan_page(page, args.json);
    }

    match args.url.as_deref() {
        Some(url) => resolve_embed(&args, url).await,
        None => anyhow::bail!("需要 --url 或 --page"),
    }
}
