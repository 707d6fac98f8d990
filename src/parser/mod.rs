use tracing::{debug, info};

use crate::common::client::client::{JsonFetcher, PlayerClient};
use crate::common::models::MediaResult;
use errors::ParseError;
use formats::{DashExtractor, HlsExtractor, ManifestExtractor};
use models::ResolveOptions;

pub mod assembler;
pub mod detector;
pub mod errors;
pub mod formats;
pub mod models;
pub mod stream_selector;
pub mod upstream;
pub mod url_parser;
pub mod utils;

pub use detector::find_embeds;

/// 嵌入链接解析器
///
/// 流程：解析链接 -> 拉取上游清单（可能跳转一次）-> 统一三种格式 -> 排序 -> 组装结果。
/// 解析器本身不保存任何调用间的状态，可以并发使用。
pub struct EmbedParser {
    fetcher: Box<dyn JsonFetcher>,
    dash: Option<Box<dyn ManifestExtractor>>,
    hls: Option<Box<dyn ManifestExtractor>>,
}

impl EmbedParser {
    pub fn new(client: PlayerClient, options: ResolveOptions) -> Self {
        let dash = options
            .include_dash
            .then(|| Box::new(DashExtractor::new(client.clone())) as Box<dyn ManifestExtractor>);
        let hls = options
            .include_hls
            .then(|| Box::new(HlsExtractor::new(client.clone())) as Box<dyn ManifestExtractor>);

        Self {
            fetcher: Box::new(client),
            dash,
            hls,
        }
    }

    /// 自定义上游客户端和清单提取器
    pub fn with_collaborators(
        fetcher: Box<dyn JsonFetcher>,
        dash: Option<Box<dyn ManifestExtractor>>,
        hls: Option<Box<dyn ManifestExtractor>>,
    ) -> Self {
        Self { fetcher, dash, hls }
    }

    // 解析入口
    pub async fn resolve(&self, embed_url: &str) -> Result<MediaResult, ParseError> {
        // 字段检查在任何网络请求之前
        let reference = url_parser::parse_embed_reference(embed_url)?;
        info!("内容 ID: {}，标题: {}", reference.content_id, reference.title);

        let resolved = upstream::resolve_upstream(self.fetcher.as_ref(), &reference).await?;

        let streams = formats::normalize(
            &resolved.document,
            &resolved.base,
            self.dash.as_deref(),
            self.hls.as_deref(),
        )
        .await?;
        debug!("共 {} 个候选流", streams.len());

        let ranked = stream_selector::rank_formats(streams);

        Ok(assembler::assemble(reference, &resolved.base, ranked))
    }
}
