use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::common::client::error::ApiError;
use crate::common::models::StreamCandidate;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("清单下载失败: {0}")]
    Fetch(#[from] ApiError),

    #[error("DASH 清单解析失败: {0}")]
    Mpd(String),

    #[error("HLS 播放列表解析失败: {0}")]
    Playlist(String),
}

/// 清单（DASH / HLS）提取器：自己下载、自己解析，返回零个或多个流
///
/// 失败由调用方吞掉，不影响整体解析。
#[async_trait]
pub trait ManifestExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, manifest_url: &Url) -> Result<Vec<StreamCandidate>, ExtractError>;
}
