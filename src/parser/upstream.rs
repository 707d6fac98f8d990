use tracing::{debug, info};
use url::Url;

use super::errors::ParseError;
use super::models::{DataDocument, EmbedReference, ManifestDocument};
use super::utils::join_url;
use crate::common::client::client::JsonFetcher;
use crate::common::client::error::ApiError;

/// 上游解析结果：最终的数据文档，以及之后拼接相对地址用的 base
#[derive(Debug, Clone)]
pub struct UpstreamResolution {
    pub base: Url,
    pub document: DataDocument,
}

/// 拉取上游清单，最多跟随一次 `Location` 跳转
pub async fn resolve_upstream(
    fetcher: &dyn JsonFetcher,
    reference: &EmbedReference,
) -> Result<UpstreamResolution, ParseError> {
    let mut locator = reference.upstream_locator();
    info!("请求上游清单: {}", locator);

    let first = fetcher
        .fetch_json(&locator)
        .await
        .map_err(|e| ParseError::upstream(&locator, e))?;

    let document = match ManifestDocument::from_value(first)
        .map_err(|e| ParseError::upstream(&locator, e))?
    {
        ManifestDocument::Redirect { location } => {
            // 相对地址按当前地址解析
            let next = Url::parse(&locator)
                .and_then(|base| join_url(&base, &location))
                .map(String::from)
                .unwrap_or(location);
            debug!("上游返回跳转文档: {}", next);

            let second = fetcher
                .fetch_json(&next)
                .await
                .map_err(|e| ParseError::upstream(&next, e))?;
            locator = next;

            // 第二次的结果不再检查 Location
            DataDocument::new(second)
        }
        ManifestDocument::Data(document) => document,
    };

    let base = Url::parse(&locator).map_err(|e| ParseError::upstream(&locator, ApiError::from(e)))?;

    Ok(UpstreamResolution { base, document })
}
