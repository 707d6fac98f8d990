pub mod dash;
pub mod extractor;
pub mod hls;
pub mod progressive;

pub use dash::DashExtractor;
pub use extractor::{ExtractError, ManifestExtractor};
pub use hls::HlsExtractor;

use tracing::{debug, warn};
use url::Url;

use crate::common::models::StreamCandidate;
use crate::parser::errors::ParseError;
use crate::parser::models::DataDocument;
use crate::parser::utils::join_url;

/// 把清单文档里的三种格式统一成流列表，顺序为 MP4、DASH、HLS
///
/// MP4 部分出错直接失败；DASH / HLS 失败只记日志，贡献为空。
pub async fn normalize(
    document: &DataDocument,
    base: &Url,
    dash: Option<&dyn ManifestExtractor>,
    hls: Option<&dyn ManifestExtractor>,
) -> Result<Vec<StreamCandidate>, ParseError> {
    let mut streams = match document.progressive_formats() {
        Some(formats) => progressive::extract_progressive(formats, base)?,
        None => Vec::new(),
    };
    debug!("MP4 直链 {} 个", streams.len());

    // 两个清单互不依赖，可以并发拉取
    let (dash_streams, hls_streams) = tokio::join!(
        manifest_pass(dash, document.dash_manifest_url(), base),
        manifest_pass(hls, document.hls_manifest_url(), base),
    );
    streams.extend(dash_streams);
    streams.extend(hls_streams);

    Ok(streams)
}

async fn manifest_pass(
    extractor: Option<&dyn ManifestExtractor>,
    pointer: Option<&str>,
    base: &Url,
) -> Vec<StreamCandidate> {
    let (Some(extractor), Some(pointer)) = (extractor, pointer) else {
        return Vec::new();
    };

    let manifest_url = match join_url(base, pointer) {
        Ok(url) => url,
        Err(e) => {
            warn!("{} 清单地址无效 {}: {}", extractor.name(), pointer, e);
            return Vec::new();
        }
    };

    match extractor.extract(&manifest_url).await {
        Ok(streams) => {
            debug!("{} 清单 {} 个流", extractor.name(), streams.len());
            streams
        }
        Err(e) => {
            warn!("{} 清单 {} 获取失败，忽略: {}", extractor.name(), manifest_url, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::models::Protocol;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 记录请求地址的假提取器
    pub(crate) struct FakeExtractor {
        pub name: &'static str,
        pub result: Result<Vec<StreamCandidate>, String>,
        pub requested: Mutex<Vec<String>>,
    }

    impl FakeExtractor {
        pub fn ok(name: &'static str, ids: &[&str], protocol: Protocol) -> Self {
            let streams = ids
                .iter()
                .map(|id| StreamCandidate::new(*id, format!("https://cdn/{}", id), protocol))
                .collect();
            Self {
                name,
                result: Ok(streams),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(name: &'static str) -> Self {
            Self {
                name,
                result: Err("connection reset".to_string()),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ManifestExtractor for FakeExtractor {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn extract(&self, manifest_url: &Url) -> Result<Vec<StreamCandidate>, ExtractError> {
            self.requested.lock().unwrap().push(manifest_url.to_string());
            self.result.clone().map_err(ExtractError::Playlist)
        }
    }

    fn base() -> Url {
        Url::parse("https://host/pathspl2,2,VOD").unwrap()
    }

    fn full_document() -> DataDocument {
        DataDocument::new(json!({
            "data": {"mp4": {
                "360p": {"codec": "h264", "bandwidth": "500000", "resolution": ["640", "360"], "duration": "320360", "url": "a.mp4"}
            }},
            "pls": {
                "dash": {"url": "dash/manifest.mpd"},
                "hls": {"url": "//hls.example/master.m3u8"}
            }
        }))
    }

    #[tokio::test]
    async fn test_passes_concatenate_in_order() {
        let dash = FakeExtractor::ok("dash", &["dash-1", "dash-2"], Protocol::HttpDashSegments);
        let hls = FakeExtractor::ok("hls", &["hls-1"], Protocol::M3u8Native);

        let streams = normalize(&full_document(), &base(), Some(&dash), Some(&hls))
            .await
            .unwrap();

        let ids: Vec<&str> = streams.iter().map(|s| s.format_id.as_str()).collect();
        assert_eq!(ids, vec!["360p", "dash-1", "dash-2", "hls-1"]);
        assert_eq!(dash.requested(), vec!["https://host/dash/manifest.mpd"]);
        assert_eq!(hls.requested(), vec!["https://hls.example/master.m3u8"]);
    }

    #[tokio::test]
    async fn test_manifest_failures_degrade_to_empty() {
        let dash = FakeExtractor::failing("dash");
        let hls = FakeExtractor::failing("hls");

        let streams = normalize(&full_document(), &base(), Some(&dash), Some(&hls))
            .await
            .unwrap();

        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].format_id, "360p");
    }

    #[tokio::test]
    async fn test_absent_sections_contribute_nothing() {
        let dash = FakeExtractor::ok("dash", &["dash-1"], Protocol::HttpDashSegments);
        let hls = FakeExtractor::ok("hls", &["hls-1"], Protocol::M3u8Native);

        let streams = normalize(&DataDocument::new(json!({})), &base(), Some(&dash), Some(&hls))
            .await
            .unwrap();

        assert!(streams.is_empty());
        assert!(dash.requested().is_empty());
        assert!(hls.requested().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_extractor_is_skipped() {
        let hls = FakeExtractor::ok("hls", &["hls-1"], Protocol::M3u8Native);

        let streams = normalize(&full_document(), &base(), None, Some(&hls))
            .await
            .unwrap();

        let ids: Vec<&str> = streams.iter().map(|s| s.format_id.as_str()).collect();
        assert_eq!(ids, vec!["360p", "hls-1"]);
    }

    #[tokio::test]
    async fn test_malformed_progressive_aborts_before_manifests() {
        let dash = FakeExtractor::ok("dash", &["dash-1"], Protocol::HttpDashSegments);
        let document = DataDocument::new(json!({
            "data": {"mp4": {"bad": {"codec": "h264", "bandwidth": "x", "resolution": [1, 2], "duration": 1, "url": "a"}}},
            "pls": {"dash": {"url": "m.mpd"}}
        }));

        let err = normalize(&document, &base(), Some(&dash), None).await.unwrap_err();
        assert!(matches!(err, ParseError::FormatParse { .. }));
        assert!(dash.requested().is_empty());
    }
}
