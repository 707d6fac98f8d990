use async_trait::async_trait;
use m3u8_rs::{AlternativeMediaType, MasterPlaylist, MediaPlaylist, Playlist};
use tracing::{debug, warn};
use url::Url;

use super::extractor::{ExtractError, ManifestExtractor};
use crate::common::client::client::PlayerClient;
use crate::common::models::{Protocol, StreamCandidate};
use crate::parser::utils::{join_url, split_codecs};

/// HLS 播放列表提取器
pub struct HlsExtractor {
    client: PlayerClient,
}

impl HlsExtractor {
    pub fn new(client: PlayerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManifestExtractor for HlsExtractor {
    fn name(&self) -> &'static str {
        "hls"
    }

    async fn extract(&self, manifest_url: &Url) -> Result<Vec<StreamCandidate>, ExtractError> {
        let text = self.client.get_text(manifest_url.as_str()).await?;
        parse_playlist(&text, manifest_url)
    }
}

/// 解析 m3u8 文本
pub fn parse_playlist(text: &str, manifest_url: &Url) -> Result<Vec<StreamCandidate>, ExtractError> {
    let playlist = m3u8_rs::parse_playlist_res(text.as_bytes())
        .map_err(|e| ExtractError::Playlist(format!("{:?}", e)))?;

    let streams = match playlist {
        Playlist::MasterPlaylist(pl) => process_master_playlist(pl, manifest_url),
        Playlist::MediaPlaylist(pl) => vec![process_media_playlist(&pl, manifest_url)],
    };
    debug!("HLS 播放列表中找到 {} 个流", streams.len());

    Ok(streams)
}

fn new_hls_candidate(format_id: String, url: &Url, manifest_url: &Url) -> StreamCandidate {
    let mut candidate = StreamCandidate::new(format_id, url.to_string(), Protocol::M3u8Native);
    candidate.manifest_url = Some(manifest_url.to_string());
    candidate.ext = Some("mp4".to_string());
    candidate
}

fn process_master_playlist(playlist: MasterPlaylist, manifest_url: &Url) -> Vec<StreamCandidate> {
    let mut streams = Vec::new();

    for (index, variant) in playlist.variants.into_iter().enumerate() {
        // I-frame 列表只用于快进预览
        if variant.is_i_frame {
            continue;
        }
        let url = match join_url(manifest_url, &variant.uri) {
            Ok(url) => url,
            Err(e) => {
                warn!("跳过无法拼接的 HLS 地址 {}: {}", variant.uri, e);
                continue;
            }
        };

        let tbr = variant.average_bandwidth.unwrap_or(variant.bandwidth) / 1000;
        let format_id = if tbr > 0 {
            format!("hls-{}", tbr)
        } else {
            format!("hls-{}", index)
        };

        let mut candidate = new_hls_candidate(format_id, &url, manifest_url);
        if let Some(codecs) = variant.codecs.as_deref() {
            let (vcodec, acodec) = split_codecs(codecs);
            candidate.vcodec = vcodec;
            candidate.acodec = acodec;
        }
        candidate.tbr = (tbr > 0).then_some(tbr);
        if let Some(resolution) = variant.resolution {
            candidate.width = u32::try_from(resolution.width).ok();
            candidate.height = u32::try_from(resolution.height).ok();
        }
        candidate.fps = variant.frame_rate;
        streams.push(candidate);
    }

    // 单独的音轨
    for media in playlist.alternatives {
        if !matches!(media.media_type, AlternativeMediaType::Audio) {
            continue;
        }
        let Some(uri) = media.uri.as_deref() else {
            continue;
        };
        let url = match join_url(manifest_url, uri) {
            Ok(url) => url,
            Err(e) => {
                warn!("跳过无法拼接的 HLS 音轨 {}: {}", uri, e);
                continue;
            }
        };

        let format_id = format!("hls-audio-{}-{}", media.group_id, media.name).replace(' ', "_");
        let mut candidate = new_hls_candidate(format_id, &url, manifest_url);
        candidate.vcodec = Some("none".to_string());
        streams.push(candidate);
    }

    streams
}

fn process_media_playlist(playlist: &MediaPlaylist, manifest_url: &Url) -> StreamCandidate {
    let mut candidate = new_hls_candidate("hls".to_string(), manifest_url, manifest_url);
    // 直播列表没有确定的时长
    if playlist.end_list {
        let total: f64 = playlist.segments.iter().map(|s| s.duration as f64).sum();
        candidate.duration = Some(total);
    }
    candidate
}
