use serde_json::{Map, Value};
use url::Url;

use crate::common::models::{Protocol, StreamCandidate};
use crate::parser::errors::ParseError;
use crate::parser::utils::{join_url, value_as_f64, value_as_i64};

/// `data.mp4` 中的一项
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressiveDescriptor {
    pub codec: String,
    pub bandwidth: u64, // bit/s
    pub width: u32,
    pub height: u32,
    pub duration_ms: f64,
    pub url: String, // 相对地址
}

impl ProgressiveDescriptor {
    pub fn from_value(format_id: &str, value: &Value) -> Result<Self, ParseError> {
        let fail = |reason: String| ParseError::format(format_id, reason);

        let entry = value
            .as_object()
            .ok_or_else(|| fail(format!("不是对象: {}", value)))?;
        let field = |name: &str| {
            entry
                .get(name)
                .ok_or_else(|| fail(format!("缺少 {} 字段", name)))
        };

        let codec = field("codec")?
            .as_str()
            .ok_or_else(|| fail("codec 不是字符串".to_string()))?
            .to_string();

        let bandwidth = value_as_i64(field("bandwidth")?)
            .and_then(|b| u64::try_from(b).ok())
            .ok_or_else(|| fail(format!("无效的 bandwidth: {}", entry["bandwidth"])))?;

        let resolution = field("resolution")?
            .as_array()
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| fail(format!("无效的 resolution: {}", entry["resolution"])))?;
        let dimension = |v: &Value| {
            value_as_i64(v)
                .and_then(|d| u32::try_from(d).ok())
                .ok_or_else(|| fail(format!("无效的分辨率: {}", v)))
        };
        let width = dimension(&resolution[0])?;
        let height = dimension(&resolution[1])?;

        let duration_ms = value_as_f64(field("duration")?)
            .ok_or_else(|| fail(format!("无效的 duration: {}", entry["duration"])))?;

        let url = field("url")?
            .as_str()
            .ok_or_else(|| fail("url 不是字符串".to_string()))?
            .to_string();

        Ok(Self {
            codec,
            bandwidth,
            width,
            height,
            duration_ms,
            url,
        })
    }

    pub fn into_candidate(self, format_id: &str, base: &Url) -> Result<StreamCandidate, ParseError> {
        let url = join_url(base, &self.url)
            .map_err(|e| ParseError::format(format_id, format!("无法拼接地址 {}: {}", self.url, e)))?;

        let mut candidate = StreamCandidate::new(format_id, url.to_string(), Protocol::Https);
        candidate.ext = Some("mp4".to_string());
        candidate.vcodec = Some(self.codec);
        candidate.tbr = Some(self.bandwidth / 1000);
        candidate.width = Some(self.width);
        candidate.height = Some(self.height);
        candidate.duration = Some(self.duration_ms / 1000.0);
        Ok(candidate)
    }
}

/// 直链 MP4 部分：任何一项出错整个解析失败
pub fn extract_progressive(
    formats: &Map<String, Value>,
    base: &Url,
) -> Result<Vec<StreamCandidate>, ParseError> {
    formats
        .iter()
        .map(|(format_id, value)| {
            ProgressiveDescriptor::from_value(format_id, value)?.into_candidate(format_id, base)
        })
        .collect()
}
