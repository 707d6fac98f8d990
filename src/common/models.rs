use serde::Serialize;
use std::fmt;

// -----------------------------------------------------------------------------------------------

/// 流的传输方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Https,            // 直接下载的 MP4 文件
    HttpDashSegments, // DASH 分片
    M3u8Native,       // HLS 分片
}

impl Protocol {
    // 越大越优先
    pub fn preference(self) -> u8 {
        match self {
            Protocol::Https => 2,
            Protocol::HttpDashSegments => 1,
            Protocol::M3u8Native => 0,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Https => write!(f, "https"),
            Protocol::HttpDashSegments => write!(f, "http_dash_segments"),
            Protocol::M3u8Native => write!(f, "m3u8_native"),
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// 一个可以直接播放的流
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamCandidate {
    pub format_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcodec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acodec: Option<String>,
    /// kbit/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbr: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    /// 秒
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl StreamCandidate {
    pub fn new(format_id: impl Into<String>, url: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            format_id: format_id.into(),
            url: url.into(),
            manifest_url: None,
            ext: None,
            protocol,
            vcodec: None,
            acodec: None,
            tbr: None,
            width: None,
            height: None,
            fps: None,
            duration: None,
        }
    }

    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none")
    }

    pub fn resolution(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            (None, Some(h)) => Some(format!("{}p", h)),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// 解析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaResult {
    pub id: String,
    pub title: String,
    pub duration: Option<i64>, // 秒，查询串里是 "null" 时为空
    pub thumbnail: String,
    pub formats: Vec<StreamCandidate>, // 最好的在前
}
