use serde_json::{Map, Value};

use crate::common::client::error::ApiError;

// 播放器 JS 行为分析得出的后缀，缺少时上游直接返回 HTTP 400
pub const PLAYER_MAGIC_PREFIX: &str = "spl2,2,";

/// 嵌入链接中解析出来的信息，一次解析只构造一次
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedReference {
    pub content_id: String,
    pub src: String,
    pub spl_version: String,
    pub title: String,
    pub duration: String, // 数字或者字面量 "null"
    pub poster: String,
}

impl EmbedReference {
    /// 上游地址，每次请求都重新拼接
    pub fn upstream_locator(&self) -> String {
        format!("{}{}{}", self.src, PLAYER_MAGIC_PREFIX, self.spl_version)
    }
}

// --------------------------------------------------------

/// 解析选项
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    pub include_dash: bool,
    pub include_hls: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_dash: true,
            include_hls: true,
        }
    }
}

// --------------------------------------------------------

/// 上游返回的清单文档
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestDocument {
    /// 只有 `Location` 的跳转文档
    Redirect { location: String },
    Data(DataDocument),
}

impl ManifestDocument {
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value.get("Location") {
            Some(Value::String(location)) => Ok(Self::Redirect {
                location: location.clone(),
            }),
            Some(other) => Err(ApiError::InvalidResponse(format!(
                "Location 不是字符串: {}",
                other
            ))),
            None => Ok(Self::Data(DataDocument::new(value))),
        }
    }
}

/// 真正描述流的文档，各部分都可能缺失
#[derive(Debug, Clone, PartialEq)]
pub struct DataDocument {
    raw: Value,
}

impl DataDocument {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// `data.mp4`，不是对象时视为没有
    pub fn progressive_formats(&self) -> Option<&Map<String, Value>> {
        self.raw.pointer("/data/mp4").and_then(Value::as_object)
    }

    /// `pls.dash.url`
    pub fn dash_manifest_url(&self) -> Option<&str> {
        self.raw.pointer("/pls/dash/url").and_then(Value::as_str)
    }

    /// `pls.hls.url`
    pub fn hls_manifest_url(&self) -> Option<&str> {
        self.raw.pointer("/pls/hls/url").and_then(Value::as_str)
    }
}
