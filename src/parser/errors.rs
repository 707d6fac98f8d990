use thiserror::Error;

use crate::common::client::error::ApiError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("不支持的嵌入链接: {0}")]
    UnsupportedUrl(String),

    #[error("查询串中缺少 {0} 字段")]
    MissingField(&'static str),

    #[error("拉取上游清单失败 ({locator}): {source}")]
    UpstreamFetch {
        locator: String,
        #[source]
        source: ApiError,
    },

    #[error("格式 {format_id} 解析失败: {reason}")]
    FormatParse { format_id: String, reason: String },
}

impl ParseError {
    pub fn upstream(locator: impl Into<String>, source: ApiError) -> Self {
        Self::UpstreamFetch {
            locator: locator.into(),
            source,
        }
    }

    pub fn format(format_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FormatParse {
            format_id: format_id.into(),
            reason: reason.into(),
        }
    }
}
