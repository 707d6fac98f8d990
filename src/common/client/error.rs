use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP 状态异常: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    #[error("返回了 HTML 页面而不是 JSON")]
    HtmlResponse(String),

    #[error("无效的地址: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}
