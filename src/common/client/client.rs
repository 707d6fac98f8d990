use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT},
};
use serde_json::Value;
use tracing::{debug, error};

use crate::common::client::error::ApiError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";
const DEFAULT_REFERER: &str = "https://www.seznamzpravy.cz/";

/// HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub referer: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

/// 拉取并解析 JSON 文档
///
/// 任何失败（网络、超时、非 2xx、解码、JSON 语法）都归为同一个 `ApiError`，
/// 调用方不区分具体原因。
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, ApiError>;
}

// 播放器接口客户端，无状态，可以随意 clone
#[derive(Debug, Clone)]
pub struct PlayerClient {
    pub inner: Client,
}

impl PlayerClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let inner = ClientBuilder::new()
            .timeout(config.timeout)
            .default_headers(Self::get_default_headers(config))
            .build()
            .map_err(|e| {
                error!("创建 HTTP 客户端失败: {}", e);
                ApiError::Reqwest(e)
            })?;

        Ok(Self { inner })
    }

    pub fn get_default_headers(config: &ClientConfig) -> HeaderMap {
        // 创建默认请求头
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("cs-CZ,cs;q=0.9,en;q=0.8"),
        );
        if let Ok(referer) = HeaderValue::from_str(&config.referer) {
            headers.insert(REFERER, referer);
        }
        if let Ok(user_agent) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, user_agent);
        }

        headers
    }

    // 通用 GET，返回文本
    pub async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        debug!("GET {}", url);
        let resp = self.inner.get(url).send().await.map_err(|e| {
            error!("请求失败: {}", e);
            ApiError::Reqwest(e)
        })?;

        Self::handle_response(resp).await
    }

    // 通用 GET，返回 JSON
    pub async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let text = self.get_text(url).await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                debug!("json_value: {}", value);
                Ok(value)
            }
            Err(e) => {
                // 不是 JSON，可能是 HTML 页面
                if text.contains("<!DOCTYPE html>") || text.contains("<html") {
                    return Err(ApiError::HtmlResponse(text));
                }
                error!("失败的请求的URL: {}", url);
                Err(ApiError::InvalidResponse(format!("JSON 解析失败: {}", e)))
            }
        }
    }

    fn try_decompress(raw: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut decoder = GzDecoder::new(raw);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded)?;
        Ok(decoded)
    }

    async fn handle_response(resp: Response) -> Result<String, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            error!("请求 {} 返回状态码 {}", resp.url(), status);
            return Err(ApiError::HttpStatus(status));
        }

        let raw_body = resp.bytes().await?;

        // 部分 CDN 会返回未声明 Content-Encoding 的 gzip 内容
        let body = if raw_body.starts_with(&[0x1f, 0x8b]) {
            Self::try_decompress(&raw_body).unwrap_or_else(|_| raw_body.to_vec())
        } else {
            raw_body.to_vec()
        };

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl JsonFetcher for PlayerClient {
    async fn fetch_json(&self, url: &str) -> Result<Value, ApiError> {
        self.get_json(url).await
    }
}
