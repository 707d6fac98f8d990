use lazy_static::lazy_static;
use regex::Regex;

use super::errors::ParseError;

lazy_static! {
    // 播放器嵌入链接，contentId 可以出现在查询串的任意位置
    static ref EMBED_URL_PATTERN: Regex = Regex::new(
        r"^https://www\.seznamzpravy\.cz/iframe/player\?(?:[^#]*&)?contentId=(?P<id>[0-9]+)(?:[&#]|$)"
    )
    .expect("embed url pattern");
    static ref EMBED_IFRAME_PATTERN: Regex = Regex::new(
        r#"<iframe\b[^>]+\bsrc=["'](?P<url>https://www\.seznamzpravy\.cz/iframe/player\?[^"']*)["']"#
    )
    .expect("embed iframe pattern");
}

/// 判断是否是可以处理的嵌入链接
pub fn is_embed_url(url: &str) -> bool {
    EMBED_URL_PATTERN.is_match(url.trim())
}

/// 从嵌入链接中提取内容 ID
pub fn match_content_id(url: &str) -> Result<String, ParseError> {
    EMBED_URL_PATTERN
        .captures(url.trim())
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ParseError::UnsupportedUrl(url.to_string()))
}

/// 在任意 HTML 中查找播放器 iframe，原样返回链接（不去重、不校验）
pub fn find_embeds(page_html: &str) -> Vec<String> {
    EMBED_IFRAME_PATTERN
        .captures_iter(page_html)
        .filter_map(|caps| caps.name("url"))
        .map(|m| m.as_str().to_string())
        .collect()
}
