use std::collections::HashMap;

use tracing::debug;
use url::Url;

use super::detector::match_content_id;
use super::errors::ParseError;
use super::models::EmbedReference;

// 顺序即检查顺序
const REQUIRED_FIELDS: [&str; 5] = ["src", "splVersion", "title", "duration", "poster"];

/// 查询串 -> 字段名: 值列表，空值会被丢弃
pub fn parse_query(url: &Url) -> HashMap<String, Vec<String>> {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        fields
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    fields
}

/// 解析嵌入链接，不做任何网络请求
pub fn parse_embed_reference(input: &str) -> Result<EmbedReference, ParseError> {
    let content_id = match_content_id(input)?;
    let url =
        Url::parse(input.trim()).map_err(|_| ParseError::UnsupportedUrl(input.to_string()))?;

    let query = parse_query(&url);
    for field in REQUIRED_FIELDS {
        if !query.contains_key(field) {
            return Err(ParseError::MissingField(field));
        }
    }

    // 只取第一个值
    let first = |field: &'static str| -> Result<String, ParseError> {
        query
            .get(field)
            .and_then(|values| values.first())
            .cloned()
            .ok_or(ParseError::MissingField(field))
    };

    let reference = EmbedReference {
        content_id,
        src: first("src")?,
        spl_version: first("splVersion")?,
        title: first("title")?,
        duration: first("duration")?,
        poster: first("poster")?,
    };
    debug!("嵌入信息: {:?}", reference);

    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.seznamzpravy.cz/iframe/player?contentId=323247";

    fn embed(query: &str) -> String {
        format!("{}&{}", BASE, query)
    }

    #[test]
    fn test_parse_full_reference() {
        let url = embed(
            "title=%C5%A0%C5%A5astn%C3%A9+pond%C4%9Bl%C3%AD&duration=320&poster=%2F%2Fd39-a.sdn.szn.cz%2Fimg.png&src=https%3A%2F%2Fv39-a.sdn.szn.cz%2Fv_39%2Fvmd%2Fabc%3Ffl%3Dmdk%2C69c40b2e%7C&splVersion=VOD",
        );
        let reference = parse_embed_reference(&url).unwrap();

        assert_eq!(reference.content_id, "323247");
        assert_eq!(reference.title, "Šťastné pondělí");
        assert_eq!(reference.duration, "320");
        assert_eq!(reference.poster, "//d39-a.sdn.szn.cz/img.png");
        assert_eq!(
            reference.src,
            "https://v39-a.sdn.szn.cz/v_39/vmd/abc?fl=mdk,69c40b2e|"
        );
        assert_eq!(reference.spl_version, "VOD");
    }

    #[test]
    fn test_missing_fields_are_reported_by_name() {
        let full = ["src=a", "splVersion=VOD", "title=T", "duration=1", "poster=p"];
        let names = ["src", "splVersion", "title", "duration", "poster"];

        for (skip, name) in names.iter().enumerate() {
            let query: Vec<&str> = full
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, kv)| *kv)
                .collect();
            let err = parse_embed_reference(&embed(&query.join("&"))).unwrap_err();
            match err {
                ParseError::MissingField(field) => assert_eq!(field, *name),
                other => panic!("期望 MissingField，得到 {:?}", other),
            }
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = parse_embed_reference(&embed(
            "src=a&splVersion=VOD&title=&duration=1&poster=p",
        ))
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingField("title")));
    }

    #[test]
    fn test_first_value_wins() {
        let reference = parse_embed_reference(&embed(
            "src=a&src=b&splVersion=VOD&title=T&title=U&duration=null&poster=p",
        ))
        .unwrap();
        assert_eq!(reference.src, "a");
        assert_eq!(reference.title, "T");
        assert_eq!(reference.duration, "null");
    }

    #[test]
    fn test_unsupported_url() {
        let err = parse_embed_reference("https://example.com/?contentId=1&src=a").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedUrl(_)));
    }
}
