use tracing::warn;
use url::Url;

use super::models::EmbedReference;
use super::utils::{int_or_none, join_url};
use crate::common::models::{MediaResult, StreamCandidate};

/// 组装最终结果，不做任何 I/O
pub fn assemble(reference: EmbedReference, base: &Url, formats: Vec<StreamCandidate>) -> MediaResult {
    let thumbnail = match join_url(base, &reference.poster) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!("封面地址无法拼接，原样使用 {}: {}", reference.poster, e);
            reference.poster.clone()
        }
    };

    MediaResult {
        id: reference.content_id,
        duration: int_or_none(&reference.duration),
        title: reference.title,
        thumbnail,
        formats,
    }
}
