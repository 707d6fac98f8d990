use std::cmp::Ordering;

use tracing::debug;

use crate::common::models::StreamCandidate;

fn fps_key(stream: &StreamCandidate) -> f64 {
    stream.fps.unwrap_or(-1.0)
}

/// 比较两个流的质量，Greater 表示 a 更好
///
/// 依次比较：有视频 > 纯音频、高度、宽度、码率、帧率、传输方式（直链 > DASH > HLS）。
/// 缺失的值排在有值的后面。
pub fn compare_quality(a: &StreamCandidate, b: &StreamCandidate) -> Ordering {
    (!a.is_audio_only())
        .cmp(&!b.is_audio_only())
        .then_with(|| a.height.cmp(&b.height))
        .then_with(|| a.width.cmp(&b.width))
        .then_with(|| a.tbr.cmp(&b.tbr))
        .then_with(|| fps_key(a).total_cmp(&fps_key(b)))
        .then_with(|| a.protocol.preference().cmp(&b.protocol.preference()))
}

/// 按质量从高到低排序，相同质量保持输入顺序，不删除也不去重
pub fn rank_formats(mut formats: Vec<StreamCandidate>) -> Vec<StreamCandidate> {
    // sort_by 是稳定排序
    formats.sort_by(|a, b| compare_quality(b, a));

    for (i, stream) in formats.iter().enumerate() {
        debug!(
            "流 {}: {} height={:?} tbr={:?} protocol={}",
            i, stream.format_id, stream.height, stream.tbr, stream.protocol
        );
    }

    formats
}
