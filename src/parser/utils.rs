use serde_json::Value;
use url::Url;

/// 按标准 URL 规则把相对地址拼到 base 上（协议相对、路径相对、绝对地址都支持）
pub fn join_url(base: &Url, reference: &str) -> Result<Url, url::ParseError> {
    base.join(reference.trim())
}

/// 整数字段，上游有时给数字有时给字符串
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// 浮点字段
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 能解析成整数就返回，否则为空（"null"、小数等）
pub fn int_or_none(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

const VIDEO_CODEC_PREFIXES: [&str; 10] = [
    "avc1", "avc3", "h264", "hev1", "hvc1", "h265", "vp8", "vp9", "vp09", "av01",
];
const AUDIO_CODEC_PREFIXES: [&str; 9] = [
    "mp4a", "opus", "vorbis", "mp3", "aac", "ac-3", "ec-3", "eac3", "flac",
];

/// 拆分 CODECS 字符串，如 "avc1.4d401f,mp4a.40.2"
///
/// 只有音频时视频编码为 "none"，反之亦然；无法识别时两个都为空。
pub fn split_codecs(codecs: &str) -> (Option<String>, Option<String>) {
    let mut vcodec = None;
    let mut acodec = None;

    for codec in codecs.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let family = codec.split('.').next().unwrap_or(codec).to_lowercase();
        if vcodec.is_none() && VIDEO_CODEC_PREFIXES.contains(&family.as_str()) {
            vcodec = Some(codec.to_string());
        } else if acodec.is_none() && AUDIO_CODEC_PREFIXES.contains(&family.as_str()) {
            acodec = Some(codec.to_string());
        }
    }

    match (vcodec, acodec) {
        (None, None) => (None, None),
        (Some(v), None) => (Some(v), Some("none".to_string())),
        (None, Some(a)) => (Some("none".to_string()), Some(a)),
        (v, a) => (v, a),
    }
}

/// ISO-8601 时长，例如 "PT1H2M3.5S"、"P1DT2S"
pub fn parse_iso8601_duration(input: &str) -> Option<f64> {
    let rest = input.trim().strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let mut total = 0.0;
    let mut seen = false;
    for (part, units) in [(date, &[('D', 86400.0)][..]), (time, &[('H', 3600.0), ('M', 60.0), ('S', 1.0)][..])] {
        let mut number = String::new();
        for ch in part.chars() {
            if ch.is_ascii_digit() || ch == '.' {
                number.push(ch);
                continue;
            }
            let factor = units.iter().find(|(u, _)| *u == ch)?.1;
            total += number.parse::<f64>().ok()? * factor;
            number.clear();
            seen = true;
        }
        if !number.is_empty() {
            return None;
        }
    }

    seen.then_some(total)
}

/// 帧率，"25" 或者 "30000/1001"
pub fn parse_frame_rate(input: &str) -> Option<f64> {
    match input.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => input.trim().parse::<f64>().ok(),
    }
}

pub struct FormatTool;

impl FormatTool {
    // 格式化时长
    pub fn format_duration(duration: f64) -> String {
        let hours = (duration / 3600.0).floor() as u32;
        let mins = ((duration - (hours * 3600) as f64) / 60.0).floor() as u32;
        let secs = (duration - (hours * 3600 + mins * 60) as f64).round() as u32;

        if hours != 0 {
            format!("{:02}:{:02}:{:02}", hours, mins, secs)
        } else {
            format!("{:02}:{:02}", mins, secs)
        }
    }

    // 格式化码率（kbit/s）
    pub fn format_bitrate(kbps: u64) -> String {
        if kbps >= 1000 {
            format!("{:.1} Mbps", kbps as f64 / 1000.0)
        } else {
            format!("{} kbps", kbps)
        }
    }
}
