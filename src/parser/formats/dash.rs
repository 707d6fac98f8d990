use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use url::Url;

use super::extractor::{ExtractError, ManifestExtractor};
use crate::common::client::client::PlayerClient;
use crate::common::models::{Protocol, StreamCandidate};
use crate::parser::utils::{join_url, parse_frame_rate, parse_iso8601_duration, split_codecs};

/// DASH（MPD）清单提取器
pub struct DashExtractor {
    client: PlayerClient,
}

impl DashExtractor {
    pub fn new(client: PlayerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManifestExtractor for DashExtractor {
    fn name(&self) -> &'static str {
        "dash"
    }

    async fn extract(&self, manifest_url: &Url) -> Result<Vec<StreamCandidate>, ExtractError> {
        let text = self.client.get_text(manifest_url.as_str()).await?;
        parse_mpd(&text, manifest_url)
    }
}

// --------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Mpd,
    Period,
    AdaptationSet,
    Representation,
}

// AdaptationSet 上的属性会被 Representation 继承，id 和 bandwidth 除外
#[derive(Debug, Default, Clone)]
struct StreamAttrs {
    id: Option<String>,
    bandwidth: Option<u64>,
    codecs: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    frame_rate: Option<f64>,
    mime_type: Option<String>,
    content_type: Option<String>,
}

impl StreamAttrs {
    fn from_element(e: &BytesStart) -> Result<Self, ExtractError> {
        Ok(Self {
            id: attr(e, b"id")?,
            bandwidth: attr(e, b"bandwidth")?.and_then(|b| b.parse().ok()),
            codecs: attr(e, b"codecs")?,
            width: attr(e, b"width")?.and_then(|w| w.parse().ok()),
            height: attr(e, b"height")?.and_then(|h| h.parse().ok()),
            frame_rate: attr(e, b"frameRate")?.and_then(|f| parse_frame_rate(&f)),
            mime_type: attr(e, b"mimeType")?,
            content_type: attr(e, b"contentType")?,
        })
    }

    fn inherit(self, parent: &StreamAttrs) -> Self {
        Self {
            id: self.id,
            bandwidth: self.bandwidth,
            codecs: self.codecs.or_else(|| parent.codecs.clone()),
            width: self.width.or(parent.width),
            height: self.height.or(parent.height),
            frame_rate: self.frame_rate.or(parent.frame_rate),
            mime_type: self.mime_type.or_else(|| parent.mime_type.clone()),
            content_type: self.content_type.or_else(|| parent.content_type.clone()),
        }
    }

    // video / audio / text ...
    fn kind(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .or_else(|| self.mime_type.as_deref().and_then(|m| m.split('/').next()))
    }
}

struct Frame {
    level: Level,
    base: Url,
    attrs: StreamAttrs,
}

fn attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>, ExtractError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|err| ExtractError::Mpd(err.to_string()))?;
        if attribute.key.local_name().as_ref() == name {
            let value = attribute
                .unescape_value()
                .map_err(|err| ExtractError::Mpd(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn mime_to_ext(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "video/mp4" => Some("mp4"),
        "audio/mp4" => Some("m4a"),
        "video/webm" | "audio/webm" => Some("webm"),
        "video/mp2t" => Some("ts"),
        _ => None,
    }
}

/// 解析 MPD 文本，相对地址以清单地址为基准
pub fn parse_mpd(text: &str, manifest_url: &Url) -> Result<Vec<StreamCandidate>, ExtractError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut frames: Vec<Frame> = Vec::new();
    let mut representations: Vec<(StreamAttrs, Url)> = Vec::new();
    let mut base_text: Option<String> = None;
    let mut duration: Option<f64> = None;
    let mut saw_mpd = false;

    // 新层级继承上一层的 base 和属性
    let open = |frames: &Vec<Frame>, level: Level, e: &BytesStart| -> Result<Frame, ExtractError> {
        let (base, parent_attrs) = frames
            .last()
            .map(|f| (f.base.clone(), f.attrs.clone()))
            .unwrap_or_else(|| (manifest_url.clone(), StreamAttrs::default()));
        let attrs = match level {
            Level::AdaptationSet | Level::Representation => {
                StreamAttrs::from_element(e)?.inherit(&parent_attrs)
            }
            _ => StreamAttrs::default(),
        };
        Ok(Frame { level, base, attrs })
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"MPD" => {
                    saw_mpd = true;
                    duration = attr(&e, b"mediaPresentationDuration")?
                        .and_then(|d| parse_iso8601_duration(&d));
                    let frame = open(&frames, Level::Mpd, &e)?;
                    frames.push(frame);
                }
                b"Period" | b"AdaptationSet" | b"Representation" => {
                    let level = match e.local_name().as_ref() {
                        b"Period" => Level::Period,
                        b"AdaptationSet" => Level::AdaptationSet,
                        _ => Level::Representation,
                    };
                    let frame = open(&frames, level, &e)?;
                    frames.push(frame);
                }
                b"BaseURL" => base_text = Some(String::new()),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Representation" {
                    let frame = open(&frames, Level::Representation, &e)?;
                    representations.push((frame.attrs, frame.base));
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(buf) = base_text.as_mut() {
                    let unescaped = t.unescape().map_err(|err| ExtractError::Mpd(err.to_string()))?;
                    buf.push_str(&unescaped);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"BaseURL" => {
                    if let (Some(text), Some(frame)) = (base_text.take(), frames.last_mut()) {
                        frame.base = join_url(&frame.base, &text)
                            .map_err(|err| ExtractError::Mpd(format!("BaseURL {}: {}", text, err)))?;
                    }
                }
                b"Representation" => {
                    if let Some(frame) = frames.pop() {
                        debug_assert_eq!(frame.level, Level::Representation);
                        representations.push((frame.attrs, frame.base));
                    }
                }
                b"MPD" | b"Period" | b"AdaptationSet" => {
                    frames.pop();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::Mpd(err.to_string())),
            _ => {}
        }
    }

    if !saw_mpd {
        return Err(ExtractError::Mpd("缺少 MPD 根节点".to_string()));
    }

    let mut streams = Vec::new();
    for (index, (attrs, url)) in representations.into_iter().enumerate() {
        let (vcodec, acodec) = match attrs.kind() {
            Some("audio") => (Some("none".to_string()), attrs.codecs.clone()),
            Some("video") | None => attrs
                .codecs
                .as_deref()
                .map(split_codecs)
                .unwrap_or((None, None)),
            // 字幕、图片等不是可播放的流
            Some(other) => {
                debug!("跳过 {} 类型的 Representation", other);
                continue;
            }
        };

        let format_id = match &attrs.id {
            Some(id) => format!("dash-{}", id),
            None => format!("dash-{}", index),
        };
        let mut candidate = StreamCandidate::new(format_id, url.to_string(), Protocol::HttpDashSegments);
        candidate.manifest_url = Some(manifest_url.to_string());
        candidate.ext = attrs
            .mime_type
            .as_deref()
            .and_then(mime_to_ext)
            .map(str::to_string);
        candidate.vcodec = vcodec;
        candidate.acodec = acodec;
        candidate.tbr = attrs.bandwidth.map(|b| b / 1000);
        candidate.width = attrs.width;
        candidate.height = attrs.height;
        candidate.fps = attrs.frame_rate;
        candidate.duration = duration;
        streams.push(candidate);
    }

    debug!("DASH 清单中找到 {} 个流", streams.len());
    Ok(streams)
}
