use serde_json::json;
use spl_resolver::{
    ClientConfig, EmbedParser, ParseError, PlayerClient, Protocol, ResolveOptions, find_embeds,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static" mediaPresentationDuration="PT320.36S">
  <Period>
    <AdaptationSet mimeType="video/mp4" codecs="avc1.4d401f">
      <Representation id="v720" bandwidth="2500000" width="1280" height="720">
        <BaseURL>720.mp4</BaseURL>
      </Representation>
    </AdaptationSet>
    <AdaptationSet contentType="audio" mimeType="audio/mp4">
      <Representation id="a128" bandwidth="128000" codecs="mp4a.40.2">
        <BaseURL>audio.m4a</BaseURL>
      </Representation>
    </AdaptationSet>
  </Period>
</MPD>"#;

const MASTER: &str = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080,CODECS=\"avc1.640028,mp4a.40.2\"
1080/index.m3u8
";

fn create_test_parser(options: ResolveOptions) -> EmbedParser {
    let client = PlayerClient::new(&ClientConfig::default()).unwrap();
    EmbedParser::new(client, options)
}

fn embed_url(src: &str, duration: &str) -> String {
    let src: String = url::form_urlencoded::byte_serialize(src.as_bytes()).collect();
    format!(
        "https://www.seznamzpravy.cz/iframe/player?duration={}&src={}&title=Foo&poster=%2Fimg.png&splVersion=VOD&contentId=323247&contextId=1",
        duration, src
    )
}

fn progressive_page() -> serde_json::Value {
    json!({
        "data": {"mp4": {"360p": {
            "codec": "h264",
            "bandwidth": "500000",
            "resolution": ["640", "360"],
            "duration": "320360",
            "url": "a.mp4"
        }}},
        "pls": {
            "dash": {"url": "dash/manifest.mpd"},
            "hls": {"url": "hls/master.m3u8"}
        }
    })
}

#[tokio::test]
async fn test_resolve_all_three_sources() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/v/pathspl2,2,VOD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progressive_page()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/dash/manifest.mpd"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MPD))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/hls/master.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER))
        .expect(1)
        .mount(&server)
        .await;

    let parser = create_test_parser(ResolveOptions::default());
    let result = parser
        .resolve(&embed_url(&format!("{}/v/path", base), "320"))
        .await
        .unwrap();

    assert_eq!(result.id, "323247");
    assert_eq!(result.title, "Foo");
    assert_eq!(result.duration, Some(320));
    assert_eq!(result.thumbnail, format!("{}/img.png", base));

    let ids: Vec<&str> = result.formats.iter().map(|s| s.format_id.as_str()).collect();
    assert_eq!(ids, vec!["hls-5000", "dash-v720", "360p", "dash-a128"]);

    let hls = &result.formats[0];
    assert_eq!(hls.url, format!("{}/v/hls/1080/index.m3u8", base));
    assert_eq!(hls.protocol, Protocol::M3u8Native);

    let dash = &result.formats[1];
    assert_eq!(dash.url, format!("{}/v/dash/720.mp4", base));
    assert_eq!(dash.duration, Some(320.36));

    let mp4 = &result.formats[2];
    assert_eq!(mp4.url, format!("{}/v/a.mp4", base));
    assert_eq!(mp4.tbr, Some(500));
    assert_eq!((mp4.width, mp4.height), (Some(640), Some(360)));
    assert_eq!(mp4.duration, Some(320.36));
}

#[tokio::test]
async fn test_location_followed_exactly_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/live/streamspl2,2,VOD"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Location": format!("{}/meta/second", base)})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meta/second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Location": format!("{}/meta/third", base),
            "data": {"mp4": {"480p": {
                "codec": "h264", "bandwidth": 1200000, "resolution": [854, 480],
                "duration": 1534437, "url": "video/480.mp4"
            }}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meta/third"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let parser = create_test_parser(ResolveOptions::default());
    let result = parser
        .resolve(&embed_url(&format!("{}/live/stream", base), "null"))
        .await
        .unwrap();

    assert_eq!(result.duration, None);
    // 跳转后的地址成为新的 base
    assert_eq!(result.thumbnail, format!("{}/img.png", base));
    assert_eq!(result.formats.len(), 1);
    assert_eq!(result.formats[0].url, format!("{}/meta/video/480.mp4", base));
    assert_eq!(result.formats[0].duration, Some(1534.437));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_broken_manifests_are_ignored() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/v/pathspl2,2,VOD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progressive_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/dash/manifest.mpd"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/hls/master.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let parser = create_test_parser(ResolveOptions::default());
    let result = parser
        .resolve(&embed_url(&format!("{}/v/path", base), "320"))
        .await
        .unwrap();

    let ids: Vec<&str> = result.formats.iter().map(|s| s.format_id.as_str()).collect();
    assert_eq!(ids, vec!["360p"]);
}

#[tokio::test]
async fn test_disabled_manifests_are_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/v/pathspl2,2,VOD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progressive_page()))
        .expect(1)
        .mount(&server)
        .await;

    let parser = create_test_parser(ResolveOptions {
        include_dash: false,
        include_hls: false,
    });
    let result = parser
        .resolve(&embed_url(&format!("{}/v/path", base), "320"))
        .await
        .unwrap();

    assert_eq!(result.formats.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/v/pathspl2,2,VOD"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let parser = create_test_parser(ResolveOptions::default());
    let err = parser
        .resolve(&embed_url(&format!("{}/v/path", base), "320"))
        .await
        .unwrap_err();

    match err {
        ParseError::UpstreamFetch { locator, .. } => {
            assert_eq!(locator, format!("{}/v/pathspl2,2,VOD", base))
        }
        other => panic!("期望 UpstreamFetch，得到 {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_upstream_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/v/pathspl2,2,VOD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!DOCTYPE html><html></html>"))
        .mount(&server)
        .await;

    let parser = create_test_parser(ResolveOptions::default());
    let err = parser
        .resolve(&embed_url(&format!("{}/v/path", base), "320"))
        .await
        .unwrap_err();
    assert!(matches!(err, ParseError::UpstreamFetch { .. }));
}

#[tokio::test]
async fn test_missing_field_sends_nothing() {
    let server = MockServer::start().await;
    let src: String =
        url::form_urlencoded::byte_serialize(format!("{}/v/path", server.uri()).as_bytes()).collect();
    let url = format!(
        "https://www.seznamzpravy.cz/iframe/player?src={}&splVersion=VOD&title=Foo&duration=320&contentId=1",
        src
    );

    let parser = create_test_parser(ResolveOptions::default());
    let err = parser.resolve(&url).await.unwrap_err();

    assert!(matches!(err, ParseError::MissingField("poster")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_find_embeds_in_page() {
    let html = r#"<div><iframe src="https://www.seznamzpravy.cz/iframe/player?duration=320&contentId=323247&title=x" allowfullscreen></iframe></div>"#;
    assert_eq!(
        find_embeds(html),
        vec!["https://www.seznamzpravy.cz/iframe/player?duration=320&contentId=323247&title=x"]
    );
}
