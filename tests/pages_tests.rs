//! Integration tests for the server-rendered pages and the stream proxy.
//!
//! The portal runs against an in-process upstream that serves fixture
//! payloads, so the full request path (endpoint resolution, upstream fetch,
//! normalization, rendering) is exercised without network access.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use http_body_util::BodyExt;
use kitanime::config::Config;
use serde_json::json;
use tower::ServiceExt;

async fn spawn_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new()
        .route("/v1/anime/{slug}", get(upstream_anime))
        .route("/v1/anime/{slug}/episodes", get(upstream_episodes))
        .route(
            "/v1/anime/{slug}/episodes/{episode}",
            get(upstream_episode_detail),
        )
        .route("/embed/{episode}", get(upstream_embed))
        .route("/video.mp4", get(upstream_video))
        .with_state(base.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

async fn spawn_app() -> (Router, String) {
    let upstream = spawn_upstream().await;

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = kitanime::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");

    state
        .store()
        .add_api_endpoint(&format!("{upstream}/v1"), true)
        .await
        .expect("Failed to activate the fixture upstream endpoint");

    (kitanime::api::router(state).await, upstream)
}

async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn upstream_anime(Path(slug): Path<String>) -> Response {
    match slug.as_str() {
        "one-piece" => Json(json!({
            "data": {
                "title": "One Piece",
                "slug": "one-piece",
                "japanese_title": "ワンピース",
                "poster": "https://cdn.example/one-piece.jpg",
                "synopsis": "Bajak laut mencari harta karun",
                "rating": "8.7",
                "status": "Ongoing",
                "genres": [{"name": "Action", "slug": "action"}],
                "episodes": [
                    {"episode": "Episode 2 Subtitle Indonesia", "slug": "op-2", "date": "8 Jan"},
                    {"episode": "Episode 1 Subtitle Indonesia", "slug": "op-1", "date": "1 Jan"},
                    {"episode": "OVA Special", "slug": "op-ova"}
                ],
                "batch_links": [
                    {
                        "resolution": "720p",
                        "file_size": "1.2 GB",
                        "urls": [{"provider": "Mega", "url": "https://mega.example/op-batch"}]
                    }
                ]
            }
        }))
        .into_response(),
        "tensei-slime" => Json(json!({
            "data": {"title": "Tensei Slime", "slug": "tensei-slime"}
        }))
        .into_response(),
        "unstable" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

// The dedicated listing deliberately disagrees with the detail payload's
// embedded episodes so tests can tell which one feeds the page.
async fn upstream_episodes(Path(slug): Path<String>) -> Response {
    match slug.as_str() {
        "one-piece" => Json(json!({
            "data": [
                {"episode": "Episode 99 Subtitle Indonesia", "slug": "op-99"}
            ]
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn upstream_episode_detail(
    State(base): State<String>,
    Path((slug, episode)): Path<(String, String)>,
) -> Response {
    if slug != "one-piece" {
        return StatusCode::NOT_FOUND.into_response();
    }

    match episode.as_str() {
        "2" => Json(json!({
            "data": {
                "episode_title": "Episode 2 Subtitle Indonesia",
                "stream_url": "https://desustream.example/embed/op-2",
                "steramList": {
                    "480p": "https://cdn.example/op-2-480.mp4",
                    "720p": "https://cdn.example/op-2-720.mp4",
                    "HD": "https://cdn.example/op-2-hd.mp4"
                },
                "download_urls": {
                    "mp4": [
                        {
                            "resolution": "480p",
                            "file_size": "85 MB",
                            "urls": [{"provider": "Mega", "url": "https://mega.example/op-2-480"}]
                        }
                    ],
                    "mkv": []
                },
                "has_next_episode": true,
                "next_episode": {
                    "episode": "Episode 3 Subtitle Indonesia",
                    "slug": "op-3",
                    "episode_number": 3
                },
                "has_previous_episode": true,
                "previous_episode": {
                    "episode": "Episode 1 Subtitle Indonesia",
                    "slug": "op-1",
                    "episode_number": "1"
                }
            }
        }))
        .into_response(),
        // No stream listing and no embed page: the degraded path.
        "9" => Json(json!({
            "data": {
                "steramList": {},
                "has_next_episode": false,
                "has_previous_episode": false
            }
        }))
        .into_response(),
        // Empty listing but a live embed page: the extraction path.
        "10" => Json(json!({
            "data": {
                "episode_title": "Episode 10 Subtitle Indonesia",
                "stream_url": format!("{base}/embed/op-10"),
                "steramList": {},
                "has_next_episode": false,
                "has_previous_episode": false
            }
        }))
        .into_response(),
        // Non-empty listing whose only key is unparseable. The embed page
        // would answer, but no fetch may be issued for this shape.
        "11" => Json(json!({
            "data": {
                "episode_title": "Episode 11 Subtitle Indonesia",
                "stream_url": format!("{base}/embed/op-11"),
                "steramList": {
                    "HD": "https://cdn.example/op-11-hd.mp4"
                },
                "has_next_episode": false,
                "has_previous_episode": false
            }
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Embed page fixture. Answers only browser-like requests, so the fetch
/// profile has to make it through the embed client for extraction to work.
async fn upstream_embed(Path(episode): Path<String>, headers: HeaderMap) -> Response {
    let browser_like = headers
        .get(header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .is_some_and(|ua| ua.contains("Chrome"));
    if !browser_like {
        return StatusCode::FORBIDDEN.into_response();
    }

    Html(format!(
        r#"<html><body><iframe id="myIframe" src="https://cdn.example/recovered-{episode}.mp4" frameborder="0"></iframe></body></html>"#
    ))
    .into_response()
}

async fn upstream_video(headers: HeaderMap) -> Response {
    let received_range = headers
        .get(header::RANGE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("none"));

    Response::builder()
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_RANGE, received_range)
        .body(Body::from("FAKEMP4BYTES"))
        .unwrap()
}

#[tokio::test]
async fn test_home_page_renders_branding() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>KitaNime - Nonton Anime Subtitle Indonesia</title>"));
    assert!(html.contains(r#"<a class="brand" href="/">KitaNime</a>"#));
}

#[tokio::test]
async fn test_anime_detail_page() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>One Piece - KitaNime</title>"));
    assert!(html.contains("Bajak laut mencari harta karun"));
    assert!(html.contains(r#"<span class="genre-tag">Action</span>"#));
    assert!(html.contains(r#"href="/one-piece/episode/2""#));
    assert!(html.contains(r#"href="/one-piece/episodes""#));
    assert!(html.contains(r#"href="/one-piece/batch""#));
}

#[tokio::test]
async fn test_anime_detail_not_found() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/naruto").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("<h1>404</h1>"));
    assert!(html.contains("Anime yang Anda cari tidak ditemukan"));
}

#[tokio::test]
async fn test_anime_detail_upstream_failure() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/unstable").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("<h1>500</h1>"));
    assert!(html.contains("Tidak dapat memuat detail anime"));
}

#[tokio::test]
async fn test_episode_list_page() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/episodes").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Daftar Episode One Piece"));
    assert!(html.contains(r#"href="/one-piece/episode/1""#));
    assert!(html.contains(r#"href="/one-piece/episode/2""#));
    // Unparseable labels stay listed but are not linked.
    assert!(html.contains("<span>OVA Special</span>"));
    assert!(!html.contains(r#"href="/one-piece/episode/OVA"#));
    // The page renders the detail payload's embedded listing, not the
    // dedicated endpoint's.
    assert!(!html.contains("/one-piece/episode/99"));
}

#[tokio::test]
async fn test_episode_list_missing_anime() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/naruto/episodes").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Anime yang Anda cari tidak ditemukan"));
}

#[tokio::test]
async fn test_episode_player_page() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/episode/2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>One Piece Episode 2 - KitaNime</title>"));
    assert!(html.contains("One Piece - Episode 2 Subtitle Indonesia"));

    // The default quality plays, every parseable quality is selectable, and
    // the unparseable "HD" key is dropped.
    assert!(html.contains(r#"<iframe id="player" src="https://cdn.example/op-2-480.mp4""#));
    assert!(html.contains(r#"data-src="https://cdn.example/op-2-720.mp4">720p</button>"#));
    assert!(!html.contains("op-2-hd.mp4"));

    // Proxied fallback source, percent-encoded.
    assert!(html.contains("/stream?url=https%3A%2F%2Fdesustream.example%2Fembed%2Fop-2"));

    // Navigation resolves both pointer shapes (string and numeric).
    assert!(html.contains(r#"class="nav-prev" href="/one-piece/episode/1""#));
    assert!(html.contains(r#"class="nav-next" href="/one-piece/episode/3""#));

    assert!(html.contains("85 MB"));
    assert!(html.contains("https://mega.example/op-2-480"));

    assert!(!html.contains("Sumber video belum tersedia"));
}

#[tokio::test]
async fn test_episode_player_degrades_without_sources() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/episode/9").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("One Piece - Episode 9"));
    assert!(html.contains(r#"<iframe id="player" src="about:blank""#));
    assert!(html.contains("Sumber video belum tersedia untuk episode ini"));
    assert!(!html.contains("Sumber alternatif"));
}

#[tokio::test]
async fn test_episode_player_recovers_source_from_embed_page() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/episode/10").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<iframe id="player" src="https://cdn.example/recovered-op-10.mp4""#));
    assert!(html.contains(r#"data-src="https://cdn.example/recovered-op-10.mp4">480p</button>"#));
    assert!(!html.contains("Sumber video belum tersedia"));
}

#[tokio::test]
async fn test_episode_player_skips_embed_for_unparseable_listing() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/episode/11").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<iframe id="player" src="about:blank""#));
    assert!(html.contains("Sumber video belum tersedia untuk episode ini"));
    assert!(!html.contains("recovered-op-11.mp4"));
    assert!(!html.contains("op-11-hd.mp4"));
}

#[tokio::test]
async fn test_episode_player_missing_episode() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/episode/77").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Episode yang Anda cari tidak ditemukan"));
}

#[tokio::test]
async fn test_episode_player_missing_anime() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/naruto/episode/1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Episode yang Anda cari tidak ditemukan"));
}

#[tokio::test]
async fn test_episode_player_upstream_failure() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/unstable/episode/1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("Tidak dapat memuat episode"));
}

#[tokio::test]
async fn test_batch_page() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/one-piece/batch").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Download Batch One Piece"));
    assert!(html.contains("1.2 GB"));
    assert!(html.contains("https://mega.example/op-batch"));
}

#[tokio::test]
async fn test_batch_page_without_links() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/tensei-slime/batch").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Belum ada tautan batch untuk anime ini"));
}

#[tokio::test]
async fn test_batch_page_missing_anime() {
    let (app, _) = spawn_app().await;

    let (status, html) = get_page(&app, "/naruto/batch").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Anime yang Anda cari tidak ditemukan"));
}

#[tokio::test]
async fn test_stream_proxy_passes_body_and_headers() {
    let (app, upstream) = spawn_app().await;

    let target = urlencoding::encode(&format!("{upstream}/video.mp4")).into_owned();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/stream?url={target}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    assert_eq!(
        response.headers().get(header::ACCEPT_RANGES).unwrap(),
        "bytes"
    );
    // Without a client Range the proxy requests the whole resource.
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes=0-"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(String::from_utf8(body.to_vec()).unwrap(), "FAKEMP4BYTES");
}

#[tokio::test]
async fn test_stream_proxy_forwards_range() {
    let (app, upstream) = spawn_app().await;

    let target = urlencoding::encode(&format!("{upstream}/video.mp4")).into_owned();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/stream?url={target}"))
                .header(header::RANGE, "bytes=5-")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes=5-"
    );
}

#[tokio::test]
async fn test_stream_proxy_rejects_non_http_targets() {
    let (app, _) = spawn_app().await;

    let target = urlencoding::encode("file:///etc/passwd").into_owned();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/stream?url={target}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body_json["success"], false);
    assert!(
        body_json["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported stream URL scheme")
    );
}
