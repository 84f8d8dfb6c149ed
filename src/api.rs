use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use base64::Engine;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::overlay::content::{OverlayContent, SystemClock};
use crate::overlay::OverlayError;
use crate::{assets, overlay, perf_scope};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ComposeRequest {
    /// Photo to stamp, as raw base64 or a `data:image/...;base64,` URI.
    pub photo: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(get, path = "/health", tag = "mapcam", responses((status=200, body=HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

fn parse_data_uri(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(rest) = s.strip_prefix("data:") {
        // data:image/jpeg;base64,....
        let (_, b64) = rest.split_once(',')?;
        return Some(b64.trim().to_string());
    }
    // assume plain base64
    Some(s.to_string())
}

fn b64_decode(input: &str) -> Option<Vec<u8>> {
    let b64 = parse_data_uri(input)?;
    let engine = base64::engine::general_purpose::STANDARD;
    engine.decode(b64.as_bytes()).ok()
}

fn decode_photo(input: &str) -> Result<RgbaImage, OverlayError> {
    let _perf = perf_scope!("api.decode_photo");
    let bytes = b64_decode(input)
        .ok_or_else(|| OverlayError::Decode("photo is not valid base64".to_string()))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| OverlayError::Decode(format!("photo could not be decoded: {e}")))?;
    Ok(img.to_rgba8())
}

/// Run a CPU-bound step off the async runtime.
async fn blocking<T, F>(task: F) -> Result<T, OverlayError>
where
    F: FnOnce() -> Result<T, OverlayError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| OverlayError::Internal(format!("blocking task failed: {e}")))?
}

fn reply_error(e: OverlayError) -> (StatusCode, String) {
    let status = match &e {
        OverlayError::Decode(_) | OverlayError::DegenerateGeometry(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

#[utoipa::path(
    post,
    path = "/compose",
    tag = "mapcam",
    request_body = ComposeRequest,
    responses(
        (status=200, description="Composed JPEG", content_type="image/jpeg"),
        (status=400, description="Bad request"),
        (status=500, description="Internal error")
    )
)]
pub async fn compose(Json(req): Json<ComposeRequest>) -> Result<impl IntoResponse, (StatusCode, String)> {
    // composition starts only once all three inputs have decoded
    let photo_b64 = req.photo;
    let (photo, map, icon) = tokio::try_join!(
        blocking(move || decode_photo(&photo_b64)),
        blocking(|| assets::load_image_cached(assets::MAP_ASSET)),
        blocking(|| assets::load_image_cached(assets::ICON_ASSET)),
    )
    .map_err(reply_error)?;

    let fonts = assets::font_set().map_err(reply_error)?;

    // rendering is pure CPU, keep it off the async runtime too
    let jpeg = blocking(move || {
        overlay::compose(
            &photo,
            &map,
            &icon,
            &fonts,
            &OverlayContent::default(),
            &mut rand::thread_rng(),
            &SystemClock,
        )
    })
    .await
    .map_err(|e| {
        tracing::error!("composition failed: {e}");
        reply_error(e)
    })?;

    let filename = format!("image_{}.jpg", chrono::Utc::now().timestamp_millis());
    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        jpeg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_prefix_is_stripped() {
        assert_eq!(
            parse_data_uri("data:image/png;base64,AAAA").as_deref(),
            Some("AAAA")
        );
        assert_eq!(parse_data_uri("  AAAA  ").as_deref(), Some("AAAA"));
        assert!(parse_data_uri("").is_none());
        // data prefix without a comma is malformed
        assert!(parse_data_uri("data:image/png;base64").is_none());
    }

    #[test]
    fn b64_decode_rejects_garbage() {
        assert!(b64_decode("!!!").is_none());
        assert_eq!(b64_decode("aGk=").unwrap(), b"hi");
    }

    #[test]
    fn only_client_faults_map_to_bad_request() {
        assert_eq!(
            reply_error(OverlayError::Decode("bad photo".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            reply_error(OverlayError::DegenerateGeometry("thin".into())).0,
            StatusCode::BAD_REQUEST
        );
        // bundle problems are the server's fault, never the client's
        assert_eq!(
            reply_error(OverlayError::Asset("map.png gone".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            reply_error(OverlayError::Font("font gone".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            reply_error(OverlayError::Encode("jpeg".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn decode_photo_reports_bad_bytes_as_decode_errors() {
        let b64 = base64::engine::general_purpose::STANDARD.encode(b"not an image");
        match decode_photo(&b64) {
            Err(OverlayError::Decode(_)) => {}
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn decode_photo_accepts_a_png_data_uri() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        let decoded = decode_photo(&uri).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
