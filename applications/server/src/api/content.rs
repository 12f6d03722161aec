/// Content API routes: catalog listing, covers, and audio
use crate::{
    error::{Result, ServerError},
    middleware::BearerCredential,
    state::AppState,
};
use annil_core::{CatalogResource, ContentStream};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tokio_util::io::ReaderStream;

/// Path segment naming a catalog's cover instead of a track
const COVER_SEGMENT: &str = "cover";

/// GET /albums
/// List every catalog known to any backend
pub async fn list_albums(State(app_state): State<AppState>) -> Json<Vec<String>> {
    Json(app_state.library.list_catalogs().await)
}

/// GET /:catalog/:item
/// Stream a cover (`item == "cover"`) or a track (`item` is 0..=255)
pub async fn get_item(
    State(app_state): State<AppState>,
    Path((catalog, item)): Path<(String, String)>,
    credential: BearerCredential,
) -> Result<Response> {
    let resource = if item == COVER_SEGMENT {
        CatalogResource::cover(catalog)
    } else {
        CatalogResource::track(catalog, CatalogResource::parse_track(&item)?)
    };

    app_state
        .permissions
        .evaluate(credential.token(), &resource)
        .await
        .into_result()?;

    match resource.track {
        None => {
            let cover = app_state.library.get_cover(&resource.catalog).await?;
            stream_response(cover, None)
        }
        Some(track) => {
            let (audio_type, audio) = app_state
                .library
                .get_audio(&resource.catalog, track)
                .await?;
            stream_response(audio, audio_type.content_type())
        }
    }
}

fn stream_response(content: ContentStream, content_type: Option<&'static str>) -> Result<Response> {
    let mut builder = Response::builder().status(StatusCode::OK);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder
        .body(Body::from_stream(ReaderStream::new(content)))
        .map_err(|e| ServerError::Internal(e.to_string()))
}
