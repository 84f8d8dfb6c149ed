use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::compose,
    ),
    components(
        schemas(api::ComposeRequest, api::HealthResponse)
    ),
    tags(
        (name = "mapcam", description = "GPS map-camera overlay backend API")
    )
)]
pub struct ApiDoc;
