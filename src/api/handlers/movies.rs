//! Sample resource behind the access guard.

use axum::{
    extract::Extension,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::auth::{Claims, ErrorResponse};

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub title: String,
    pub year: u16,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Movies {
    pub movies: Vec<Movie>,
}

fn catalog() -> Vec<Movie> {
    vec![Movie {
        title: "The Shawshank Redemption".to_string(),
        year: 1994,
    }]
}

#[utoipa::path(
    get,
    path = "/index/movies",
    responses(
        (status = 200, description = "Movie list", body = Movies),
        (status = 401, description = "Missing, mismatched or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "index"
)]
#[instrument(skip_all)]
pub async fn movies(claims: Option<Extension<Claims>>) -> impl IntoResponse {
    if let Some(Extension(claims)) = claims {
        debug!(email = %claims.email, "Listing movies");
    }
    Json(Movies { movies: catalog() })
}
