use movcat_dal::movie::MovieRepository;

use crate::movie::service::MovieService;
use crate::state::AppState;
#[allow(unused_imports)]
use axum::routing::{delete, get, patch, post};

impl axum::extract::FromRequestParts<AppState> for MovieService {
    type Rejection = http::StatusCode;

    fn from_request_parts(
        _parts: &mut http::request::Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = std::result::Result<Self, Self::Rejection>> + core::marker::Send
    {
        futures::future::ready(std::result::Result::Ok(MovieService::new(
            MovieRepository::new(state.pool().clone()),
        )))
    }
}

mod crud_api {
    use super::*;
    use crate::error::ApiResult;
    use crate::movie::MovieWire;
    use crate::rest_api::Paging;
    use axum::{
        Json,
        extract::{Path, Query, State},
        response::IntoResponse,
    };
    use axum_valid::Garde;
    use http::StatusCode;
    use tracing::debug;

    pub async fn list(
        State(state): State<AppState>,
        service: MovieService,
        Garde(Query(paging)): Garde<Query<Paging>>,
    ) -> ApiResult<impl IntoResponse> {
        debug!("Paging: {:#?}", paging);
        let page_size = paging.page_size(state.get_app_config().default_page_size);
        let listing_params = paging.into_listing_params(page_size)?;
        let page = service.get_all_pageable(listing_params, page_size).await?;
        Ok((StatusCode::OK, Json(page)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        service: MovieService,
    ) -> ApiResult<impl IntoResponse> {
        let record = service.find_by_id(id).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn create(
        service: MovieService,
        Json(payload): Json<MovieWire>,
    ) -> ApiResult<impl IntoResponse> {
        let record = service.create(payload).await?;

        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn update(
        Path(id): Path<i64>,
        service: MovieService,
        Json(payload): Json<MovieWire>,
    ) -> ApiResult<impl IntoResponse> {
        let record = service.update(id, payload).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn delete(
        Path(id): Path<i64>,
        service: MovieService,
    ) -> ApiResult<impl IntoResponse> {
        service.delete_by_id(id).await?;

        Ok((StatusCode::NO_CONTENT, ()))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route(
            "/{id}",
            get(crud_api::get)
                .patch(crud_api::update)
                .delete(crud_api::delete),
        )
}
