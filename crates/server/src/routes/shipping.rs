//! Shipping destination lookup.
//!
//! City lists change rarely, so lookups are cached per `(country, prefix)`
//! for `GIFTLY_CITY_CACHE_TTL_SECS`.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::db::catalog::ShippingCity;
use crate::error::{AppError, Result};
use crate::state::{AppState, CityCacheKey};

const MAX_PREFIX_CHARS: usize = 64;
const MAX_CITIES: i64 = 50;

/// Shipping city query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CitiesQuery {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

/// Cities of one country.
#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub country: String,
    pub cities: Vec<ShippingCity>,
}

impl CitiesQuery {
    /// Normalised cache key: upper-case ISO-3166 alpha-2 code and lower-case prefix.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a missing or malformed country code
    /// or an overlong prefix.
    pub fn cache_key(&self) -> Result<CityCacheKey> {
        let country = self.country.as_deref().map_or("", str::trim);
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::BadRequest(
                "country must be a two-letter ISO 3166 code".to_owned(),
            ));
        }

        let prefix = self.q.as_deref().map_or("", str::trim);
        if prefix.chars().count() > MAX_PREFIX_CHARS {
            return Err(AppError::BadRequest(format!(
                "q must be at most {MAX_PREFIX_CHARS} characters"
            )));
        }

        Ok((country.to_ascii_uppercase(), prefix.to_lowercase()))
    }
}

/// `GET /api/shipping/cities?country=&q=`
#[instrument(skip(state))]
pub async fn cities(
    State(state): State<AppState>,
    query: std::result::Result<Query<CitiesQuery>, QueryRejection>,
) -> Result<Json<CitiesResponse>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let key = query.cache_key()?;

    if let Some(cities) = state.city_cache().get(&key).await {
        tracing::debug!(country = %key.0, "City cache hit");
        return Ok(Json(CitiesResponse {
            country: key.0,
            cities,
        }));
    }

    let (country, prefix) = &key;
    let cities = CatalogRepository::new(state.pool())
        .shipping_cities(
            country,
            Some(prefix.as_str()).filter(|p| !p.is_empty()),
            MAX_CITIES,
        )
        .await?;

    state.city_cache().insert(key.clone(), cities.clone()).await;

    Ok(Json(CitiesResponse {
        country: key.0,
        cities,
    }))
}
