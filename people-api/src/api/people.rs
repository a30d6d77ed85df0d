//! Person endpoints
//!
//! Successful reads are wrapped as `{"Body": ...}`. DELETE and PATCH answer
//! 200 with no body. Numeric path parameters are validated here rather than
//! in the route pattern so that a malformed value is a logged 400 instead of
//! a silent 404. Extractor rejections (undecodable path segments, unreadable
//! bodies) are turned into [`ApiError`]s for the same reason.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use people_common::Person;
use serde::Serialize;
use std::str::FromStr;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const BAD_PARAMETERS: &str = "problems with parameters";
const GET_FAILED: &str = "problems with getting people";
const BAD_JSON: &str = "problems with unmarshalling json";

type PathParam = Result<Path<String>, PathRejection>;
type RawBody = Result<Bytes, BytesRejection>;

/// Uniform success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "Body")]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(body: T) -> Self {
        Self { body }
    }
}

/// Body of a successful create
#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: u64,
}

type PeopleResponse = ApiResult<Json<Envelope<Vec<Person>>>>;

/// Build person routes
pub fn people_routes() -> Router<AppState> {
    Router::new()
        .route("/people", get(list_people).post(create_person))
        .route(
            "/people/:id",
            get(get_person).delete(delete_person).patch(update_person),
        )
        .route("/people/age/:age", get(list_people_by_age))
        .route("/people/gender/:gender", get(list_people_by_gender))
        .route("/people/nation/:nation", get(list_people_by_nation))
        .route("/people/limit/:limit", get(list_people_with_limit))
}

/// GET /people
pub async fn list_people(State(state): State<AppState>) -> PeopleResponse {
    let people = state
        .people
        .list_all()
        .await
        .map_err(|e| ApiError::service(GET_FAILED, e))?;
    Ok(Json(Envelope::new(people)))
}

/// GET /people/age/:age
pub async fn list_people_by_age(
    State(state): State<AppState>,
    age: PathParam,
) -> PeopleResponse {
    let age: u32 = numeric_param(age, "age")?;
    let people = state
        .people
        .list_by_age(age)
        .await
        .map_err(|e| ApiError::service(GET_FAILED, e))?;
    Ok(Json(Envelope::new(people)))
}

/// GET /people/gender/:gender
pub async fn list_people_by_gender(
    State(state): State<AppState>,
    gender: PathParam,
) -> PeopleResponse {
    let gender = text_param(gender, "gender")?;
    let people = state
        .people
        .list_by_gender(&gender)
        .await
        .map_err(|e| ApiError::service(GET_FAILED, e))?;
    Ok(Json(Envelope::new(people)))
}

/// GET /people/nation/:nation
pub async fn list_people_by_nation(
    State(state): State<AppState>,
    nation: PathParam,
) -> PeopleResponse {
    let nation = text_param(nation, "nation")?;
    let people = state
        .people
        .list_by_nation(&nation)
        .await
        .map_err(|e| ApiError::service(GET_FAILED, e))?;
    Ok(Json(Envelope::new(people)))
}

/// GET /people/limit/:limit
pub async fn list_people_with_limit(
    State(state): State<AppState>,
    limit: PathParam,
) -> PeopleResponse {
    let limit: u64 = numeric_param(limit, "limit")?;
    let people = state
        .people
        .list_with_limit(limit)
        .await
        .map_err(|e| ApiError::service(GET_FAILED, e))?;
    Ok(Json(Envelope::new(people)))
}

/// GET /people/:id
pub async fn get_person(
    State(state): State<AppState>,
    id: PathParam,
) -> ApiResult<Json<Envelope<Person>>> {
    let id: u64 = numeric_param(id, "id")?;
    let person = state
        .people
        .get(id)
        .await
        .map_err(|e| ApiError::service("problems with getting person", e))?;
    Ok(Json(Envelope::new(person)))
}

/// DELETE /people/:id
pub async fn delete_person(
    State(state): State<AppState>,
    id: PathParam,
) -> ApiResult<StatusCode> {
    let id: u64 = numeric_param(id, "id")?;
    state
        .people
        .delete(id)
        .await
        .map_err(|e| ApiError::service("problems deleting person", e))?;
    Ok(StatusCode::OK)
}

/// PATCH /people/:id
///
/// The path id overrides any id in the body.
pub async fn update_person(
    State(state): State<AppState>,
    id: PathParam,
    body: RawBody,
) -> ApiResult<StatusCode> {
    let id: u64 = numeric_param(id, "id")?;
    let mut partial: Person = json_body(body)?;
    partial.id = id;

    state
        .people
        .update(partial)
        .await
        .map_err(|e| ApiError::service("problems updating person", e))?;
    Ok(StatusCode::OK)
}

/// POST /people
///
/// Requires a JSON content type; client-supplied age, gender and nation are
/// replaced by enrichment.
pub async fn create_person(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: RawBody,
) -> ApiResult<(StatusCode, Json<Envelope<CreatedId>>)> {
    if !is_json_content_type(&headers) {
        return Err(ApiError::bad_request("bad content-type", "bad content-type"));
    }

    let person: Person = json_body(body)?;

    let id = state
        .people
        .create(person)
        .await
        .map_err(|e| ApiError::service("problems with creating person", e))?;

    Ok((StatusCode::CREATED, Json(Envelope::new(CreatedId { id }))))
}

/// Numeric path parameter; an undecodable segment is "not number" too
fn numeric_param<T: FromStr>(path: PathParam, param: &str) -> ApiResult<T> {
    match path {
        Ok(Path(raw)) => parse_uint(&raw, param),
        Err(_) => Err(not_number(param)),
    }
}

fn text_param(path: PathParam, param: &str) -> ApiResult<String> {
    path.map(|Path(value)| value).map_err(|rejection| {
        ApiError::bad_request(
            BAD_PARAMETERS,
            format!("{} is not valid: {}", param, rejection.body_text()),
        )
    })
}

/// Buffer and decode a JSON request body
fn json_body(body: RawBody) -> ApiResult<Person> {
    let bytes = body.map_err(|rejection| {
        ApiError::bad_request("problems with reading body", rejection.body_text())
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::bad_request(BAD_JSON, e.to_string()))
}

fn not_number(param: &str) -> ApiError {
    ApiError::bad_request(BAD_PARAMETERS, format!("{} is not number", param))
}

/// Parse a path segment that must be all ASCII digits
fn parse_uint<T: FromStr>(raw: &str, param: &str) -> ApiResult<T> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_number(param));
    }
    raw.parse().map_err(|_| not_number(param))
}

/// `application/json`, optionally with parameters such as charset
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_uint_accepts_digits() {
        assert_eq!(parse_uint::<u32>("31", "age").unwrap(), 31);
        assert_eq!(parse_uint::<u64>("0", "limit").unwrap(), 0);
    }

    #[test]
    fn test_parse_uint_rejects_non_digits() {
        for raw in ["abc", "", "-1", "+1", "1.5", " 1"] {
            let err = parse_uint::<u64>(raw, "age").unwrap_err();
            assert_eq!(err.to_string(), "problems with parameters: age is not number");
        }
    }

    #[test]
    fn test_parse_uint_rejects_overflow() {
        assert!(parse_uint::<u32>("4294967296", "age").is_err());
    }

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json_content_type(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json_content_type(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json_content_type(&headers));
    }

    #[test]
    fn test_envelope_key() {
        let value = serde_json::to_value(Envelope::new(CreatedId { id: 9 })).unwrap();
        assert_eq!(value, serde_json::json!({"Body": {"id": 9}}));
    }
}
