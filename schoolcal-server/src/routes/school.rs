//! School calendar endpoint

use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use schoolcal_core::{ScheduleSource, SchoolKey};
use serde::Deserialize;
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router<S: ScheduleSource + 'static>() -> Router<AppState<S>> {
    Router::new().route("/school", get(school_calendar::<S>))
}

/// Query parameters, named as in the NEIS API.
#[derive(Deserialize)]
pub struct SchoolQuery {
    #[serde(rename = "ATPT_OFCDC_SC_CODE")]
    pub office_code: Option<String>,
    #[serde(rename = "SD_SCHUL_CODE")]
    pub school_code: Option<String>,
}

/// GET /school - The school's academic calendar as an .ics download
async fn school_calendar<S: ScheduleSource + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<SchoolQuery>,
) -> Result<Response, AppError> {
    let key = match (query.office_code.as_deref(), query.school_code.as_deref()) {
        (Some(office), Some(school)) => SchoolKey::new(office, school),
        _ => None,
    }
    .ok_or(AppError::Usage)?;

    let calendar = state.gate().calendar(&key).await?;
    info!(%key, status = ?calendar.status, "serving school calendar");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=school_schedule.ics",
            ),
        ],
        calendar.ics,
    )
        .into_response())
}
