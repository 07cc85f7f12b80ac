pub mod school;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schoolcal_core::SchoolCalError;
use tracing::error;

/// Shown when the school query parameters are missing or invalid.
pub const USAGE: &str = "시도교육청 코드와 학교 코드를 입력해주세요. 예) /school?ATPT_OFCDC_SC_CODE=C10&SD_SCHUL_CODE=7150658";

/// Errors returned to HTTP clients.
///
/// Bodies are short plain-text messages; the underlying error is only
/// logged server-side.
#[derive(Debug)]
pub enum AppError {
    Usage,
    Schedule(SchoolCalError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self {
            AppError::Usage => return (StatusCode::BAD_REQUEST, USAGE).into_response(),
            AppError::Schedule(err) => err,
        };

        error!(error = %err, "could not build school calendar");

        let (status, message) = match err {
            SchoolCalError::Transport(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "NEIS 서버에 연결할 수 없습니다. 잠시 후 다시 시도해주세요.",
            ),
            SchoolCalError::Upstream(_) | SchoolCalError::MalformedResponse(_) => (
                StatusCode::BAD_GATEWAY,
                "NEIS 서버에서 학사일정을 가져오지 못했습니다.",
            ),
            SchoolCalError::MalformedDate(_)
            | SchoolCalError::Config(_)
            | SchoolCalError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "오류가 발생했습니다."),
        };
        (status, message).into_response()
    }
}

impl From<SchoolCalError> for AppError {
    fn from(err: SchoolCalError) -> Self {
        AppError::Schedule(err)
    }
}
