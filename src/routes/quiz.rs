use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};
use axum_extra::extract::WithRejection;

use crate::dto::quiz_dto::{
    AnswerRequest, LanguagesResponse, NavigateRequest, NavigateResponse, OkResponse,
    ReviewResponse, StartQuizRequest, StartQuizResponse,
};
use crate::error::{Error, Result};
use crate::middleware::session::CurrentSession;
use crate::models::quiz_session::{Direction, QuizSession};
use crate::AppState;

const NOT_STARTED: &str = "Quiz not started";

fn active_quiz(quiz: Option<&mut QuizSession>) -> Result<&mut QuizSession> {
    quiz.ok_or_else(|| Error::State(NOT_STARTED.to_string()))
}

#[axum::debug_handler]
pub async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: state.quiz_service.bank().languages(),
    })
}

#[axum::debug_handler]
pub async fn start_quiz(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    WithRejection(Json(req), _): WithRejection<Json<StartQuizRequest>, Error>,
) -> Result<Response> {
    let mut data = session.lock().await;
    let quiz = state
        .quiz_service
        .start(req.into_params(), &data.detected_languages)
        .map_err(|e| {
            tracing::warn!(error = %e, "Quiz start rejected");
            e
        })?;

    let response = StartQuizResponse {
        ok: true,
        total: quiz.total(),
        languages: quiz.languages().to_vec(),
    };
    data.quiz = Some(quiz);
    Ok(Json(response).into_response())
}

#[axum::debug_handler]
pub async fn get_state(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Response> {
    let mut data = session.lock().await;
    let quiz = active_quiz(data.quiz.as_mut())?;
    Ok(Json(quiz.current()).into_response())
}

#[axum::debug_handler]
pub async fn answer_question(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    WithRejection(Json(req), _): WithRejection<Json<AnswerRequest>, Error>,
) -> Result<Response> {
    let mut data = session.lock().await;
    let quiz = active_quiz(data.quiz.as_mut())?;
    let question_id = req
        .question_id
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::BadRequest("Invalid questionId".to_string()))?;
    let answer_index = req
        .answer_index
        .as_ref()
        .and_then(|v| v.as_i64())
        .ok_or_else(|| Error::BadRequest("Invalid answerIndex".to_string()))?;

    quiz.answer(question_id, answer_index)?;
    Ok(Json(OkResponse { ok: true }).into_response())
}

#[axum::debug_handler]
pub async fn navigate(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    WithRejection(Json(req), _): WithRejection<Json<NavigateRequest>, Error>,
) -> Result<Response> {
    let mut data = session.lock().await;
    let quiz = active_quiz(data.quiz.as_mut())?;
    let direction = req
        .direction
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(Direction::parse);
    let current_index = quiz.navigate(direction);
    Ok(Json(NavigateResponse { current_index }).into_response())
}

#[axum::debug_handler]
pub async fn submit_quiz(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Response> {
    let mut data = session.lock().await;
    let quiz = active_quiz(data.quiz.as_mut())?;
    let already = quiz.is_submitted();
    let result = quiz.submit();
    if !already {
        tracing::info!(
            score = result.score,
            threshold = result.threshold,
            passed = result.passed,
            total = result.total,
            "Quiz submitted"
        );
    }
    Ok(Json(result).into_response())
}

#[axum::debug_handler]
pub async fn get_result(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Response> {
    let data = session.lock().await;
    let result = data
        .quiz
        .as_ref()
        .ok_or_else(|| Error::State("No result yet".to_string()))?
        .result()?;
    Ok(Json(result).into_response())
}

#[axum::debug_handler]
pub async fn get_review(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Response> {
    let data = session.lock().await;
    let review = data
        .quiz
        .as_ref()
        .ok_or_else(|| Error::State("No review available".to_string()))?
        .review()?;
    Ok(Json(ReviewResponse { review }).into_response())
}
