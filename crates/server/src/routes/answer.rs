use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse};
use mcguess_common::McGuessError;
use tracing::{debug, info};

use crate::state::AppState;
use crate::types::AnswerRequest;

/// Pick the answer most related to the question
///
/// - 200: chosen answer text
/// - 400: empty/malformed body or missing `"#Q"`
/// - 422: no answer could be scored
#[post("/")]
pub async fn answer(
    body: web::Bytes,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let req = match AnswerRequest::parse(&body) {
        Ok(req) => req,
        Err(e) => return Ok(error_response(&e)),
    };

    let question = match req.question() {
        Ok(question) => question.to_string(),
        Err(e) => return Ok(error_response(&e)),
    };
    let candidates = req.candidates();
    debug!("Question with {} answers: {}", candidates.len(), question);

    // CPU-bound and synchronous; keep it off the async workers
    let guesser = state.guesser.clone();
    let guess = web::block(move || guesser.guess(&question, &candidates))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    match guess {
        Some(text) => {
            info!("Answered: {}", text);
            Ok(HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(text))
        }
        None => Ok(error_response(&McGuessError::unprocessable(
            "No answer could be scored",
        ))),
    }
}

fn error_response(err: &McGuessError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    debug!("Rejecting request with {}: {}", status, err);
    HttpResponse::build(status).body(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use actix_web::{http::header::ContentType, test, App};
    use mcguess_guesser::Resources;
    use mcguess_text::{PosLexicon, StopWords};
    use mcguess_vector::WordVectorStore;
    use std::sync::Arc;

    fn state() -> Arc<AppState> {
        let store = WordVectorStore::from_vectors(vec![
            ("capital", vec![0.9, 0.1, 0.0]),
            ("france", vec![0.8, 0.2, 0.1]),
            ("paris", vec![0.95, 0.05, 0.05]),
            ("banana", vec![0.0, 0.1, 0.9]),
        ])
        .unwrap();
        let stop_words: StopWords = ["what"].into_iter().collect();
        let resources = Resources::new(
            store,
            stop_words,
            vec!["DT".to_string(), "IN".to_string()],
            PosLexicon::builtin(),
        );
        Arc::new(AppState::new(resources, 1).unwrap())
    }

    async fn post(body: &'static str) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(ContentType::json())
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn test_answers_question() {
        let (status, body) = post(
            r##"{"#Q": "What is the capital of France?", "A": "banana", "B": "Paris", "^": "Paris"}"##,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Paris");
    }

    #[actix_web::test]
    async fn test_empty_body_is_bad_request() {
        let (status, _) = post("").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, _) = post("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_question_is_bad_request() {
        let (status, _) = post(r#"{"A": "Paris"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_null_question_is_bad_request() {
        let (status, body) = post(r##"{"#Q": null, "A": "Paris"}"##).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("#Q"));
    }

    #[actix_web::test]
    async fn test_unscorable_is_unprocessable() {
        let (status, _) = post(r##"{"#Q": "What is the capital of France?", "A": "xyz"}"##).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = post(r##"{"#Q": "What is the capital of France?"}"##).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["vocabulary"], 4);
        assert_eq!(resp["dimension"], 3);
        assert_eq!(resp["stop_words"], 1);
    }
}
