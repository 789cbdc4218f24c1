//! Answer submission round-trip.
//!
//! One POST per answered question, no retries. Every failure mode (transport,
//! non-2xx status, undecodable body) comes back as `SubmitError`; the caller
//! substitutes the synthesized failure reply so the session keeps moving.

use gloo_net::http::Request;

use super::wire::{ANSWER_ENDPOINT, AnswerReply, AnswerRequest, SubmitError};

pub(crate) async fn post_answer(request: &AnswerRequest) -> Result<AnswerReply, SubmitError> {
    let response = Request::post(ANSWER_ENDPOINT)
        .json(request)
        .map_err(|err| SubmitError::Transport(err.to_string()))?
        .send()
        .await
        .map_err(|err| SubmitError::Transport(err.to_string()))?;
    if !response.ok() {
        return Err(SubmitError::Transport(format!(
            "unexpected status {}",
            response.status()
        )));
    }
    let body = response
        .text()
        .await
        .map_err(|err| SubmitError::Transport(err.to_string()))?;
    AnswerReply::from_json(&body)
}
