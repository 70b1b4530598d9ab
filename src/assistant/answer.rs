//! Answer generation from the text of the ranked pages

use rig::completion::CompletionModel;
use tracing::{debug, info, instrument};

use super::complete_text;
use super::error::AnswerError;
use super::prompts::{answer_preamble, question_prompt, render_context};

/// Ask the model to answer a question from the given page texts
///
/// Missing page texts are treated as empty context. The reply is returned as
/// the model wrote it.
#[instrument(skip(model, contents), fields(pages = contents.len()))]
pub async fn generate_answer<C>(
    model: &C,
    institution: &str,
    question: &str,
    contents: &[Option<&str>],
    max_retries: u32,
) -> Result<String, AnswerError>
where
    C: CompletionModel + Clone,
{
    info!("Generating chatbot response for question: {}", question);
    let context = render_context(contents);
    debug!("Answer context of {} bytes", context.len());

    let preamble = answer_preamble(institution, question, &context);
    let answer = complete_text(model, &preamble, &question_prompt(question), max_retries).await?;

    debug!("Chatbot response generated successfully.");
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock_model::MockCompletionModel;

    #[tokio::test]
    async fn test_greeting_makes_one_request() {
        let model = MockCompletionModel::new();
        model.set_text_response("Hello! How can I help you?").await;

        let answer = generate_answer(&model, "GAC Salem 7", "hello", &[], 2)
            .await
            .unwrap();

        assert!(!answer.is_empty());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_contents_do_not_fail() {
        let model = MockCompletionModel::new();
        model.set_text_response("I could not find that.").await;

        let answer = generate_answer(&model, "GAC Salem 7", "cs hod?", &[None, None, None], 0)
            .await
            .unwrap();

        assert_eq!(answer, "I could not find that.");
    }

    #[tokio::test]
    async fn test_transport_failures_are_retried() {
        let model = MockCompletionModel::new();
        model.push_error_response("connection reset").await;
        model.push_error_response("connection reset").await;
        model.set_text_response("Answer").await;

        let answer = generate_answer(&model, "GAC Salem 7", "q", &[Some("ctx")], 2)
            .await
            .unwrap();

        assert_eq!(answer, "Answer");
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_failure_after_retries() {
        let model = MockCompletionModel::new();
        model.set_error_response("quota exceeded").await;

        let result = generate_answer(&model, "GAC Salem 7", "q", &[], 2).await;

        assert!(matches!(result, Err(AnswerError::Completion(_))));
        assert_eq!(model.calls(), 3);
    }
}
