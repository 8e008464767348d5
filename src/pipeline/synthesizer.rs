use crate::completion::TextCompleter;
use crate::errors::GenieError;

/// One completion over `summary + final_instruction`.
///
/// This is the terminal call of a long-path request, so a failure is
/// surfaced as [`GenieError::FinalCompletionFailed`] rather than skipped.
pub async fn synthesize(
    completer: &dyn TextCompleter,
    summary: &str,
    final_instruction: &str,
) -> Result<String, GenieError> {
    let prompt = format!("{}{}", summary, final_instruction);
    tracing::debug!(prompt_chars = prompt.len(), "Synthesizing final answer");
    completer
        .complete(&prompt)
        .await
        .map_err(GenieError::FinalCompletionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompletionError;
    use crate::testing::MockCompleter;

    #[tokio::test]
    async fn test_single_call_with_summary_then_instruction() {
        let completer = MockCompleter::new(|_, _| Ok("# README".into()));
        let text = synthesize(&completer, "[a][b]", " Write a readme.")
            .await
            .unwrap();

        assert_eq!(text, "# README");
        assert_eq!(completer.prompts(), vec!["[a][b] Write a readme."]);
    }

    #[tokio::test]
    async fn test_empty_summary_still_calls_once() {
        let completer = MockCompleter::numbered();
        synthesize(&completer, "", "instruction").await.unwrap();
        assert_eq!(completer.prompts(), vec!["instruction"]);
    }

    #[tokio::test]
    async fn test_failure_is_typed() {
        let completer = MockCompleter::new(|_, _| {
            Err(CompletionError::Status {
                status: 429,
                body: "quota".into(),
            })
        });
        let err = synthesize(&completer, "s", "i").await.unwrap_err();
        match err {
            GenieError::FinalCompletionFailed(CompletionError::Status { status, .. }) => {
                assert_eq!(status, 429)
            }
            other => panic!("Expected FinalCompletionFailed, got {:?}", other),
        }
    }
}
