use crate::app::report;
use crate::core::engine::CheckEngine;
use crate::domain::model::EvaluationRequest;
use crate::domain::ports::CompletionClient;
use crate::utils::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One submission: evaluate, render, write. Only validation errors are
/// reported inline; transport and parse failures are part of the report.
pub async fn submit<C, W>(
    engine: &CheckEngine<C>,
    request: &EvaluationRequest,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    C: CompletionClient,
    W: AsyncWrite + Unpin,
{
    let mut evaluation = match engine.evaluate(request).await {
        Ok(evaluation) => evaluation,
        Err(e @ CheckError::ValidationError { .. }) => {
            out.write_all(format!("⚠️ {}\n", e.user_friendly_message()).as_bytes())
                .await?;
            out.flush().await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let rendered = match format {
        OutputFormat::Text => report::render_text(&evaluation),
        OutputFormat::Json => report::render_json(&evaluation)?,
    };
    out.write_all(rendered.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;

    evaluation.mark_rendered();
    tracing::debug!("Evaluation finished in state {:?}", evaluation.state());
    Ok(())
}

/// Prompts for idea/location pairs until an empty idea or end of input.
///
/// Returns the number of submissions made.
pub async fn run_session<C, R, W>(
    engine: &CheckEngine<C>,
    input: R,
    out: &mut W,
    default_location: &str,
    format: OutputFormat,
) -> Result<usize>
where
    C: CompletionClient,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut submissions = 0;

    loop {
        out.write_all(b"Your business idea (empty line to quit): ").await?;
        out.flush().await?;
        let Some(idea) = lines.next_line().await? else {
            break;
        };
        if idea.trim().is_empty() {
            break;
        }

        let prompt = if default_location.is_empty() {
            "Your city or neighbourhood: ".to_string()
        } else {
            format!("Your city or neighbourhood [{}]: ", default_location)
        };
        out.write_all(prompt.as_bytes()).await?;
        out.flush().await?;
        let location = match lines.next_line().await? {
            Some(line) if !line.trim().is_empty() => line.trim().to_string(),
            _ => default_location.to_string(),
        };

        let request = EvaluationRequest::new(idea.trim(), location);
        submissions += 1;
        // 每次提交都是獨立的，失敗只影響這一次
        if let Err(e) = submit(engine, &request, format, out).await {
            tracing::error!("❌ Submission failed: {}", e);
            out.write_all(format!("❌ {}\n", e.user_friendly_message()).as_bytes())
                .await?;
        }
    }

    tracing::info!("👋 Session ended after {} submissions", submissions);
    Ok(submissions)
}
