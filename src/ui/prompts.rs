//! The pre-copy pause

use super::context::UiContext;
use crate::error::{DumpError, DumpResult};

/// Give the user a chance to quit Discord before copying.
///
/// Returns `false` if the user declines. Without a terminal, or with
/// `--noninteractive`, the dump proceeds immediately.
pub async fn confirm_continue(ctx: &UiContext) -> DumpResult<bool> {
    if ctx.auto_yes() || !ctx.is_interactive() {
        return Ok(true);
    }

    // cliclack blocks on the terminal
    tokio::task::spawn_blocking(|| {
        cliclack::confirm("Press enter to continue")
            .initial_value(true)
            .interact()
    })
    .await
    .map_err(|e| DumpError::Internal(format!("prompt task failed: {}", e)))?
    .map_err(|e| DumpError::User(format!("Prompt aborted: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noninteractive_flag_continues() {
        let ctx = UiContext::detect().with_auto_yes(true);
        assert!(confirm_continue(&ctx).await.unwrap());
    }

    #[tokio::test]
    async fn no_terminal_continues() {
        let ctx = UiContext::non_interactive();
        assert!(confirm_continue(&ctx).await.unwrap());
    }
}
