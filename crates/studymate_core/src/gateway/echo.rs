//! Offline placeholder gateway.

use super::{GatewayResult, ModelGateway};

const SYSTEM_PREVIEW_CHARS: usize = 120;
const USER_PREVIEW_CHARS: usize = 200;

/// Gateway that echoes truncated prompts back instead of calling a model.
///
/// Selected when no model endpoint is configured.
/// Its replies are never valid decisions, so every request routes to chat.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoGateway;

impl ModelGateway for EchoGateway {
    fn respond(&self, system_instruction: &str, user_instruction: &str) -> GatewayResult<String> {
        Ok(format!(
            "Dummy LLM response.\nSystem prompt (truncated): {}...\n\nUser said: {}...",
            take_chars(system_instruction, SYSTEM_PREVIEW_CHARS),
            take_chars(user_instruction, USER_PREVIEW_CHARS),
        ))
    }
}

fn take_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &value[..byte_index],
        None => value,
    }
}
