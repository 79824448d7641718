//! Language-model gateway.
//!
//! # Responsibility
//! - Define the two-strings-in, one-string-out model contract.
//! - Select the offline echo or HTTP implementation from configuration.
//!
//! # Invariants
//! - Gateways never retry; a failed call fails the whole request.
//! - Replies are returned verbatim; callers decide how to interpret them.

pub mod echo;
pub mod http;

use crate::config::ModelConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use echo::EchoGateway;
pub use http::HttpGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Model gateway failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The model could not produce a reply (transport, timeout, non-2xx,
    /// undecodable or empty body).
    Unavailable { reason: String },
    /// The gateway could not be constructed from configuration.
    InvalidConfig(String),
}

impl GatewayError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "model unavailable: {reason}"),
            Self::InvalidConfig(message) => write!(f, "invalid model configuration: {message}"),
        }
    }
}

impl Error for GatewayError {}

/// Opaque language-model capability.
pub trait ModelGateway {
    /// Sends one system + user instruction pair and returns the raw reply.
    fn respond(&self, system_instruction: &str, user_instruction: &str) -> GatewayResult<String>;
}

impl<G: ModelGateway + ?Sized> ModelGateway for Box<G> {
    fn respond(&self, system_instruction: &str, user_instruction: &str) -> GatewayResult<String> {
        (**self).respond(system_instruction, user_instruction)
    }
}

impl<G: ModelGateway + ?Sized> ModelGateway for &G {
    fn respond(&self, system_instruction: &str, user_instruction: &str) -> GatewayResult<String> {
        (**self).respond(system_instruction, user_instruction)
    }
}

/// Builds the gateway selected by `config`.
///
/// No `base_url` yields [`EchoGateway`]; otherwise an [`HttpGateway`].
pub fn build_gateway(config: &ModelConfig) -> GatewayResult<Box<dyn ModelGateway>> {
    if config.is_offline() {
        log::info!("event=gateway_init module=gateway status=ok kind=echo");
        return Ok(Box::new(EchoGateway));
    }
    let gateway = HttpGateway::new(config)?;
    log::info!(
        "event=gateway_init module=gateway status=ok kind=http model={}",
        config.model
    );
    Ok(Box::new(gateway))
}
