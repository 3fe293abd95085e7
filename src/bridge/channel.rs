use crate::bridge::dispatcher::Dispatcher;
use crate::model::args::ArgumentBag;
use crate::model::envelope::{FailureKind, ResponseEnvelope};

/// Serves one dispatcher under every configured channel name.
#[derive(Clone)]
pub struct ChannelRouter {
    channels: Vec<String>,
    dispatcher: Dispatcher,
}

impl ChannelRouter {
    pub fn new(channels: Vec<String>, dispatcher: Dispatcher) -> Self {
        let mut unique = Vec::with_capacity(channels.len());
        for channel in channels {
            if !unique.contains(&channel) {
                unique.push(channel);
            }
        }

        Self {
            channels: unique,
            dispatcher,
        }
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn default_channel(&self) -> Option<&str> {
        self.channels.first().map(String::as_str)
    }

    pub fn route(&self, channel: &str, method: &str, args: ArgumentBag) -> ResponseEnvelope {
        if !self.channels.iter().any(|known| known == channel) {
            tracing::debug!(channel, method, "call on unknown channel");
            return ResponseEnvelope::failure(
                FailureKind::MethodNotFound,
                format!("{channel}/{method}"),
            );
        }

        self.dispatcher.dispatch(method, args)
    }
}
