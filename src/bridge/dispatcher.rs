use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::bridge::error::RegistryError;
use crate::bridge::platform::PlatformCapabilities;
use crate::bridge::registry::SealedRegistry;
use crate::model::args::ArgumentBag;
use crate::model::envelope::{FailureKind, ResponseEnvelope};

const INTERNAL_ERROR_MESSAGE: &str = "internal error while handling call";

/// Progress of a single call. Strictly linear; any failure jumps to
/// `Responded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Received,
    Validated,
    Executed,
    Responded,
}

/// Entry point for every incoming call.
///
/// Holds no per-call state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct Dispatcher {
    registry: SealedRegistry,
    platform: Arc<dyn PlatformCapabilities>,
}

impl Dispatcher {
    pub fn new(registry: SealedRegistry, platform: Arc<dyn PlatformCapabilities>) -> Self {
        Self { registry, platform }
    }

    pub fn registry(&self) -> &SealedRegistry {
        &self.registry
    }

    /// Inbound call boundary exposed to transports.
    pub fn invoke(&self, method: &str, arguments: ArgumentBag) -> ResponseEnvelope {
        self.dispatch(method, arguments)
    }

    pub fn dispatch(&self, method: &str, args: ArgumentBag) -> ResponseEnvelope {
        let span = tracing::debug_span!("dispatch", method, args = args.len());
        let _enter = span.enter();
        trace_state(CallState::Received);

        let entry = match self.registry.lookup(method) {
            Ok(entry) => entry,
            Err(RegistryError::UnknownMethod(name)) => {
                return respond(ResponseEnvelope::failure(FailureKind::MethodNotFound, name));
            }
            Err(err) => {
                return respond(ResponseEnvelope::failure(
                    FailureKind::InternalError,
                    err.to_string(),
                ));
            }
        };

        if let Err(err) = entry.schema.validate(&args) {
            return respond(ResponseEnvelope::failure(
                FailureKind::InvalidArguments,
                err.to_string(),
            ));
        }
        trace_state(CallState::Validated);

        if let Some(missing) = entry
            .requires
            .iter()
            .find(|capability| !self.platform.supports(**capability))
        {
            return respond(ResponseEnvelope::failure(
                FailureKind::HandlerError,
                format!("capability unavailable: {missing}"),
            ));
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            entry.call(&args, self.platform.as_ref())
        }));
        trace_state(CallState::Executed);

        let envelope = match outcome {
            Ok(Ok(value)) => ResponseEnvelope::success(value),
            Ok(Err(err)) => ResponseEnvelope::failure(FailureKind::HandlerError, err.to_string()),
            Err(payload) => {
                tracing::error!(panic = %panic_message(payload.as_ref()), "handler panicked");
                ResponseEnvelope::failure(FailureKind::InternalError, INTERNAL_ERROR_MESSAGE)
            }
        };
        respond(envelope)
    }
}

fn trace_state(state: CallState) {
    tracing::trace!(?state, "call state");
}

fn respond(envelope: ResponseEnvelope) -> ResponseEnvelope {
    trace_state(CallState::Responded);
    if let Some(kind) = envelope.failure_kind() {
        tracing::debug!(%kind, "call failed");
    }
    envelope
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
