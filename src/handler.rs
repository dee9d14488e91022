//! Handler-under-test contract
//!
//! A skill handler receives a request plus a [`Completion`] and must
//! eventually report exactly one outcome through it. The completion can be
//! moved into a spawned task, so handlers are free to finish asynchronously.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::HandlerError;
use crate::request::Request;

type Outcome = std::result::Result<Value, anyhow::Error>;

/// The success/failure pair handed to a handler for one invocation.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<Outcome>,
}

impl Completion {
    fn new() -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Resolve the turn with the handler's raw result.
    pub fn succeed(self, result: Value) {
        // The receiver only disappears once the conversation is gone.
        let _ = self.tx.send(Ok(result));
    }

    /// Fail the turn and, with it, the rest of the conversation.
    pub fn fail(self, error: impl Into<anyhow::Error>) {
        let _ = self.tx.send(Err(error.into()));
    }
}

/// A skill entry point under test.
pub trait SkillHandler: Send + Sync {
    fn handle(&self, request: Request, completion: Completion);
}

impl<F> SkillHandler for F
where
    F: Fn(Request, Completion) + Send + Sync,
{
    fn handle(&self, request: Request, completion: Completion) {
        self(request, completion);
    }
}

/// An application object that can supply its own handler.
pub trait SkillApp {
    fn handler(&self) -> Option<Arc<dyn SkillHandler>>;
}

/// Send `request` to `handler` and wait for its single outcome.
pub async fn invoke(handler: &dyn SkillHandler, request: Request) -> Result<Value, HandlerError> {
    let intent = request.intent_name().to_string();
    let (completion, outcome) = Completion::new();

    if let Err(payload) =
        std::panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request, completion)))
    {
        return Err(HandlerError::Panicked(panic_message(payload.as_ref())));
    }

    match outcome.await {
        Ok(Ok(result)) => {
            debug!(intent = %intent, "handler succeeded");
            Ok(result)
        }
        Ok(Err(error)) => {
            debug!(intent = %intent, error = %error, "handler failed");
            Err(HandlerError::Failed(error))
        }
        Err(_) => Err(HandlerError::Abandoned),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
