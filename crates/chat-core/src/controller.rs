//! Request lifecycle for a single chat exchange.
//!
//! The controller owns the draft and the [`RequestState`]. Renderers read
//! both through accessors or a [`watch`] subscription and feed user intent
//! back through [`RequestController::update_draft`] and
//! [`RequestController::dispatch`] / [`RequestController::submit`].
//!
//! Only one request may be in flight. A second submit while `Pending` is
//! rejected with [`SubmitError::Busy`]; renderers are expected to disable
//! their trigger so the rejection is never observed in practice.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::model::{ChatError, ChatReply, RequestState};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    pub clear_draft_on_submit: bool,
}

impl From<&ClientConfig> for ControllerOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            clear_draft_on_submit: config.clear_draft_on_submit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a chat request is already in flight")]
    Busy,
}

/// Outcome of one transport call, tagged with the request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub id: u64,
    pub outcome: Result<ChatReply, ChatError>,
}

/// A request that has entered `Pending` but whose transport call has not run yet.
///
/// Carries everything the call needs so it can be moved onto another task
/// while the owner keeps rendering.
pub struct Dispatch<T: Transport + ?Sized> {
    id: u64,
    message: String,
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> Dispatch<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Perform the transport call. Never panics: a panicking transport
    /// resolves as a failure with the fallback message.
    pub async fn run(self) -> Resolution {
        let Dispatch {
            id,
            message,
            transport,
        } = self;

        // The call itself sits inside the guarded future: a transport may
        // panic before it ever hands back a future.
        let outcome = match AssertUnwindSafe(async { transport.send(&message).await })
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(id, "transport panicked, resolving request as failed");
                Err(ChatError::fallback())
            }
        };

        Resolution { id, outcome }
    }
}

pub struct RequestController<T: Transport + ?Sized> {
    transport: Arc<T>,
    options: ControllerOptions,
    draft: String,
    state: RequestState,
    in_flight: Option<u64>,
    next_id: u64,
    notify: watch::Sender<RequestState>,
}

impl<T: Transport + ?Sized> RequestController<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_options(transport, ControllerOptions::default())
    }

    pub fn with_options(transport: Arc<T>, options: ControllerOptions) -> Self {
        let (notify, _) = watch::channel(RequestState::Idle);
        Self {
            transport,
            options,
            draft: String::new(),
            state: RequestState::Idle,
            in_flight: None,
            next_id: 1,
            notify,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Observe every state the controller enters.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.notify.subscribe()
    }

    /// Replace the draft. Allowed in every state and never touches the request state.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Enter `Pending` and hand back the call to perform.
    ///
    /// The draft is sent exactly as typed, empty or not. Any previous response
    /// or error is cleared before this returns.
    pub fn dispatch(&mut self) -> Result<Dispatch<T>, SubmitError> {
        if let Some(id) = self.in_flight {
            debug!(in_flight = id, "submit rejected, request already in flight");
            return Err(SubmitError::Busy);
        }

        let id = self.next_id;
        self.next_id += 1;

        let message = if self.options.clear_draft_on_submit {
            std::mem::take(&mut self.draft)
        } else {
            self.draft.clone()
        };

        self.in_flight = Some(id);
        self.enter(RequestState::Pending);
        debug!(id, len = message.len(), "chat request dispatched");

        Ok(Dispatch {
            id,
            message,
            transport: Arc::clone(&self.transport),
        })
    }

    /// Apply a finished call. Returns `false` if it does not belong to the
    /// request currently in flight, in which case nothing changes.
    pub fn resolve(&mut self, resolution: Resolution) -> bool {
        if self.in_flight != Some(resolution.id) {
            debug!(
                id = resolution.id,
                in_flight = ?self.in_flight,
                "ignoring stale resolution"
            );
            return false;
        }

        self.in_flight = None;
        self.enter(resolution.outcome.into());
        true
    }

    /// Dispatch, wait for the transport and apply the result.
    ///
    /// If this future is dropped before the transport answers, the request
    /// still leaves `Pending` and resolves as failed.
    pub async fn submit(&mut self) -> Result<&RequestState, SubmitError> {
        let dispatch = self.dispatch()?;
        let guard = SettleOnDrop {
            id: dispatch.id,
            controller: &mut *self,
        };

        let resolution = dispatch.run().await;
        guard.controller.resolve(resolution);
        drop(guard);

        Ok(&self.state)
    }

    fn enter(&mut self, next: RequestState) {
        debug!(from = ?self.state, to = ?next, "request state changed");
        self.state = next;
        self.notify.send_replace(self.state.clone());
    }
}

struct SettleOnDrop<'a, T: Transport + ?Sized> {
    id: u64,
    controller: &'a mut RequestController<T>,
}

impl<T: Transport + ?Sized> Drop for SettleOnDrop<'_, T> {
    fn drop(&mut self) {
        if self.controller.in_flight == Some(self.id) {
            warn!(id = self.id, "chat request abandoned before completion");
            self.controller.resolve(Resolution {
                id: self.id,
                outcome: Err(ChatError::fallback()),
            });
        }
    }
}
