//! Replaceable scheduled-task handle.
//!
//! A `DebounceSlot` holds at most one armed request. Arming a new request
//! cancels the previous one, so rapid calls collapse to the latest. Each
//! request is identified by a `Ticket` whose token is a child of the
//! owning component's token; cancelling the component cancels every ticket.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Handle for one armed request.
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    /// Token cancelled when the request is superseded or torn down.
    #[must_use]
    pub(crate) const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the request was cancelled.
    #[must_use]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Holds the single armed request of a debounced operation.
#[derive(Debug, Default)]
pub(crate) struct DebounceSlot {
    current: Option<Ticket>,
    issued: u64,
}

impl DebounceSlot {
    /// Create an empty slot.
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            current: None,
            issued: 0,
        }
    }

    /// Cancel the armed request, if any, and arm a new one under `parent`.
    pub(crate) fn arm(&mut self, parent: &CancellationToken) -> Ticket {
        self.cancel();
        self.issued += 1;
        let ticket = Ticket {
            generation: self.issued,
            token: parent.child_token(),
        };
        self.current = Some(ticket.clone());
        ticket
    }

    /// Cancel the armed request. Returns whether one was armed.
    pub(crate) fn cancel(&mut self) -> bool {
        let Some(ticket) = self.current.take() else {
            return false;
        };
        ticket.token.cancel();
        true
    }

    /// Forget `ticket` without cancelling it, so later calls to
    /// [`Self::cancel`] leave it running.
    pub(crate) fn release(&mut self, ticket: &Ticket) {
        if self.is_current(ticket) {
            self.current = None;
        }
    }

    /// Whether `ticket` is the armed request and has not been cancelled.
    #[must_use]
    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.current
            .as_ref()
            .is_some_and(|armed| armed.generation == ticket.generation)
            && !ticket.is_cancelled()
    }
}

/// Wait for `delay` unless `token` is cancelled first.
///
/// Returns `true` when the full delay elapsed.
pub(crate) async fn delay_unless_cancelled(token: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        () = token.cancelled() => false,
        () = tokio::time::sleep(delay) => !token.is_cancelled(),
    }
}
