//! Session tracker: identity events in, gate state out.
//!
//! DESIGN
//! ======
//! The tracker is an owned state cell. It registers exactly one subscription
//! with the provider on [`SessionTracker::start`], reads identity events from
//! a single inbound channel, and holds the provider's [`Unsubscribe`] handle
//! until teardown. Views read [`SessionTracker::gate`] instead of sharing a
//! callback-mutated global.
//!
//! The gate starts in [`GateState::Loading`] and leaves it on the first event;
//! it never returns to loading. Consumers must not assume how long loading
//! lasts.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::fmt;

use futures::{FutureExt, StreamExt};

use crate::identity::{Identity, IdentityEvent, IdentityProvider, IdentityStream, Unsubscribe, identity_channel};

/// Three-valued session status derived from identity events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    /// No notification received yet.
    #[default]
    Loading,
    Authenticated(Identity),
    Unauthenticated,
}

impl GateState {
    #[must_use]
    pub fn from_event(event: IdentityEvent) -> Self {
        match event {
            Some(identity) => Self::Authenticated(identity),
            None => Self::Unauthenticated,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Loading | Self::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Authenticated(_) => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owned session state fed by one provider subscription.
#[derive(Debug)]
pub struct SessionTracker {
    gate: GateState,
    events: IdentityStream,
    subscription: Option<Unsubscribe>,
}

impl SessionTracker {
    /// Subscribe to `provider` and start in [`GateState::Loading`].
    pub fn start<P>(provider: &P) -> Self
    where
        P: IdentityProvider + ?Sized,
    {
        let (sink, events) = identity_channel();
        let subscription = provider.subscribe(sink);
        tracing::debug!("session tracker subscribed");
        Self { gate: GateState::Loading, events, subscription: Some(subscription) }
    }

    #[must_use]
    pub fn gate(&self) -> &GateState {
        &self.gate
    }

    /// Current identity snapshot.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.gate.identity()
    }

    /// Whether the provider subscription is still held.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the snapshot with `event`.
    pub fn apply(&mut self, event: IdentityEvent) -> &GateState {
        self.gate = GateState::from_event(event);
        tracing::debug!(gate = %self.gate, "session gate changed");
        &self.gate
    }

    /// Wait for the next identity event and apply it.
    ///
    /// Returns `None` once the provider has dropped the sending half.
    pub async fn changed(&mut self) -> Option<&GateState> {
        let event = self.events.next().await?;
        Some(self.apply(event))
    }

    /// Wait until the gate leaves [`GateState::Loading`].
    ///
    /// Stays loading if the provider closes the stream without notifying.
    pub async fn resolve(&mut self) -> &GateState {
        while self.gate.is_loading() {
            if self.changed().await.is_none() {
                break;
            }
        }
        &self.gate
    }

    /// Apply every event already queued without waiting.
    /// Returns whether any event was applied.
    pub fn drain(&mut self) -> bool {
        let mut applied = false;
        while let Some(Some(event)) = self.events.next().now_or_never() {
            self.apply(event);
            applied = true;
        }
        applied
    }

    /// Drive the tracker until the provider closes the stream, calling
    /// `on_change` after every event. The subscription is released when the
    /// returned future completes or is dropped.
    pub async fn run<F>(mut self, mut on_change: F)
    where
        F: FnMut(&GateState),
    {
        while let Some(gate) = self.changed().await {
            on_change(gate);
        }
    }

    /// Release the provider subscription.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
            tracing::debug!("session tracker released subscription");
        }
    }
}

impl Drop for SessionTracker {
    fn drop(&mut self) {
        self.release();
    }
}
