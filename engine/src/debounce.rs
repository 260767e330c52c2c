//! Quiet-period gate between UI events and the synchronous engine.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Collapses a burst of events into one search trigger. Every `poke`
/// cancels the previous ticket; a ticket resolves `true` only when its
/// quiet period passes with no newer event. The caller reads the query
/// state after the ticket fires, never before, so superseded intermediate
/// states are simply dropped. There is nothing else to cancel, because the
/// search itself is synchronous and cannot block.
#[derive(Debug)]
pub struct DebounceGate {
    quiet: Duration,
    pending: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct DebounceTicket {
    quiet: Duration,
    token: CancellationToken,
}

impl DebounceGate {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    /// The quiet period used for keystrokes and slider drags.
    pub fn for_user_input() -> Self {
        Self::new(Duration::from_millis(300))
    }

    /// Register one event. The previous pending ticket, if any, is
    /// cancelled and the timer starts over.
    pub fn poke(&mut self) -> DebounceTicket {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        DebounceTicket { quiet: self.quiet, token }
    }

    /// Drop the pending trigger without scheduling a new one.
    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }
}

impl DebounceTicket {
    /// Resolves `true` when the quiet period elapsed uncancelled.
    pub async fn wait(self) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.quiet) => true,
            _ = self.token.cancelled() => false,
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn newer_event_cancels_the_older_ticket() {
        let mut gate = DebounceGate::new(Duration::from_millis(20));
        let first = gate.poke();
        let second = gate.poke();
        assert!(!first.wait().await);
        assert!(second.wait().await);
    }

    #[tokio::test]
    async fn cancel_drops_the_pending_trigger() {
        let mut gate = DebounceGate::new(Duration::from_millis(20));
        let ticket = gate.poke();
        gate.cancel();
        assert!(!ticket.wait().await);
    }

    #[tokio::test]
    async fn a_quiet_period_lets_the_ticket_fire() {
        let mut gate = DebounceGate::new(Duration::from_millis(5));
        assert!(gate.poke().wait().await);
    }
}
