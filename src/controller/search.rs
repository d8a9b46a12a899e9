//! Bookkeeping for debounced, cancellable searches.

use crate::cancellation::CancellationToken;
use std::collections::VecDeque;
use tokio::task::JoinHandle;

/// The debounce timer plus the tokens of every search that may still render.
///
/// Tokens are queued by [`issue`](Self::issue) in the same order as the
/// navigation events they go with, and [`begin`](Self::begin) takes them
/// back out in that order. Issuing or interrupting cancels everything issued
/// before, so at most one live token exists at any time.
#[derive(Debug, Default)]
pub(crate) struct SearchSession {
    timer: Option<(u64, JoinHandle<()>)>,
    generation: u64,
    pending: VecDeque<(String, CancellationToken)>,
    in_flight: Option<CancellationToken>,
}

impl SearchSession {
    /// Clears the timer and cancels every issued or running search.
    pub(crate) fn interrupt(&mut self) {
        if let Some((_, timer)) = self.timer.take() {
            timer.abort();
        }
        self.cancel_tokens();
    }

    /// Reserves the generation number for the next timer.
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub(crate) fn arm(&mut self, generation: u64, timer: JoinHandle<()>) {
        if let Some((_, previous)) = self.timer.replace((generation, timer)) {
            previous.abort();
        }
    }

    /// Called by the timer task when it fires. Returns `false` if the timer
    /// was replaced in the meantime and must not search.
    pub(crate) fn disarm(&mut self, generation: u64) -> bool {
        match &self.timer {
            Some((armed, _)) if *armed == generation => {
                self.timer = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Cancels everything issued so far and queues a fresh token for `query`.
    pub(crate) fn issue(&mut self, query: &str) -> CancellationToken {
        self.cancel_tokens();
        let token = CancellationToken::new();
        self.pending.push_back((query.to_string(), token.clone()));
        token
    }

    /// Takes the oldest token issued for `query`, or a fresh one when the
    /// navigation did not come from the search field, and marks it running.
    pub(crate) fn begin(&mut self, query: &str) -> CancellationToken {
        let token = self
            .pending
            .iter()
            .position(|(issued, _)| issued == query)
            .and_then(|index| self.pending.remove(index))
            .map(|(_, token)| token)
            .unwrap_or_else(CancellationToken::new);
        self.in_flight = Some(token.clone());
        token
    }

    /// Forgets the running search. The router runs one handler at a time,
    /// so the slot always holds the token of the search that just finished.
    pub(crate) fn finish(&mut self) {
        self.in_flight = None;
    }

    fn cancel_tokens(&mut self) {
        if let Some(token) = &self.in_flight {
            token.cancel();
        }
        for (_, token) in &self.pending {
            token.cancel();
        }
    }
}
