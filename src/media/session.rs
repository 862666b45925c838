use super::{
    error::{ErrorKind, ResolveError},
    resolver::Resolver,
    types::{Extraction, Phase},
    validate::admit,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum Submission {
    /// Another submission was still in flight; nothing was done.
    Ignored,
    Completed(Result<Extraction, ResolveError>),
}

/// One user's submit button: admits input, resolves it, and refuses re-entry while busy.
pub struct Session {
    resolver: Resolver,
    in_flight: AtomicBool,
    phase: watch::Sender<Phase>,
}

/// Releases the in-flight slot, even if the submission future is dropped midway.
struct SlotGuard<'a> {
    session: &'a Session,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.session.phase.send_replace(Phase::Idle);
        self.session.in_flight.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(resolver: Resolver) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            resolver,
            in_flight: AtomicBool::new(false),
            phase,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Every phase change, ending with [`Phase::Idle`] once a submission settles.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(&self, raw: &str) -> Submission {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submission ignored, a request is already in flight");
            return Submission::Ignored;
        }
        let _slot = SlotGuard { session: self };

        let result = self.run(raw).await;
        match &result {
            Ok(extraction) => info!("Submission resolved to {}", extraction.media_url),
            Err(e) => warn!(kind = ?e.kind(), "Submission failed: {}", e),
        }
        Submission::Completed(result)
    }

    async fn run(&self, raw: &str) -> Result<Extraction, ResolveError> {
        self.enter(Phase::Validating);
        let url = admit(raw).inspect_err(|_| self.enter(Phase::Rejected))?;

        self.enter(Phase::Requesting);
        let doc = self
            .resolver
            .fetch(url)
            .await
            .inspect_err(|e| self.enter(failure_phase(e)))?;

        self.enter(Phase::Parsing);
        let extraction = self
            .resolver
            .extract(doc)
            .inspect_err(|e| self.enter(failure_phase(e)))?;

        self.enter(Phase::Extracted);
        Ok(extraction)
    }

    fn enter(&self, phase: Phase) {
        debug!(?phase, "Session phase");
        self.phase.send_replace(phase);
    }
}

fn failure_phase(err: &ResolveError) -> Phase {
    match err.kind() {
        ErrorKind::MissingInput | ErrorKind::InvalidUrlShape => Phase::Rejected,
        ErrorKind::Timeout => Phase::TimedOut,
        ErrorKind::HttpStatus | ErrorKind::NetworkFailure => Phase::HttpError,
        ErrorKind::EmptyResponse | ErrorKind::NoMediaUrlFound => Phase::NoMatch,
    }
}
