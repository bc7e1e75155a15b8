//! In-memory port implementations for service tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use time::OffsetDateTime;

use crate::domain::{
    models::{
        AppState, AttendanceAck, AttendanceSubmission, AuthSession, CompletionAck,
        CompletionSubmission, Coordinates, RatingCategory,
    },
    ports::outbound::{
        AttendanceGateway, AuthGateway, Clock, Locator, RatingGateway, ReachabilityProbe,
        StateStore,
    },
    GatewayError, LocationError, StoreError,
};

/// Hands out positions in order; the last one repeats.
#[derive(Default)]
pub struct MockLocator {
    positions: Mutex<VecDeque<Coordinates>>,
    calls: AtomicUsize,
}

impl MockLocator {
    pub fn sequence(positions: Vec<Coordinates>) -> Self {
        Self {
            positions: Mutex::new(positions.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fixed(position: Coordinates) -> Self {
        Self::sequence(vec![position])
    }

    /// A locator that never gets a fix.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Locator for MockLocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut positions = self.positions.lock().unwrap();
        if positions.len() > 1 {
            return Ok(positions.pop_front().unwrap());
        }
        positions
            .front()
            .copied()
            .ok_or_else(|| LocationError::new("no fix"))
    }
}

pub struct MockProbe {
    connected: AtomicBool,
}

impl MockProbe {
    pub fn online() -> Self {
        Self {
            connected: AtomicBool::new(true),
        }
    }

    pub fn offline() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReachabilityProbe for MockProbe {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Accepts everything unless replies were scripted with [`Self::then`].
#[derive(Default)]
pub struct MockAttendanceGateway {
    sent: RwLock<Vec<AttendanceSubmission>>,
    replies: Mutex<VecDeque<Result<AttendanceAck, GatewayError>>>,
}

impl MockAttendanceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, reply: Result<AttendanceAck, GatewayError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn sent(&self) -> Vec<AttendanceSubmission> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl AttendanceGateway for MockAttendanceGateway {
    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceAck, GatewayError> {
        self.sent.write().unwrap().push(submission.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(AttendanceAck::Accepted))
    }
}

#[derive(Default)]
pub struct MockRatingGateway {
    catalog: Option<Vec<RatingCategory>>,
    reply: Option<CompletionAck>,
    submitted: RwLock<Vec<CompletionSubmission>>,
}

impl MockRatingGateway {
    pub fn with_catalog(catalog: Vec<RatingCategory>) -> Self {
        Self {
            catalog: Some(catalog),
            ..Default::default()
        }
    }

    /// Reply to completions with `ack` instead of `Successful`.
    pub fn replying(mut self, ack: CompletionAck) -> Self {
        self.reply = Some(ack);
        self
    }

    pub fn submitted(&self) -> Vec<CompletionSubmission> {
        self.submitted.read().unwrap().clone()
    }
}

#[async_trait]
impl RatingGateway for MockRatingGateway {
    async fn fetch_categories(&self) -> Result<Vec<RatingCategory>, GatewayError> {
        self.catalog
            .clone()
            .ok_or_else(|| GatewayError::Unreachable("catalog down".to_string()))
    }

    async fn submit_completion(
        &self,
        submission: &CompletionSubmission,
    ) -> Result<CompletionAck, GatewayError> {
        self.submitted.write().unwrap().push(submission.clone());
        Ok(self.reply.clone().unwrap_or(CompletionAck::Successful))
    }
}

pub struct MockAuthGateway {
    session: Option<AuthSession>,
}

impl MockAuthGateway {
    pub fn accepting(session: AuthSession) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn refusing() -> Self {
        Self { session: None }
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn sign_in(&self, _username: &str, _password: &str) -> Result<AuthSession, GatewayError> {
        self.session.clone().ok_or(GatewayError::Unauthorized)
    }
}

#[derive(Default)]
pub struct MockStateStore {
    saved: RwLock<Option<AppState>>,
    saves: AtomicUsize,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Option<AppState> {
        self.saved.read().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StateStore for MockStateStore {
    fn load(&self) -> Result<AppState, StoreError> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.saved.write().unwrap() = Some(state.clone());
        Ok(())
    }
}

pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now_local(&self) -> OffsetDateTime {
        self.0
    }
}
