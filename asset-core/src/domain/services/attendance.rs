use std::sync::Arc;

use crate::domain::{
    models::{
        ActionType, AppState, AttendanceAck, AttendanceOutcome, AttendanceRecord, Coordinates,
    },
    ports::outbound::{AttendanceGateway, Clock, Locator, ReachabilityProbe, StateStore},
    AttendanceError,
};

/// Records login/logout events, sending them straight away when the network
/// is up and queueing them on the device when it is not.
///
/// The recorder holds no state of its own; every operation mutates the
/// `AppState` it is handed. When a store is attached the state is saved after
/// each mutation. A failed save is logged and does not fail the action, the
/// in-memory state stays authoritative.
pub struct AttendanceRecorder<L, P, G, C> {
    locator: Arc<L>,
    probe: Arc<P>,
    gateway: Arc<G>,
    clock: Arc<C>,
    store: Option<Arc<dyn StateStore>>,
}

impl<L, P, G, C> AttendanceRecorder<L, P, G, C>
where
    L: Locator,
    P: ReachabilityProbe,
    G: AttendanceGateway,
    C: Clock,
{
    pub fn new(locator: Arc<L>, probe: Arc<P>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            locator,
            probe,
            gateway,
            clock,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// No-op when already logged in.
    pub async fn login(&self, state: &mut AppState) -> Result<AttendanceOutcome, AttendanceError> {
        if state.attendance.is_logged_in() {
            tracing::debug!("Already logged in, ignoring login");
            return Ok(AttendanceOutcome::Skipped);
        }
        self.capture_and_record(state, ActionType::Login).await
    }

    /// Only proceeds while logged in.
    pub async fn logout(&self, state: &mut AppState) -> Result<AttendanceOutcome, AttendanceError> {
        if !state.attendance.is_logged_in() {
            tracing::debug!("Not logged in, ignoring logout");
            return Ok(AttendanceOutcome::Skipped);
        }
        self.capture_and_record(state, ActionType::Logout).await
    }

    async fn capture_and_record(
        &self,
        state: &mut AppState,
        action: ActionType,
    ) -> Result<AttendanceOutcome, AttendanceError> {
        let coordinates = self.locator.current_position().await.map_err(|e| {
            tracing::warn!(%action, "Aborting attendance action: {}", e);
            e
        })?;
        self.record_action(state, action, coordinates).await
    }

    /// Send or queue one event captured at `coordinates`.
    ///
    /// A server rejection while online drops the event: nothing is queued and
    /// `last_action` keeps its old value.
    pub async fn record_action(
        &self,
        state: &mut AppState,
        action: ActionType,
        coordinates: Coordinates,
    ) -> Result<AttendanceOutcome, AttendanceError> {
        let record = AttendanceRecord::capture(
            action,
            coordinates,
            state.auth.employee_id().cloned(),
            self.clock.now_local(),
        );

        let outcome = if self.probe.is_connected().await {
            self.send(&record).await?;
            tracing::info!(%action, date_time = %record.date_time(), "Attendance submitted");
            AttendanceOutcome::Submitted
        } else {
            state.attendance.enqueue(record);
            tracing::info!(
                %action,
                pending = state.attendance.pending_queue().len(),
                "Offline, attendance queued"
            );
            AttendanceOutcome::Queued
        };

        state.attendance.set_last_action(action);
        self.persist(state);
        Ok(outcome)
    }

    /// Send every queued record in order, then clear the queue in one go.
    ///
    /// Stops at the first failure and keeps the whole queue, so records the
    /// server already took are sent again on the next flush.
    pub async fn flush(&self, state: &mut AppState) -> Result<AttendanceOutcome, AttendanceError> {
        let pending = state.attendance.pending_queue().len();
        if pending == 0 {
            return Ok(AttendanceOutcome::Flushed(0));
        }
        if !self.probe.is_connected().await {
            return Err(AttendanceError::Offline);
        }

        for (sent, record) in state.attendance.pending_queue().iter().enumerate() {
            if let Err(e) = self.send(record).await {
                tracing::warn!(sent, pending, "Flush stopped, queue kept: {}", e);
                return Err(e);
            }
        }

        state.attendance.clear_pending();
        self.persist(state);
        tracing::info!(pending, "Attendance queue flushed");
        Ok(AttendanceOutcome::Flushed(pending))
    }

    /// Drop every queued record without sending it.
    pub fn clear(&self, state: &mut AppState) {
        let dropped = state.attendance.pending_queue().len();
        state.attendance.clear_pending();
        self.persist(state);
        tracing::info!(dropped, "Attendance queue cleared");
    }

    async fn send(&self, record: &AttendanceRecord) -> Result<(), AttendanceError> {
        match self.gateway.submit_attendance(&record.to_submission()).await? {
            AttendanceAck::Accepted => Ok(()),
            AttendanceAck::Rejected { message } => {
                tracing::warn!(action = %record.action_type(), "Attendance rejected: {}", message);
                Err(AttendanceError::Rejected { message })
            }
        }
    }

    fn persist(&self, state: &AppState) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(state) {
                tracing::error!("Failed to persist app state: {:?}", e);
            }
        }
    }
}
