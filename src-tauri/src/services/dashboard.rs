use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OnceCell};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::models::{Analytics, ApiResponse, Appointment, MutationErrorPolicy, RescheduleDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Patients,
    Appointments,
    Billing,
    Reports,
    Prescriptions,
    Analytics,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Dashboard,
        Tab::Patients,
        Tab::Appointments,
        Tab::Billing,
        Tab::Reports,
        Tab::Prescriptions,
        Tab::Analytics,
        Tab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Patients => "Patients",
            Tab::Appointments => "Appointments",
            Tab::Billing => "Billing",
            Tab::Reports => "Reports",
            Tab::Prescriptions => "Prescriptions",
            Tab::Analytics => "Analytics",
            Tab::Settings => "Settings",
        }
    }
}

/// Everything the dashboard shows. `analytics` is `None` until a load succeeds,
/// and after a failed first load, which renders as defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub phase: Phase,
    pub analytics: Option<Analytics>,
    pub active_tab: Tab,
    pub reschedule: Option<RescheduleDraft>,
    pub notice: Option<String>,
    pub last_refreshed: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn todays_appointment(&self, id: i64) -> Option<&Appointment> {
        self.analytics
            .as_ref()
            .and_then(|a| a.todays_appointments.iter().find(|appt| appt.id == id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The server accepted the change and the dashboard was re-fetched.
    Applied,
    Notified { patient_name: String },
    Failed { error: String },
    /// The same action is already running for this appointment.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MutationKind {
    Confirm,
    Reschedule,
    Notify,
}

/// Releases its in-flight slot on drop, including when the owning future is cancelled.
struct InFlight {
    key: (MutationKind, i64),
    slots: Arc<Mutex<HashSet<(MutationKind, i64)>>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.remove(&self.key);
    }
}

pub fn reminder_message(appointment: &Appointment) -> String {
    format!(
        "Reminder: You have an appointment today at {}",
        appointment.appointment_time
    )
}

/// Owner of the dashboard view-state.
///
/// Requests run without holding the state lock; the state is only written once a
/// response has arrived, inside a short critical section. A successful confirm or
/// reschedule is always followed by exactly one analytics re-fetch: the client never
/// computes post-mutation state itself.
pub struct DashboardController {
    api: ApiClient,
    policy: MutationErrorPolicy,
    state: AsyncMutex<DashboardState>,
    in_flight: Arc<Mutex<HashSet<(MutationKind, i64)>>>,
    mounted: OnceCell<()>,
    /// Sequence number handed to each analytics fetch.
    issued: AtomicU64,
    /// Newest fetch whose response has been applied; only written under `state`.
    applied: AtomicU64,
}

impl DashboardController {
    pub fn new(api: ApiClient, policy: MutationErrorPolicy) -> Self {
        DashboardController {
            api,
            policy,
            state: AsyncMutex::new(DashboardState::default()),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            mounted: OnceCell::new(),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    /// Runs the initial load once. Concurrent callers wait on the same fetch, and a
    /// dashboard that already left `Loading` is not fetched again.
    pub async fn ensure_loaded(&self) {
        self.mounted
            .get_or_init(|| async {
                if self.state.lock().await.phase == Phase::Loading {
                    self.load().await;
                }
            })
            .await;
    }

    /// Initial transition, re-run after every successful mutation.
    ///
    /// Overlapping loads resolve to the most recently issued one: a response that
    /// arrives after a newer one has been applied is dropped.
    pub async fn load(&self) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let response = self.api.analytics().get().await;

        let mut state = self.state.lock().await;
        state.phase = Phase::Ready;
        if !response.is_success() {
            warn!(error = response.error_message(), "Failed to load analytics");
            return;
        }
        if ticket < self.applied.load(Ordering::SeqCst) {
            info!(ticket, "Dropping stale analytics response");
            return;
        }
        self.applied.store(ticket, Ordering::SeqCst);
        state.analytics = response.data;
        state.last_refreshed = Some(Local::now());
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.lock().await.active_tab = tab;
    }

    /// Opens the reschedule dialog pre-filled from today's list. Unknown ids open an empty draft.
    pub async fn open_reschedule(&self, id: i64) {
        let mut state = self.state.lock().await;
        let draft = match state.todays_appointment(id) {
            Some(appointment) => RescheduleDraft::for_appointment(appointment),
            None => RescheduleDraft {
                id,
                ..Default::default()
            },
        };
        state.reschedule = Some(draft);
    }

    pub async fn update_reschedule(&self, date: Option<String>, time: Option<String>) {
        let mut state = self.state.lock().await;
        if let Some(draft) = state.reschedule.as_mut() {
            if let Some(date) = date {
                draft.date = date;
            }
            if let Some(time) = time {
                draft.time = time;
            }
        }
    }

    pub async fn cancel_reschedule(&self) {
        self.state.lock().await.reschedule = None;
    }

    pub async fn dismiss_notice(&self) {
        self.state.lock().await.notice = None;
    }

    pub async fn confirm_appointment(&self, id: i64) -> MutationOutcome {
        let Some(_slot) = self.claim(MutationKind::Confirm, id) else {
            return MutationOutcome::Busy;
        };
        let response = self.api.appointments().confirm(id).await;
        self.after_mutation("confirm appointment", response, false).await
    }

    /// Submits the open draft. Without an open dialog nothing is sent.
    pub async fn submit_reschedule(&self) -> MutationOutcome {
        let draft = self.state.lock().await.reschedule.clone();
        let Some(draft) = draft else {
            return self.fail("reschedule appointment", "No appointment selected for rescheduling").await;
        };
        let Some(_slot) = self.claim(MutationKind::Reschedule, draft.id) else {
            return MutationOutcome::Busy;
        };
        let response = self
            .api
            .appointments()
            .reschedule(draft.id, &draft.date, &draft.time)
            .await;
        self.after_mutation("reschedule appointment", response, true).await
    }

    /// Sends the standard reminder for one of today's appointments. No state changes on success.
    pub async fn send_reminder(&self, id: i64, phone: &str) -> MutationOutcome {
        let appointment = self.state.lock().await.todays_appointment(id).cloned();
        let Some(appointment) = appointment else {
            return self
                .fail("send notification", &format!("Appointment {} is not on today's list", id))
                .await;
        };
        let Some(_slot) = self.claim(MutationKind::Notify, id) else {
            return MutationOutcome::Busy;
        };

        let response = self
            .api
            .notifications()
            .send(&reminder_message(&appointment), phone, appointment.patient_id)
            .await;
        if response.is_success() {
            info!(patient = %appointment.patient_name, "Notification sent");
            MutationOutcome::Notified {
                patient_name: appointment.patient_name,
            }
        } else {
            self.fail("send notification", response.error_message()).await
        }
    }

    fn claim(&self, kind: MutationKind, id: i64) -> Option<InFlight> {
        let key = (kind, id);
        let mut slots = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !slots.insert(key) {
            warn!(?kind, id, "Ignoring duplicate request while one is in flight");
            return None;
        }
        Some(InFlight {
            key,
            slots: self.in_flight.clone(),
        })
    }

    async fn after_mutation<T>(&self, action: &str, response: ApiResponse<T>, clears_draft: bool) -> MutationOutcome {
        if !response.is_success() {
            return self.fail(action, response.error_message()).await;
        }
        if clears_draft {
            self.state.lock().await.reschedule = None;
        }
        self.load().await;
        MutationOutcome::Applied
    }

    async fn fail(&self, action: &str, error: &str) -> MutationOutcome {
        warn!(action, error, "Dashboard action failed");
        if self.policy == MutationErrorPolicy::Surface {
            self.state.lock().await.notice = Some(format!("Failed to {}: {}", action, error));
        }
        MutationOutcome::Failed {
            error: error.to_string(),
        }
    }
}
