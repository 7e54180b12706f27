use serde::Serialize;

use crate::models::{AppointmentStatus, RescheduleDraft};
use crate::services::dashboard::{reminder_message, DashboardState, Phase, Tab};

pub const EMPTY_APPOINTMENTS: &str = "No appointments scheduled for today.";
const COUNT_DEFAULT: &str = "0";
const WAIT_TIME_DEFAULT: &str = "N/A";
const TREND_DEFAULT: &str = "Stable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Green,
    Yellow,
    Blue,
    Gray,
}

impl From<&AppointmentStatus> for BadgeTone {
    fn from(status: &AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Confirmed => BadgeTone::Green,
            AppointmentStatus::Pending => BadgeTone::Yellow,
            AppointmentStatus::Rescheduled => BadgeTone::Blue,
            _ => BadgeTone::Gray,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabItem {
    pub id: Tab,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentRow {
    pub id: i64,
    pub patient_name: String,
    pub summary: String,
    pub status: String,
    pub tone: BadgeTone,
    pub can_confirm: bool,
    pub reminder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub follow_up_alerts: String,
    pub revenue_trend: String,
}

/// Render model handed to the webview. Pure function of [`DashboardState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub loading: bool,
    pub tabs: Vec<TabItem>,
    pub widgets: Vec<Widget>,
    pub appointments: Vec<AppointmentRow>,
    pub empty_message: Option<&'static str>,
    pub insights: Insights,
    pub placeholder: Option<String>,
    pub reschedule: Option<RescheduleDraft>,
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn render(state: &DashboardState) -> Self {
        let analytics = state.analytics.as_ref();

        let count = |value: Option<u64>| match value {
            Some(n) if n > 0 => n.to_string(),
            _ => COUNT_DEFAULT.to_string(),
        };
        let text = |value: Option<&str>, fallback: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        let widgets = vec![
            Widget {
                title: "Total Appointments",
                value: count(analytics.map(|a| a.total_appointments)),
            },
            Widget {
                title: "Pending Billing",
                value: count(analytics.map(|a| a.pending_billing)),
            },
            Widget {
                title: "Active Patients",
                value: count(analytics.map(|a| a.active_patients)),
            },
            Widget {
                title: "Avg Wait Time",
                value: text(analytics.map(|a| a.avg_wait_time.as_str()), WAIT_TIME_DEFAULT),
            },
        ];

        let appointments: Vec<AppointmentRow> = analytics
            .map(|a| a.todays_appointments.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|appointment| AppointmentRow {
                id: appointment.id,
                patient_name: appointment.patient_name.clone(),
                summary: format!("{} - {}", appointment.appointment_time, appointment.reason),
                status: appointment.status.to_string(),
                tone: BadgeTone::from(&appointment.status),
                can_confirm: appointment.status != AppointmentStatus::Confirmed,
                reminder: reminder_message(appointment),
            })
            .collect();

        let empty_message = appointments.is_empty().then_some(EMPTY_APPOINTMENTS);

        let insights = Insights {
            follow_up_alerts: count(analytics.map(|a| a.follow_up_alerts)),
            revenue_trend: text(analytics.map(|a| a.revenue_trend.as_str()), TREND_DEFAULT),
        };

        let tabs = Tab::ALL
            .iter()
            .map(|tab| TabItem {
                id: *tab,
                label: tab.label(),
                active: *tab == state.active_tab,
            })
            .collect();

        let placeholder = (state.active_tab != Tab::Dashboard)
            .then(|| format!("{} module coming soon...", state.active_tab.label()));

        DashboardView {
            loading: state.phase == Phase::Loading,
            tabs,
            widgets,
            appointments,
            empty_message,
            insights,
            placeholder,
            reschedule: state.reschedule.clone(),
            notice: state.notice.clone(),
        }
    }

    pub fn widget(&self, title: &str) -> Option<&str> {
        self.widgets
            .iter()
            .find(|w| w.title == title)
            .map(|w| w.value.as_str())
    }
}
