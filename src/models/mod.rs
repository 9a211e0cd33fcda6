// Domain models (wire format shared with the dashboard front-end)

mod alert;
mod analytics;
mod heartbeat;

pub use alert::{AlertRecord, Severity};
pub use analytics::{
    AlertAnalytics, AlertCharts, AlertKpis, AnalyticsWindow, Period, SeverityCounts,
    SourceBreakdown, TrendPoint,
};
pub use heartbeat::{HealthStatus, ServerHeartbeat};
