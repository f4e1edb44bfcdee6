//! Report renderers.
//!
//! Every renderer is a pure function of the snapshot (if any) and a
//! [`ReportContext`]; the dispatcher owns fetching and sending.

use chrono::{DateTime, Utc};

use crate::{
    commands::Command,
    formatting::escape_html,
    monitoring::types::{EndpointStatus, Snapshot},
};

/// Sent verbatim by every data command when the status source is unreachable
/// or returned nothing.
pub const STATUS_UNAVAILABLE: &str =
    "❌ Unable to fetch monitoring data. Gatus API may be unavailable.";

#[derive(Clone, Debug)]
pub struct ReportContext {
    pub monitor_name: String,
    pub now: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(monitor_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            monitor_name: monitor_name.into(),
            now,
        }
    }

    fn name(&self) -> String {
        escape_html(&self.monitor_name)
    }

    fn time(&self) -> String {
        self.now.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

// ============== Tiers ==============

/// Three-bucket scale used by the quick check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckTier {
    AllOperational,
    SomeIssues,
    MultipleDown,
}

impl CheckTier {
    pub fn classify(healthy: usize, total: usize) -> Self {
        if healthy == total {
            CheckTier::AllOperational
        } else if healthy * 2 > total {
            CheckTier::SomeIssues
        } else {
            CheckTier::MultipleDown
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            CheckTier::AllOperational => "✅",
            CheckTier::SomeIssues => "⚠️",
            CheckTier::MultipleDown => "🔴",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CheckTier::AllOperational => "All Systems Operational",
            CheckTier::SomeIssues => "Some Issues Detected",
            CheckTier::MultipleDown => "Multiple Systems Down",
        }
    }
}

/// Four-bucket scale used by the overall health report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthTier {
    pub fn classify(healthy: usize, total: usize) -> Self {
        if total == 0 {
            return HealthTier::Poor;
        }
        if healthy == total {
            HealthTier::Excellent
        } else if healthy * 4 >= total * 3 {
            HealthTier::Good
        } else if healthy * 2 >= total {
            HealthTier::Fair
        } else {
            HealthTier::Poor
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            HealthTier::Excellent => "🟢",
            HealthTier::Good => "🟡",
            HealthTier::Fair => "🟠",
            HealthTier::Poor => "🔴",
        }
    }

    fn label(self) -> &'static str {
        match self {
            HealthTier::Excellent => "Excellent",
            HealthTier::Good => "Good",
            HealthTier::Fair => "Fair",
            HealthTier::Poor => "Poor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UptimeTier {
    High,
    Degraded,
    Low,
}

impl UptimeTier {
    pub fn classify(successful: usize, total: usize) -> Self {
        if total == 0 {
            return UptimeTier::Low;
        }
        if successful * 100 >= total * 99 {
            UptimeTier::High
        } else if successful * 100 >= total * 95 {
            UptimeTier::Degraded
        } else {
            UptimeTier::Low
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            UptimeTier::High => "🟢",
            UptimeTier::Degraded => "🟡",
            UptimeTier::Low => "🔴",
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 100.0) / total as f64
}

/// Groups in first-seen order.
fn group_by_label(snapshot: &Snapshot) -> Vec<(&str, Vec<&EndpointStatus>)> {
    let mut groups: Vec<(&str, Vec<&EndpointStatus>)> = Vec::new();
    for endpoint in &snapshot.endpoints {
        match groups.iter_mut().find(|(g, _)| *g == endpoint.group) {
            Some((_, members)) => members.push(endpoint),
            None => groups.push((endpoint.group.as_str(), vec![endpoint])),
        }
    }
    groups
}

/// `None` and empty snapshots both mean "nothing to report on".
fn usable(snapshot: Option<&Snapshot>) -> Option<&Snapshot> {
    snapshot.filter(|s| !s.is_empty())
}

// ============== Renderers ==============

/// Render the reply for `command`.
pub fn render(command: Command, snapshot: Option<&Snapshot>, ctx: &ReportContext) -> String {
    match command {
        Command::Start | Command::Greeting | Command::Help => help(ctx),
        Command::Check => check(snapshot, ctx),
        Command::Status => status(snapshot, ctx),
        Command::Health => health(snapshot, ctx),
        Command::Uptime => uptime(snapshot, ctx),
        Command::Endpoints => endpoints(snapshot, ctx),
        Command::Alerts => alerts(ctx),
        Command::Ping => ping(ctx),
    }
}

pub fn help(ctx: &ReportContext) -> String {
    let name = ctx.name();
    format!(
        "🤖 <b>{name} Monitoring Bot</b>\n\n\
Welcome! I'm your {name} monitoring assistant. Here are all available commands:\n\n\
<b>📊 Status Commands:</b>\n\
/check - Quick health check of all endpoints\n\
/status - Detailed status report with response times\n\
/health - Overall system health summary\n\
/uptime - Uptime statistics for all services\n\
/endpoints - List all monitored endpoints\n\n\
<b>🔔 Alert Commands:</b>\n\
/alerts - Show recent alerts and incidents\n\n\
<b>ℹ️ General Commands:</b>\n\
/greeting - Show this help message\n\
/help - Show this help message\n\
/ping - Test bot connectivity\n\n\
<b>🔍 How to use:</b>\n\
• Use /check for quick status overview\n\
• Use /status for detailed monitoring data\n\
• Use /endpoints to see everything being monitored\n\n\
Type any command to get started! 🚀"
    )
}

pub fn startup(ctx: &ReportContext) -> String {
    format!(
        "🤖 <b>{} Monitoring Bot Started</b>\n\n\
✅ Bot is now online and ready!\n\
🔍 Monitoring {} endpoints\n\n\
Use /greeting to see all available commands.",
        ctx.name(),
        ctx.name()
    )
}

/// Reply to plain (non-command) text.
pub fn onboarding(ctx: &ReportContext) -> String {
    format!(
        "👋 Hi! I'm your {} monitoring bot.\n\n\
Use /greeting to see all available commands or /check for a quick status update.",
        ctx.name()
    )
}

pub fn unknown_command(token: &str) -> String {
    format!(
        "❓ Unknown command: {}\n\nUse /greeting to see all available commands.",
        escape_html(token)
    )
}

pub fn check(snapshot: Option<&Snapshot>, ctx: &ReportContext) -> String {
    let Some(snapshot) = usable(snapshot) else {
        return STATUS_UNAVAILABLE.to_string();
    };

    let total = snapshot.len();
    let healthy = snapshot.healthy_count();
    let tier = CheckTier::classify(healthy, total);
    let issues: Vec<String> = snapshot
        .endpoints
        .iter()
        .filter(|e| !e.is_healthy())
        .map(|e| format!("❌ {}", escape_html(&e.name)))
        .collect();

    let mut out = format!(
        "🔍 <b>{} Quick Check</b>\n\n\
{} <b>Status:</b> {}\n\
📊 <b>Health:</b> {healthy}/{total} endpoints healthy\n\n",
        ctx.name(),
        tier.emoji(),
        tier.label(),
    );

    if !issues.is_empty() {
        out.push_str("<b>Issues Found:</b>\n");
        out.push_str(&issues.join("\n"));
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "🕐 <b>Last Check:</b> {}\n\nUse /status for detailed information",
        ctx.time()
    ));
    out
}

pub fn status(snapshot: Option<&Snapshot>, ctx: &ReportContext) -> String {
    let Some(snapshot) = usable(snapshot) else {
        return STATUS_UNAVAILABLE.to_string();
    };

    let mut out = format!(
        "📊 <b>{} Detailed Status Report</b>\n\n🕐 <b>Generated:</b> {}\n\n",
        ctx.name(),
        ctx.time()
    );

    for endpoint in &snapshot.endpoints {
        let name = escape_html(&endpoint.name);
        let group = escape_html(&endpoint.group);

        let Some(latest) = endpoint.latest() else {
            out.push_str(&format!("❓ <b>{name}</b> ({group})\n   No data available\n\n"));
            continue;
        };

        let emoji = if latest.success { "✅" } else { "❌" };
        let checked = if latest.timestamp.is_empty() {
            "Unknown".to_string()
        } else {
            // Drop fractional seconds and zone: `2024-05-01T12:00:00`.
            escape_html(&latest.timestamp.chars().take(19).collect::<String>())
        };

        out.push_str(&format!(
            "{emoji} <b>{name}</b> ({group})\n   Response Time: {}ms\n   Last Check: {checked}\n\n",
            latest.duration_ms()
        ));
    }

    out.push_str("Use /health for summary or /uptime for statistics");
    out
}

pub fn health(snapshot: Option<&Snapshot>, ctx: &ReportContext) -> String {
    let Some(snapshot) = usable(snapshot) else {
        return STATUS_UNAVAILABLE.to_string();
    };

    let total = snapshot.len();
    let healthy = snapshot.healthy_count();
    let tier = HealthTier::classify(healthy, total);

    // Average over endpoints that reported a latency on their latest check.
    let latencies: Vec<u64> = snapshot
        .endpoints
        .iter()
        .filter_map(|e| e.latest())
        .filter(|r| r.duration > 0)
        .map(|r| r.duration)
        .collect();
    let avg_ms = if latencies.is_empty() {
        0
    } else {
        let sum: u128 = latencies.iter().map(|&d| d as u128).sum();
        let avg_ns = sum as f64 / latencies.len() as f64;
        (avg_ns / 1_000_000.0).round_ties_even() as u64
    };

    let mut out = format!(
        "🏥 <b>{} System Health</b>\n\n\
{} <b>Overall Health:</b> {} ({:.1}%)\n\
⚡ <b>Average Response:</b> {avg_ms}ms\n\
📊 <b>Endpoints:</b> {healthy}/{total} healthy\n\n\
<b>Group Status:</b>\n",
        ctx.name(),
        tier.emoji(),
        tier.label(),
        percent(healthy, total),
    );

    for (group, members) in group_by_label(snapshot) {
        let group_total = members.len();
        let group_healthy = members.iter().filter(|e| e.is_healthy()).count();
        let emoji = if group_healthy == group_total {
            "✅"
        } else if group_healthy * 2 >= group_total {
            "⚠️"
        } else {
            "❌"
        };
        out.push_str(&format!(
            "{emoji} {}: {group_healthy}/{group_total} ({:.0}%)\n",
            escape_html(group),
            percent(group_healthy, group_total)
        ));
    }

    out.push_str(&format!("\n🕐 <b>Report Time:</b> {}", ctx.time()));
    out
}

pub fn uptime(snapshot: Option<&Snapshot>, ctx: &ReportContext) -> String {
    let Some(snapshot) = usable(snapshot) else {
        return STATUS_UNAVAILABLE.to_string();
    };

    let mut out = format!(
        "📈 <b>{} Uptime Statistics</b>\n\n🕐 <b>Generated:</b> {}\n\n",
        ctx.name(),
        ctx.time()
    );

    for endpoint in &snapshot.endpoints {
        let name = escape_html(&endpoint.name);
        let (ok, total) = endpoint.success_ratio();
        if total == 0 {
            out.push_str(&format!("❓ <b>{name}</b>\n   No uptime data available\n\n"));
            continue;
        }

        out.push_str(&format!(
            "{} <b>{name}</b>\n   Uptime: {:.2}%\n   Checks: {ok}/{total}\n\n",
            UptimeTier::classify(ok, total).emoji(),
            percent(ok, total)
        ));
    }

    out.push_str("Note: Statistics based on recent monitoring data");
    out
}

pub fn endpoints(snapshot: Option<&Snapshot>, ctx: &ReportContext) -> String {
    let Some(snapshot) = usable(snapshot) else {
        return STATUS_UNAVAILABLE.to_string();
    };

    let mut out = format!(
        "🔗 <b>{} Monitored Endpoints</b>\n\n🕐 <b>Generated:</b> {}\n\n",
        ctx.name(),
        ctx.time()
    );

    let groups = group_by_label(snapshot);
    for (group, members) in &groups {
        out.push_str(&format!("<b>📂 {}:</b>\n", escape_html(group)));
        for endpoint in members {
            out.push_str(&format!("   • {}\n", escape_html(&endpoint.name)));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "<b>Total:</b> {} endpoints across {} groups",
        snapshot.len(),
        groups.len()
    ));
    out
}

pub fn alerts(ctx: &ReportContext) -> String {
    format!(
        "🔔 <b>{} Alert System</b>\n\n\
<b>Alert Configuration:</b>\n\
✅ Immediate alerts for endpoint failures\n\
✅ Recovery notifications when services restore\n\
✅ Hourly status reports\n\
✅ SSL certificate expiration warnings\n\n\
<b>Recent Activity:</b>\n\
Alerts are delivered to this chat when:\n\
• Endpoints become unresponsive\n\
• Response times exceed thresholds\n\
• SSL certificates are expiring\n\
• Services recover from failures\n\n\
Use /check or /status to see current system state.\n\n\
<b>Alert History:</b>\n\
Check your chat history for recent alerts and notifications.",
        ctx.name()
    )
}

pub fn ping(ctx: &ReportContext) -> String {
    format!(
        "🏓 <b>Pong!</b>\n\n\
✅ Bot is online and responsive\n\
🤖 {name} Monitoring Bot v{version}\n\
🕐 Server Time: {time}\n\
🌐 Connected to {name} monitoring system\n\n\
Use /check to verify endpoint health!",
        name = ctx.name(),
        version = env!("CARGO_PKG_VERSION"),
        time = ctx.time()
    )
}
