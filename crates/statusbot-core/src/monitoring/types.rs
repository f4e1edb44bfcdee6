use serde::Deserialize;

const UNKNOWN: &str = "Unknown";
const NANOS_PER_MILLI: u64 = 1_000_000;

/// All endpoint statuses returned by one query to the status source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub endpoints: Vec<EndpointStatus>,
}

impl Snapshot {
    pub fn new(endpoints: Vec<EndpointStatus>) -> Self {
        Self { endpoints }
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Number of endpoints whose most recent check succeeded.
    pub fn healthy_count(&self) -> usize {
        self.endpoints.iter().filter(|e| e.is_healthy()).count()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EndpointStatus {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default = "unknown")]
    pub group: String,
    #[serde(default)]
    pub key: Option<String>,
    /// Most recent first.
    #[serde(default)]
    pub results: Vec<CheckResult>,
}

impl EndpointStatus {
    pub fn latest(&self) -> Option<&CheckResult> {
        self.results.first()
    }

    /// Health is decided by the latest result alone; no results means unhealthy.
    pub fn is_healthy(&self) -> bool {
        self.latest().is_some_and(|r| r.success)
    }

    /// `(successful, total)` over the whole returned history.
    pub fn success_ratio(&self) -> (usize, usize) {
        let ok = self.results.iter().filter(|r| r.success).count();
        (ok, self.results.len())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub success: bool,
    /// Nanoseconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub timestamp: String,
}

impl CheckResult {
    /// Duration rounded to whole milliseconds, ties to even.
    pub fn duration_ms(&self) -> u64 {
        let (ms, rem) = (self.duration / NANOS_PER_MILLI, self.duration % NANOS_PER_MILLI);
        let half = NANOS_PER_MILLI / 2;
        if rem > half || (rem == half && ms % 2 == 1) {
            ms + 1
        } else {
            ms
        }
    }
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gatus_payload() {
        let raw = r#"[
          {
            "name": "RPC",
            "group": "core",
            "key": "core_rpc",
            "results": [
              {"status": 200, "hostname": "rpc.example.com", "duration": 15000000,
               "conditionResults": [{"condition": "[STATUS] == 200", "success": true}],
               "success": true, "timestamp": "2024-05-01T12:00:00.123456Z"},
              {"duration": 21000000, "success": false, "timestamp": "2024-05-01T11:59:00Z"}
            ],
            "events": [{"type": "HEALTHY"}]
          },
          {"key": "bare"}
        ]"#;

        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.len(), 2);

        let rpc = &snapshot.endpoints[0];
        assert_eq!(rpc.name, "RPC");
        assert_eq!(rpc.key.as_deref(), Some("core_rpc"));
        assert_eq!(rpc.results.len(), 2);
        assert!(rpc.is_healthy());
        assert_eq!(rpc.success_ratio(), (1, 2));
        assert_eq!(rpc.latest().map(CheckResult::duration_ms), Some(15));

        let bare = &snapshot.endpoints[1];
        assert_eq!(bare.name, "Unknown");
        assert_eq!(bare.group, "Unknown");
        assert!(bare.results.is_empty());
        assert!(!bare.is_healthy());
        assert_eq!(bare.success_ratio(), (0, 0));
    }

    #[test]
    fn missing_result_fields_default() {
        let r: CheckResult = serde_json::from_str("{}").unwrap();
        assert!(!r.success);
        assert_eq!(r.duration, 0);
        assert_eq!(r.timestamp, "");
    }

    #[test]
    fn duration_rounds_to_whole_millis() {
        let ms = |ns| CheckResult { duration: ns, ..Default::default() }.duration_ms();
        assert_eq!(ms(0), 0);
        assert_eq!(ms(15_000_000), 15);
        assert_eq!(ms(15_499_999), 15);
        assert_eq!(ms(15_500_000), 16);
        assert_eq!(ms(14_500_000), 14);
        assert_eq!(ms(14_500_001), 15);
        // 18_446_744_073_709_551_615 ns ends in 551_615, above the half.
        assert_eq!(ms(u64::MAX), u64::MAX / 1_000_000 + 1);
    }
}
