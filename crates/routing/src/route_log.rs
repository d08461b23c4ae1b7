//! RouteLog - Bounded in-memory record of routing decisions

use serde::{Deserialize, Serialize};
use shared::{ConfigOverrides, RouteEvent, RouteObserver, RuleEvaluation};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// One recorded routing decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub timestamp: String,
    pub target_agent: String,
    pub matcher_type: String,
    pub matched_content: String,
    pub config_overrides: Option<ConfigOverrides>,
    pub debug_trace: Option<Vec<RuleEvaluation>>,
}

impl From<&RouteEvent> for RouteEntry {
    fn from(event: &RouteEvent) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            target_agent: event.target_agent.clone(),
            matcher_type: event.matcher_type.clone(),
            matched_content: event.matched_content.clone(),
            config_overrides: event.config_overrides.clone(),
            debug_trace: event.debug_trace.clone(),
        }
    }
}

/// Route log statistics
#[derive(Debug, Clone, Default)]
pub struct RouteStats {
    pub total_entries: usize,
    pub by_agent: BTreeMap<String, usize>,
    pub by_matcher_type: BTreeMap<String, usize>,
}

/// Route log, usable directly as a [`RouteObserver`]
#[derive(Debug)]
pub struct RouteLog {
    entries: Mutex<VecDeque<RouteEntry>>,
    max_entries: usize,
}

impl RouteLog {
    /// Create a new RouteLog keeping at most `max_entries`
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_entries.min(1024))),
            max_entries,
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<RouteEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an entry, evicting the oldest when full
    pub fn record(&self, entry: RouteEntry) {
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries();
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Most recent entries first
    pub fn get_recent(&self, limit: usize) -> Vec<RouteEntry> {
        self.entries().iter().rev().take(limit).cloned().collect()
    }

    /// Most recent entries routed to `agent`
    pub fn get_recent_for_agent(&self, agent: &str, limit: usize) -> Vec<RouteEntry> {
        self.entries()
            .iter()
            .rev()
            .filter(|e| e.target_agent == agent)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get_stats(&self) -> RouteStats {
        let entries = self.entries();
        let mut stats = RouteStats {
            total_entries: entries.len(),
            ..Default::default()
        };

        for entry in entries.iter() {
            *stats.by_agent.entry(entry.target_agent.clone()).or_default() += 1;
            *stats
                .by_matcher_type
                .entry(entry.matcher_type.clone())
                .or_default() += 1;
        }

        stats
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Export as JSON, oldest first
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries().iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

impl Default for RouteLog {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl RouteObserver for RouteLog {
    fn on_route(&self, event: &RouteEvent) {
        self.record(RouteEntry::from(event));
    }
}

/// Emits one `tracing` event per routing decision
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl RouteObserver for TracingObserver {
    fn on_route(&self, event: &RouteEvent) {
        tracing::info!(
            target_agent = %event.target_agent,
            matcher = %event.matcher_type,
            matched = %event.matched_content,
            overrides = event.config_overrides.is_some(),
            "routed request"
        );

        if let Some(trace) = &event.debug_trace {
            for step in trace {
                tracing::debug!(
                    index = step.index,
                    matcher = %step.matcher_type,
                    target = %step.target_agent,
                    matched = step.matched,
                    "rule evaluation"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(target: &str, matcher_type: &str) -> RouteEvent {
        RouteEvent {
            target_agent: target.to_string(),
            matcher_type: matcher_type.to_string(),
            matched_content: "always".to_string(),
            config_overrides: None,
            debug_trace: None,
        }
    }

    #[test]
    fn test_record_via_observer() {
        let log = RouteLog::new(100);
        log.on_route(&event("oracle", "keyword"));

        let stats = log.get_stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.by_agent["oracle"], 1);
        assert_eq!(stats.by_matcher_type["keyword"], 1);
    }

    #[test]
    fn test_max_entries_limit() {
        let log = RouteLog::new(3);
        for target in ["a1", "a2", "a3", "a4"] {
            log.on_route(&event(target, "always"));
        }

        assert_eq!(log.get_stats().total_entries, 3);
        let recent = log.get_recent(10);
        assert!(recent.iter().all(|e| e.target_agent != "a1"));
    }

    #[test]
    fn test_get_recent_order() {
        let log = RouteLog::new(100);
        for target in ["a1", "a2", "a3"] {
            log.on_route(&event(target, "always"));
        }

        let recent = log.get_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].target_agent, "a3");
        assert_eq!(recent[1].target_agent, "a2");
    }

    #[test]
    fn test_recent_for_agent() {
        let log = RouteLog::new(100);
        log.on_route(&event("oracle", "keyword"));
        log.on_route(&event("explore", "regex"));
        log.on_route(&event("oracle", "always"));

        let oracle = log.get_recent_for_agent("oracle", 10);
        assert_eq!(oracle.len(), 2);
        assert_eq!(oracle[0].matcher_type, "always");
    }

    #[test]
    fn test_export_json_and_clear() {
        let log = RouteLog::new(100);
        log.on_route(&event("a", "keyword"));
        log.on_route(&event("b", "regex"));

        let json = log.export_json();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["target_agent"], "a");

        log.clear();
        assert_eq!(log.get_stats().total_entries, 0);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let log = RouteLog::new(0);
        log.on_route(&event("a", "always"));
        assert!(log.get_recent(10).is_empty());
    }

    #[test]
    fn test_default_max_entries() {
        assert_eq!(RouteLog::default().max_entries, 10000);
    }
}
