use log::{debug, warn};

use crate::models::{DecodeOutcome, LineOutcome, OutcomeKind, Proxy, Tally};

/// Ordered collection of decoded nodes for one conversion run.
///
/// Nodes keep first-decode order; nothing is sorted or deduplicated here.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Proxy>,
    outcomes: Vec<LineOutcome>,
    tally: Tally,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of input line `line` (1-based).
    ///
    /// Successful nodes without a name get `node-<n>`, where `n` is their
    /// position among successfully decoded nodes.
    pub fn record(&mut self, line: usize, outcome: DecodeOutcome) {
        match outcome {
            DecodeOutcome::Success(mut node) => {
                self.tally.success += 1;
                if node.remark.trim().is_empty() {
                    node.remark = format!("node-{}", self.tally.success);
                }
                debug!(
                    "line {}: decoded {} node '{}' ({})",
                    line,
                    node.proxy_type().as_str(),
                    node.remark,
                    node.server_address()
                );
                self.outcomes.push(LineOutcome {
                    line,
                    kind: OutcomeKind::Success,
                    message: node.remark.clone(),
                });
                self.nodes.push(node);
            }
            DecodeOutcome::Warning { scheme, reason } => {
                self.tally.warning += 1;
                warn!("line {}: skipped {} link: {}", line, scheme, reason);
                self.outcomes.push(LineOutcome {
                    line,
                    kind: OutcomeKind::Warning,
                    message: format!("{}: {}", scheme, reason),
                });
            }
            DecodeOutcome::Error { reason } => {
                self.tally.error += 1;
                warn!("line {}: {}", line, reason);
                self.outcomes.push(LineOutcome {
                    line,
                    kind: OutcomeKind::Error,
                    message: reason,
                });
            }
        }
    }

    pub fn nodes(&self) -> &[Proxy] {
        &self.nodes
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn outcomes(&self) -> &[LineOutcome] {
        &self.outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<Proxy> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProxySettings, TrojanProxy};

    fn trojan(remark: &str, host: &str) -> Proxy {
        Proxy::construct(
            remark,
            host,
            443,
            ProxySettings::Trojan(TrojanProxy {
                password: "pw".to_string(),
                ..Default::default()
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_default_names_count_successes_only() {
        let mut registry = NodeRegistry::new();
        registry.record(1, DecodeOutcome::Success(trojan("", "a.example.com")));
        registry.record(
            2,
            DecodeOutcome::Error {
                reason: "unrecognized scheme".to_string(),
            },
        );
        registry.record(3, DecodeOutcome::Success(trojan("named", "b.example.com")));
        registry.record(4, DecodeOutcome::Success(trojan(" ", "c.example.com")));

        let names: Vec<&str> = registry.nodes().iter().map(|n| n.remark.as_str()).collect();
        assert_eq!(names, vec!["node-1", "named", "node-3"]);
    }

    #[test]
    fn test_tally_and_outcomes_follow_input_order() {
        let mut registry = NodeRegistry::new();
        registry.record(
            1,
            DecodeOutcome::Warning {
                scheme: "vmess".to_string(),
                reason: "invalid json".to_string(),
            },
        );
        registry.record(2, DecodeOutcome::Success(trojan("x", "x.example.com")));
        registry.record(
            5,
            DecodeOutcome::Error {
                reason: "unrecognized scheme".to_string(),
            },
        );

        assert_eq!(
            registry.tally(),
            Tally {
                success: 1,
                warning: 1,
                error: 1
            }
        );
        let lines: Vec<usize> = registry.outcomes().iter().map(|o| o.line).collect();
        assert_eq!(lines, vec![1, 2, 5]);
        assert_eq!(registry.outcomes()[0].message, "vmess: invalid json");
        assert_eq!(registry.outcomes()[0].kind, OutcomeKind::Warning);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut registry = NodeRegistry::new();
        registry.record(1, DecodeOutcome::Success(trojan("same", "a.example.com")));
        registry.record(2, DecodeOutcome::Success(trojan("same", "a.example.com")));
        assert_eq!(registry.into_nodes().len(), 2);
    }
}
