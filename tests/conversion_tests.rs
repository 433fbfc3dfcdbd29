use std::fs;

use subc::models::{OutcomeKind, RunStatus, Tally};
use subc::utils::base64::{base64_decode, base64_encode};
use subc::{
    ConversionReport, ConversionRequest, ConversionState, ConversionTarget, ConvertError,
    ConvertOptions, Converter, Settings,
};

const SS: &str = "ss://YWVzLTI1Ni1nY206cGFzcw@ss.example.com:8388#ss-node";
const VMESS: &str = "vmess://eyJ2IjoiMiIsInBzIjoidm0iLCJhZGQiOiJ2bS5leGFtcGxlLmNvbSIsInBvcnQiOiI0NDMiLCJpZCI6ImI4MzEzODFkLTYzMjQtNGQ1My1hZDRmLThjZGE0OGIzMDgxMSIsImFpZCI6IjAiLCJuZXQiOiJ3cyIsInR5cGUiOiJub25lIiwiaG9zdCI6ImNkbi5leGFtcGxlLmNvbSIsInBhdGgiOiIvcmF5IiwidGxzIjoidGxzIn0=";

#[cfg(test)]
mod conversion_tests {
    use super::*;

    fn run(
        target: ConversionTarget,
        content: &str,
        options: ConvertOptions,
    ) -> (
        tempfile::TempDir,
        ConversionState,
        Result<ConversionReport, ConvertError>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sub.txt");
        fs::write(&source, content).unwrap();

        let settings = Settings::default();
        let request =
            ConversionRequest::new(target, source, dir.path().join("out/result"), options);
        let mut converter = Converter::new(request, &settings);
        let result = converter.run();
        let state = converter.state();
        (dir, state, result)
    }

    #[test]
    fn test_mixed_input_scenario() {
        let content = format!("{}\n\ngarbageline\n{}\n", SS, VMESS);
        let (dir, state, result) = run(
            ConversionTarget::Base64Links,
            &content,
            ConvertOptions::default(),
        );
        let report = result.unwrap();

        assert_eq!(state, ConversionState::Done);
        assert_eq!(
            report.tally,
            Tally {
                success: 2,
                warning: 0,
                error: 1
            }
        );
        assert_eq!(report.status, RunStatus::Warning);

        // The blank line produces no outcome
        let lines: Vec<usize> = report.outcomes.iter().map(|o| o.line).collect();
        assert_eq!(lines, vec![1, 3, 4]);
        assert_eq!(report.outcomes[1].kind, OutcomeKind::Error);
        assert_eq!(report.outcomes[1].message, "unrecognized scheme");

        let written = fs::read_to_string(dir.path().join("out/result")).unwrap();
        let links: Vec<&str> = written.lines().collect();
        assert_eq!(links.len(), 2);
        assert!(links[0].starts_with("ss://"));
        assert!(links[0].ends_with("#ss-node"));
        assert!(links[1].starts_with("vmess://"));
    }

    #[test]
    fn test_clash_output_selector_members() {
        let content = format!("{}\n{}\n", VMESS, SS);
        let (dir, _state, result) = run(
            ConversionTarget::ClashYaml,
            &content,
            ConvertOptions::default(),
        );
        assert_eq!(result.unwrap().status, RunStatus::Success);

        let written = fs::read_to_string(dir.path().join("out/result")).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();

        let proxies = doc["proxies"].as_sequence().unwrap();
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[0]["name"], "vm");
        assert_eq!(proxies[0]["type"], "vmess");
        assert_eq!(proxies[0]["port"], 443);
        assert_eq!(proxies[0]["ws-opts"]["headers"]["Host"], "cdn.example.com");
        assert_eq!(proxies[1]["name"], "ss-node");

        let selector = &doc["proxy-groups"][0];
        assert_eq!(selector["type"], "select");
        assert_eq!(selector["name"], "PROXY");
        let members: Vec<&str> = selector["proxies"]
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(|m| m.as_str())
            .collect();
        assert_eq!(members, vec!["vm", "ss-node"]);

        let rules = doc["rules"].as_sequence().unwrap();
        assert_eq!(rules.last().and_then(|r| r.as_str()), Some("MATCH,PROXY"));
    }

    #[test]
    fn test_wrapped_link_list() {
        let (dir, _state, result) = run(
            ConversionTarget::Base64Links,
            SS,
            ConvertOptions { wrap_base64: true },
        );
        result.unwrap();

        let written = fs::read_to_string(dir.path().join("out/result")).unwrap();
        let decoded = base64_decode(&written).unwrap();
        assert!(decoded.starts_with("ss://"));
        assert!(decoded.ends_with('\n'));
    }

    #[test]
    fn test_base64_subscription_source() {
        let body = base64_encode(&format!("{}\n{}", SS, VMESS));
        let (_dir, _state, result) =
            run(ConversionTarget::ClashYaml, &body, ConvertOptions::default());
        let report = result.unwrap();
        assert_eq!(report.tally.success, 2);
        assert_eq!(report.status, RunStatus::Success);
    }

    #[test]
    fn test_default_names_for_unnamed_nodes() {
        let content = "trojan://a@one.example.com:443\ntrojan://b@two.example.com:443#named\ntrojan://c@three.example.com:443\n";
        let (dir, _state, result) = run(
            ConversionTarget::ClashYaml,
            content,
            ConvertOptions::default(),
        );
        result.unwrap();

        let written = fs::read_to_string(dir.path().join("out/result")).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();
        let names: Vec<&str> = doc["proxies"]
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        assert_eq!(names, vec!["node-1", "named", "node-3"]);
    }

    #[test]
    fn test_empty_source_fails() {
        let (dir, state, result) =
            run(ConversionTarget::ClashYaml, "\n\n", ConvertOptions::default());

        assert!(matches!(result, Err(ConvertError::EmptyResult { lines: 0 })));
        assert_eq!(state, ConversionState::Failed);
        assert!(!dir.path().join("out/result").exists());
    }

    #[test]
    fn test_only_invalid_lines_fail() {
        let (_dir, state, result) = run(
            ConversionTarget::Base64Links,
            "vmess://not-base64!\nhttp://example.com\n",
            ConvertOptions::default(),
        );

        assert!(matches!(result, Err(ConvertError::EmptyResult { lines: 2 })));
        assert_eq!(state, ConversionState::Failed);
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let request = ConversionRequest::new(
            ConversionTarget::ClashYaml,
            dir.path().join("missing.txt"),
            dir.path().join("out.yaml"),
            ConvertOptions::default(),
        );
        let mut converter = Converter::new(request, &settings);

        let err = converter.run().unwrap_err();
        assert!(matches!(err, ConvertError::Source { .. }));
        assert!(err.to_string().contains("missing.txt"));
        assert_eq!(converter.state(), ConversionState::Failed);
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sub.txt");
        fs::write(&source, SS).unwrap();
        // A regular file cannot act as the parent directory
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let settings = Settings::default();
        let request = ConversionRequest::new(
            ConversionTarget::Base64Links,
            source,
            blocker.join("out.txt"),
            ConvertOptions::default(),
        );
        let mut converter = Converter::new(request, &settings);

        assert!(matches!(converter.run(), Err(ConvertError::Write { .. })));
        assert_eq!(converter.state(), ConversionState::Failed);
    }
}
