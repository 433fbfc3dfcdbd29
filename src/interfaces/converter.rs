use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, error, info};

use crate::error::{ConvertError, EncodeWarning};
use crate::generator::{ClashEncoder, EncodedDocument, LinkListEncoder, ProxyEncoder};
use crate::models::{LineOutcome, RunStatus, Tally};
use crate::parser::{decode_lines, subscription_lines, NodeRegistry};
use crate::settings::Settings;

/// The output format of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionTarget {
    ClashYaml,
    Base64Links,
}

impl FromStr for ConversionTarget {
    type Err = String;

    /// Parse a mode word such as `clash` or `base64`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clash" => Ok(ConversionTarget::ClashYaml),
            "base64" => Ok(ConversionTarget::Base64Links),
            _ => Err(format!("unknown target: {}", s)),
        }
    }
}

impl ConversionTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionTarget::ClashYaml => "clash",
            ConversionTarget::Base64Links => "base64",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Wrap the whole link list in one Base64 body
    pub wrap_base64: bool,
}

/// One conversion job. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    target: ConversionTarget,
    source: PathBuf,
    destination: PathBuf,
    options: ConvertOptions,
}

impl ConversionRequest {
    pub fn new(
        target: ConversionTarget,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        options: ConvertOptions,
    ) -> Self {
        ConversionRequest {
            target,
            source: source.into(),
            destination: destination.into(),
            options,
        }
    }

    pub fn target(&self) -> ConversionTarget {
        self.target
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn options(&self) -> ConvertOptions {
        self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Idle,
    Reading,
    Decoding,
    Encoding,
    Writing,
    Done,
    Failed,
}

impl ConversionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionState::Idle => "idle",
            ConversionState::Reading => "reading",
            ConversionState::Decoding => "decoding",
            ConversionState::Encoding => "encoding",
            ConversionState::Writing => "writing",
            ConversionState::Done => "done",
            ConversionState::Failed => "failed",
        }
    }
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub tally: Tally,
    /// One entry per non-blank input line, in input order
    pub outcomes: Vec<LineOutcome>,
    /// Nodes decoded but left out by the encoder
    pub skipped: Vec<EncodeWarning>,
    pub status: RunStatus,
}

impl ConversionReport {
    fn new(registry: &NodeRegistry, skipped: Vec<EncodeWarning>) -> Self {
        let tally = registry.tally();
        ConversionReport {
            tally,
            outcomes: registry.outcomes().to_vec(),
            status: RunStatus::classify(&tally, skipped.len()),
            skipped,
        }
    }
}

/// Encoded document plus the report of the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    pub report: ConversionReport,
}

/// Pick the encoder for `target`.
pub fn encoder_for<'a>(
    target: ConversionTarget,
    options: ConvertOptions,
    settings: &'a Settings,
) -> Box<dyn ProxyEncoder + 'a> {
    match target {
        ConversionTarget::ClashYaml => Box::new(ClashEncoder::new(settings)),
        ConversionTarget::Base64Links => Box::new(LinkListEncoder::new(options.wrap_base64)),
    }
}

/// Encode the registry's nodes, failing when nothing ends up in the document.
pub fn encode_registry(
    registry: &NodeRegistry,
    target: ConversionTarget,
    options: ConvertOptions,
    settings: &Settings,
) -> Result<EncodedDocument, ConvertError> {
    let lines = registry.tally().total();
    if registry.is_empty() {
        return Err(ConvertError::EmptyResult { lines });
    }

    let document = encoder_for(target, options, settings).encode(registry.nodes())?;
    if document.emitted == 0 {
        return Err(ConvertError::EmptyResult { lines });
    }
    Ok(document)
}

/// Convert already split lines without touching the filesystem.
pub fn convert_lines<'a, I>(
    lines: I,
    target: ConversionTarget,
    options: ConvertOptions,
    settings: &Settings,
) -> Result<Conversion, ConvertError>
where
    I: IntoIterator<Item = &'a str>,
{
    let registry = decode_lines(lines);
    let document = encode_registry(&registry, target, options, settings)?;

    Ok(Conversion {
        report: ConversionReport::new(&registry, document.skipped),
        text: document.text,
    })
}

/// Convert a whole subscription body, unwrapping a Base64 body first.
pub fn convert_content(
    content: &str,
    target: ConversionTarget,
    options: ConvertOptions,
    settings: &Settings,
) -> Result<Conversion, ConvertError> {
    let lines = subscription_lines(content);
    convert_lines(lines.iter().map(String::as_str), target, options, settings)
}

/// Drives one file-to-file conversion through its states.
pub struct Converter<'a> {
    request: ConversionRequest,
    settings: &'a Settings,
    state: ConversionState,
}

impl<'a> Converter<'a> {
    pub fn new(request: ConversionRequest, settings: &'a Settings) -> Self {
        Converter {
            request,
            settings,
            state: ConversionState::Idle,
        }
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    fn transition(&mut self, next: ConversionState) {
        debug!("conversion {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
    }

    /// Run the conversion. Any error leaves the converter in `Failed`.
    pub fn run(&mut self) -> Result<ConversionReport, ConvertError> {
        self.state = ConversionState::Idle;
        match self.execute() {
            Ok(report) => {
                self.transition(ConversionState::Done);
                info!(
                    "{}: {} succeeded, {} warnings, {} errors",
                    report.status,
                    report.tally.success,
                    report.tally.warning,
                    report.tally.error
                );
                Ok(report)
            }
            Err(err) => {
                error!("conversion failed while {}: {}", self.state.as_str(), err);
                self.transition(ConversionState::Failed);
                Err(err)
            }
        }
    }

    fn execute(&mut self) -> Result<ConversionReport, ConvertError> {
        let target = self.request.target();
        let options = self.request.options();
        info!(
            "converting {} to {} ({})",
            self.request.source().display(),
            self.request.destination().display(),
            target.as_str()
        );

        self.transition(ConversionState::Reading);
        let source = self.request.source().to_path_buf();
        let content = fs::read_to_string(&source).map_err(|source_err| ConvertError::Source {
            path: source.clone(),
            source: source_err,
        })?;

        self.transition(ConversionState::Decoding);
        let lines = subscription_lines(&content);
        let registry = decode_lines(lines.iter().map(String::as_str));

        self.transition(ConversionState::Encoding);
        let document = encode_registry(&registry, target, options, self.settings)?;

        self.transition(ConversionState::Writing);
        let destination = self.request.destination().to_path_buf();
        write_destination(&destination, &document.text)?;

        Ok(ConversionReport::new(&registry, document.skipped))
    }
}

fn write_destination(path: &Path, text: &str) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, text).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeKind;

    const SS: &str = "ss://YWVzLTI1Ni1nY206cGFzcw@ss.example.com:8388#first";
    const TROJAN: &str = "trojan://secret@trojan.example.com:443?type=quic#second";

    #[test]
    fn test_target_from_str() {
        assert_eq!(
            "Clash".parse::<ConversionTarget>(),
            Ok(ConversionTarget::ClashYaml)
        );
        assert_eq!(
            "base64".parse::<ConversionTarget>(),
            Ok(ConversionTarget::Base64Links)
        );
        assert!("surge".parse::<ConversionTarget>().is_err());
        for target in [ConversionTarget::ClashYaml, ConversionTarget::Base64Links] {
            assert_eq!(target.as_str().parse::<ConversionTarget>(), Ok(target));
        }
    }

    #[test]
    fn test_convert_lines_to_links() {
        let settings = Settings::default();
        let conversion = convert_lines(
            [SS, "", "nope"],
            ConversionTarget::Base64Links,
            ConvertOptions::default(),
            &settings,
        )
        .unwrap();

        assert_eq!(conversion.text.lines().count(), 1);
        assert_eq!(conversion.report.status, RunStatus::Warning);
        assert_eq!(conversion.report.outcomes.len(), 2);
        assert_eq!(conversion.report.outcomes[1].kind, OutcomeKind::Error);
        assert_eq!(conversion.report.outcomes[1].line, 3);
    }

    #[test]
    fn test_unencodable_node_is_skipped() {
        let settings = Settings::default();
        let conversion = convert_lines(
            [SS, TROJAN],
            ConversionTarget::ClashYaml,
            ConvertOptions::default(),
            &settings,
        )
        .unwrap();

        assert_eq!(conversion.report.tally.success, 2);
        assert_eq!(conversion.report.skipped.len(), 1);
        assert_eq!(conversion.report.skipped[0].name, "second");
        assert_eq!(conversion.report.status, RunStatus::Warning);
    }

    #[test]
    fn test_nothing_encodable_is_empty_result() {
        let settings = Settings::default();
        let result = convert_lines(
            [TROJAN],
            ConversionTarget::ClashYaml,
            ConvertOptions::default(),
            &settings,
        );
        assert!(matches!(
            result,
            Err(ConvertError::EmptyResult { lines: 1 })
        ));

        let result = convert_lines(
            ["", "  "],
            ConversionTarget::Base64Links,
            ConvertOptions::default(),
            &settings,
        );
        assert!(matches!(
            result,
            Err(ConvertError::EmptyResult { lines: 0 })
        ));
    }

    #[test]
    fn test_convert_content_unwraps_base64_body() {
        let settings = Settings::default();
        let body = crate::utils::base64_encode(&format!("{}\n", SS));
        let conversion = convert_content(
            &body,
            ConversionTarget::Base64Links,
            ConvertOptions::default(),
            &settings,
        )
        .unwrap();
        assert_eq!(conversion.report.status, RunStatus::Success);
        assert!(conversion.text.starts_with("ss://"));
    }

    #[test]
    fn test_converter_starts_idle() {
        let settings = Settings::default();
        let request = ConversionRequest::new(
            ConversionTarget::ClashYaml,
            "in.txt",
            "out.yaml",
            ConvertOptions::default(),
        );
        let converter = Converter::new(request, &settings);
        assert_eq!(converter.state(), ConversionState::Idle);
        assert_eq!(converter.request().destination(), Path::new("out.yaml"));
    }
}
