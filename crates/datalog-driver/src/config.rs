use datalog_provenance::ProvenanceMode;

/// Width of the numeric domain used by the downstream engine. Recorded for
/// later lowering stages; it has no effect on inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainWidth {
    #[default]
    Bits32,
    Bits64,
}

/// The configuration of one compilation, fixed for its whole duration and
/// passed explicitly into the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub provenance: ProvenanceMode,
    /// Collect analysis logs for the debug report.
    pub debug_report: bool,
    /// Name of a single analysis whose dump was requested, e.g.
    /// `type-analysis`.
    pub show: Option<String>,
    pub ram_domain_size: DomainWidth,
}

impl Config {
    /// Whether the type analysis should collect its debug channel.
    pub fn wants_type_analysis_debug(&self) -> bool {
        self.debug_report || self.show.as_deref() == Some("type-analysis")
    }
}
