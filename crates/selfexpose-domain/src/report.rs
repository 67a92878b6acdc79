use selfexpose_types::{EndpointData, Finding, ScanData, Severity, Verdict};

/// Findings tallied per severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub error: u32,
}

impl SeverityCounts {
    pub fn total(&self) -> u32 {
        self.info + self.warning + self.error
    }

    /// `fail` on any error, `warn` on any warning, otherwise `pass`.
    pub fn verdict(&self) -> Verdict {
        if self.error > 0 {
            Verdict::Fail
        } else if self.warning > 0 {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }
}

impl<'a> FromIterator<&'a Finding> for SeverityCounts {
    fn from_iter<I: IntoIterator<Item = &'a Finding>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SeverityCounts::default(), |mut counts, f| {
                match f.severity {
                    Severity::Info => counts.info += 1,
                    Severity::Warning => counts.warning += 1,
                    Severity::Error => counts.error += 1,
                }
                counts
            })
    }
}

/// Outcome of one evaluation: sorted findings, their tally and the run data.
#[derive(Clone, Debug)]
pub struct Evaluation<TData> {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: TData,
    pub counts: SeverityCounts,
}

impl<TData> Evaluation<TData> {
    /// `findings` must already be in report order.
    pub fn new(findings: Vec<Finding>, data: TData) -> Self {
        let counts: SeverityCounts = findings.iter().collect();
        Self {
            verdict: counts.verdict(),
            findings,
            data,
            counts,
        }
    }
}

pub type DomainReport = Evaluation<ScanData>;
pub type EndpointDomainReport = Evaluation<EndpointData>;
