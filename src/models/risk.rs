/// Three-level risk label derived from the classifier's integer class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    LowRisk,
    MidRisk,
    HighRisk,
}

impl RiskLabel {
    /// Map a raw classifier class to a label.
    ///
    /// Classes other than 1 and 2 (including 0) all collapse into
    /// `HighRisk`. The trained model only emits 1..=3, so in practice the
    /// fallthrough covers class 3; an unexpected class from a retrained
    /// model would surface as `HighRisk` rather than an error. Kept as-is
    /// deliberately.
    pub fn from_class(class: usize) -> Self {
        match class {
            1 => RiskLabel::LowRisk,
            2 => RiskLabel::MidRisk,
            _ => RiskLabel::HighRisk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "low_risk",
            RiskLabel::MidRisk => "mid_risk",
            RiskLabel::HighRisk => "high_risk",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low_risk" => Some(RiskLabel::LowRisk),
            "mid_risk" => Some(RiskLabel::MidRisk),
            "high_risk" => Some(RiskLabel::HighRisk),
            _ => None,
        }
    }

    /// User-facing wording shown on the prediction page.
    pub fn message(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Your Health is on Low Risk",
            RiskLabel::MidRisk => "Your Health is on Mid Risk",
            RiskLabel::HighRisk => "Your Health is on High Risk",
        }
    }
}
