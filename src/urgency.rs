use std::fmt;
use std::str::FromStr;

/// Display label for a severity keyword. Known keywords map to their label,
/// anything else is shown upper-cased.
pub fn format_urgency(urgency: &str) -> String {
    match urgency.parse::<Urgency>() {
        Ok(level) => level.to_string(),
        Err(_) => urgency.to_uppercase(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Urgency::Critical),
            "high" => Ok(Urgency::High),
            "medium" => Ok(Urgency::Medium),
            "low" => Ok(Urgency::Low),
            other => Err(format!("unknown urgency '{}'", other)),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Urgency::Critical => "CRITICAL",
            Urgency::High => "HIGH",
            Urgency::Medium => "MEDIUM",
            Urgency::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Colour band of a ticket's urgency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBand {
    Red,
    Yellow,
    Green,
}

impl UrgencyBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 30.0 {
            UrgencyBand::Red
        } else if score >= 15.0 {
            UrgencyBand::Yellow
        } else {
            UrgencyBand::Green
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            UrgencyBand::Red => "red",
            UrgencyBand::Yellow => "yellow",
            UrgencyBand::Green => "green",
        }
    }
}
