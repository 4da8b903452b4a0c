//! Core domain types shared by the outline classifier and the contact pipeline.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Project outline
// ---------------------------------------------------------------------------

/// Estimated complexity tier of a project outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    Enterprise,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Tier implied purely by the number of accumulated features.
    ///
    /// Returns `None` when the count is low enough that the tier chosen by
    /// category matching should stand.
    pub fn from_feature_count(count: usize) -> Option<Self> {
        match count {
            n if n > 8 => Some(Self::Enterprise),
            n if n > 5 => Some(Self::Complex),
            n if n > 3 => Some(Self::Moderate),
            _ => None,
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text project idea submitted to the AI demo widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectIdeaInput {
    pub idea: String,
}

impl ProjectIdeaInput {
    pub fn new(idea: impl Into<String>) -> Self {
        Self { idea: idea.into() }
    }
}

/// Structured outline returned by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOutline {
    /// One-sentence problem statement.
    pub problem: String,
    /// At most 6 feature names, first-added first.
    pub features: Vec<String>,
    /// At most 8 stack entries.
    pub suggested_stack: Vec<String>,
    pub estimated_complexity: Complexity,
    /// Human-readable window, e.g. `"8-12 weeks"`.
    pub estimated_timeline: String,
    /// At most 4 considerations.
    pub key_considerations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

/// Declares a string-keyed option enum with a display label and description.
macro_rules! form_option {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $value:literal, $label:literal, $description:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant,)+
        }

        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Wire value (e.g. `"10k-25k"`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(Self::$variant => $description,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(format!("unknown {} '{other}'", stringify!($name))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

form_option! {
    /// Budget tier selected on the contact form.
    Budget {
        Under10k => "under-10k", "Under $10,000", "Small projects & MVPs";
        From10kTo25k => "10k-25k", "$10,000 - $25,000", "Standard web applications";
        From25kTo50k => "25k-50k", "$25,000 - $50,000", "Complex applications";
        From50kTo100k => "50k-100k", "$50,000 - $100,000", "Enterprise solutions";
        Over100k => "100k-plus", "$100,000+", "Large-scale platforms";
        NotSure => "not-sure", "Not sure yet", "Let's discuss your needs";
    }
}

form_option! {
    /// Delivery window selected on the contact form.
    Timeline {
        Asap => "asap", "ASAP", "Rush project";
        OneMonth => "1-month", "Within 1 month", "Quick turnaround";
        TwoToThreeMonths => "2-3-months", "2-3 months", "Standard timeline";
        ThreeToSixMonths => "3-6-months", "3-6 months", "Complex project";
        SixPlusMonths => "6-plus-months", "6+ months", "Long-term project";
        Flexible => "flexible", "Flexible", "Quality over speed";
    }
}

/// A validated contact form submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub budget: Budget,
    pub timeline: Timeline,
    pub project_goals: String,
    #[serde(default, rename = "needsAI")]
    pub needs_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_source: Option<String>,
}

/// Outcome of one email dispatch attempt, and of a whole submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDispatchResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The pipeline echoes the primary dispatch result on success.
pub type SubmissionResult = EmailDispatchResult;

// ---------------------------------------------------------------------------
// Latency
// ---------------------------------------------------------------------------

/// Inclusive range of artificial delay used to emulate remote processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Latency {
    /// No delay at all (tests, production transports).
    pub const NONE: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Uniform delay in `[min_ms, max_ms]`. Bounds are swapped if reversed.
    pub fn between_ms(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        Self {
            min: Duration::from_millis(lo),
            max: Duration::from_millis(hi),
        }
    }

    pub fn fixed_ms(ms: u64) -> Self {
        Self::between_ms(ms, ms)
    }

    pub fn is_none(&self) -> bool {
        self.max.is_zero()
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Pick a delay inside the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::NONE
    }
}
