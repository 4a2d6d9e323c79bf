use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ObservationRecord
// ---------------------------------------------------------------------------

/// One timestamped snapshot of the scraped pricing fields for the tracked
/// product. Immutable after creation; appended to the history store once per
/// poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub product_name: String,
    pub old_price: i64,
    pub new_price: i64,
    pub installment_price: i64,
    pub captured_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// PriceEvent
// ---------------------------------------------------------------------------

/// Classified outcome of comparing a new observation against stored history.
///
/// `FirstSeen`/`Increased`/`Decreased`/`Unchanged` come out of the
/// delta-vs-latest policy; `NewMaximum`/`BelowMaximum` out of the
/// delta-vs-maximum policy. `Unchanged` and `BelowMaximum` never notify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PriceEvent {
    FirstSeen {
        price: i64,
    },
    Increased {
        price: i64,
        previous_price: i64,
        previous_at: DateTime<Utc>,
    },
    Decreased {
        price: i64,
        previous_price: i64,
        previous_at: DateTime<Utc>,
    },
    Unchanged,
    NewMaximum {
        price: i64,
    },
    BelowMaximum {
        current_price: i64,
        max_price: i64,
        max_at: DateTime<Utc>,
    },
}

impl PriceEvent {
    /// Short tag used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PriceEvent::FirstSeen { .. } => "first_seen",
            PriceEvent::Increased { .. } => "increased",
            PriceEvent::Decreased { .. } => "decreased",
            PriceEvent::Unchanged => "unchanged",
            PriceEvent::NewMaximum { .. } => "new_maximum",
            PriceEvent::BelowMaximum { .. } => "below_maximum",
        }
    }
}

impl std::fmt::Display for PriceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// DetectionPolicy
// ---------------------------------------------------------------------------

/// Which history query the detector compares a fresh observation against.
/// One policy per deployment; the two are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionPolicy {
    /// Compare against the most recent record (delta vs. latest).
    Latest,
    /// Compare against the highest price ever recorded (delta vs. running maximum).
    Maximum,
}

impl DetectionPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Some(DetectionPolicy::Latest),
            "maximum" => Some(DetectionPolicy::Maximum),
            _ => None,
        }
    }
}

impl std::fmt::Display for DetectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DetectionPolicy::Latest => "latest",
            DetectionPolicy::Maximum => "maximum",
        };
        write!(f, "{s}")
    }
}
