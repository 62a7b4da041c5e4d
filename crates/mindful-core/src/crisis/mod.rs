//! Crisis Detector - Keyword-driven safety screening
//!
//! Every inbound message is screened before any reply is generated.
//! Classification is a pure function over three fixed, disjoint keyword
//! tiers evaluated strictly in priority order: any high-risk signal
//! dominates regardless of co-occurring lower-risk language, so the
//! medium and low tiers are never even scanned once high matches.
//!
//! The detector holds no state and touches no storage; its caller is
//! responsible for the audit write (see `GraphStore::append_crisis_log`)
//! and for gating the reply path on the returned level.

use serde::{Deserialize, Serialize};

// ============================================================================
// KEYWORD TIERS
// ============================================================================

/// High-risk tier: immediate self-harm or harm-to-others signals.
/// Any match short-circuits classification at level high.
pub const HIGH_RISK_KEYWORDS: &[&str] = &[
    "kill myself",
    "suicide",
    "suicidal",
    "want to die",
    "end my life",
    "end it all",
    "better off dead",
    "no reason to live",
    "hurt myself",
    "self-harm",
    "self harm",
    "cut myself",
    "kill someone",
    "hurt someone",
    "want them dead",
];

/// Medium-risk tier: acute distress without an explicit harm signal.
pub const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "hopeless",
    "worthless",
    "can't go on",
    "cant go on",
    "give up on everything",
    "hate myself",
    "no point anymore",
    "nobody cares",
    "empty inside",
    "can't take it",
    "cant take it",
    "trapped",
];

/// Low-risk tier: everyday struggle language worth noticing, not escalating.
pub const LOW_RISK_KEYWORDS: &[&str] = &[
    "anxious",
    "depressed",
    "overwhelmed",
    "stressed",
    "panic",
    "lonely",
    "can't sleep",
    "cant sleep",
    "exhausted",
    "worried",
    "struggling",
];

// ============================================================================
// FIXED REPLY TEXT
// ============================================================================

/// Fixed, non-AI-generated safety reply for high-risk detections.
/// Returned verbatim in place of a generated reply; the normal reply
/// pipeline (including extraction) is skipped for that turn.
pub const INTERVENTION_MESSAGE: &str = "I'm really concerned about what you're sharing with me. \
Your safety matters, and I want you to talk to someone who can support you right now.\n\n\
- Call or text 988 (Suicide & Crisis Lifeline, 24/7)\n\
- Text HOME to 741741 (Crisis Text Line)\n\
- If you are in immediate danger, call 911\n\n\
You don't have to go through this alone. Would you be willing to reach out to one of these resources?";

/// Fixed supportive preamble prefixed to the generated reply for
/// medium-risk detections.
pub const SUPPORT_PREAMBLE: &str = "It sounds like you're carrying something heavy right now, \
and I'm glad you're putting it into words. If it ever feels like too much, the 988 Suicide & \
Crisis Lifeline (call or text 988) is there around the clock.\n\n";

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Crisis risk level, in escalating order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrisisLevel {
    /// No tier matched
    #[default]
    None,
    /// Low-risk language only
    Low,
    /// Acute distress, supportive resources shown
    Medium,
    /// Immediate risk, fixed intervention reply, normal pipeline skipped
    High,
}

impl CrisisLevel {
    /// String representation used in audit records
    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisLevel::None => "none",
            CrisisLevel::Low => "low",
            CrisisLevel::Medium => "medium",
            CrisisLevel::High => "high",
        }
    }

    /// Whether the normal reply pipeline (and extraction) runs for this turn
    pub fn allows_normal_reply(&self) -> bool {
        !matches!(self, CrisisLevel::High)
    }

    /// Whether the detection produces an audit write
    pub fn is_loggable(&self) -> bool {
        matches!(self, CrisisLevel::Medium | CrisisLevel::High)
    }
}

impl std::fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of screening one message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisAssessment {
    /// Classified risk level
    pub level: CrisisLevel,
    /// Every keyword that matched within the winning tier, in tier order
    pub matched_keywords: Vec<String>,
    /// High-risk only: the orchestrator must return the fixed safety reply
    pub requires_intervention: bool,
    /// Medium and high: support resources are surfaced to the user
    pub show_resources: bool,
}

impl CrisisAssessment {
    fn clear() -> Self {
        Self {
            level: CrisisLevel::None,
            matched_keywords: Vec::new(),
            requires_intervention: false,
            show_resources: false,
        }
    }
}

/// Collect every tier keyword present in the lowercased text, in tier order.
fn tier_matches(lowered: &str, tier: &[&str]) -> Vec<String> {
    tier.iter()
        .filter(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// Classify one message against the three keyword tiers.
///
/// Case-insensitive substring matching, strict priority order: the high
/// tier is scanned in full first, and any match there returns
/// immediately with every matching high-risk keyword accumulated. The
/// medium and low tiers follow the same accumulate-then-return shape.
///
/// ```
/// use mindful_core::crisis::{classify, CrisisLevel};
///
/// let result = classify("I want to die today");
/// assert_eq!(result.level, CrisisLevel::High);
/// assert!(result.requires_intervention);
/// ```
pub fn classify(text: &str) -> CrisisAssessment {
    let lowered = text.to_lowercase();

    let high = tier_matches(&lowered, HIGH_RISK_KEYWORDS);
    if !high.is_empty() {
        return CrisisAssessment {
            level: CrisisLevel::High,
            matched_keywords: high,
            requires_intervention: true,
            show_resources: true,
        };
    }

    let medium = tier_matches(&lowered, MEDIUM_RISK_KEYWORDS);
    if !medium.is_empty() {
        return CrisisAssessment {
            level: CrisisLevel::Medium,
            matched_keywords: medium,
            requires_intervention: false,
            show_resources: true,
        };
    }

    let low = tier_matches(&lowered, LOW_RISK_KEYWORDS);
    if !low.is_empty() {
        return CrisisAssessment {
            level: CrisisLevel::Low,
            matched_keywords: low,
            requires_intervention: false,
            show_resources: false,
        };
    }

    CrisisAssessment::clear()
}

// ============================================================================
// TESTS
// ============================================================================
