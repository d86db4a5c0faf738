use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tone of a feedback entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Position when listing most-negative first.
    pub fn rank(&self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(anyhow::anyhow!("Invalid sentiment: {}", s)),
        }
    }
}

/// How soon someone should look at it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "high" => Ok(Urgency::High),
            "medium" => Ok(Urgency::Medium),
            "low" => Ok(Urgency::Low),
            _ => Err(anyhow::anyhow!("Invalid urgency: {}", s)),
        }
    }
}

/// Product impact of acting on the feedback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Critical,
    FeatureRequest,
    NiceToHave,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "critical",
            Impact::FeatureRequest => "feature_request",
            Impact::NiceToHave => "nice_to_have",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Impact::Critical => 0,
            Impact::FeatureRequest => 1,
            Impact::NiceToHave => 2,
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Impact {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "critical" => Ok(Impact::Critical),
            "feature_request" => Ok(Impact::FeatureRequest),
            "nice_to_have" => Ok(Impact::NiceToHave),
            _ => Err(anyhow::anyhow!("Invalid impact: {}", s)),
        }
    }
}

/// The three labels the classifier assigns to one entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub urgency: Urgency,
    pub impact: Impact,
}

impl Classification {
    /// Parse the classifier's reply. Markdown fences are tolerated; unknown
    /// labels are not.
    pub fn parse(reply: &str) -> Result<Self> {
        let json = llm_client::strip_code_blocks(reply).trim();
        serde_json::from_str(json)
            .with_context(|| format!("Classifier returned an unusable reply: {}", reply))
    }
}
