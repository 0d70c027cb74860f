//! AI dance-feedback boundary.
//!
//! [`DanceAnalyzer`] is the seam: the remote implementation lives in
//! [`remote`], and [`FeedbackService`] wraps whichever analyzer is
//! configured with a deterministic fallback so callers always get a
//! well-formed payload.

pub mod remote;

use async_trait::async_trait;
use serde::Deserialize;
use stepsync_core::ids;
use stepsync_core::models::AiFeedback;
use thiserror::Error;
use tracing::warn;

pub use remote::RemoteAnalyzer;

/// Errors from the analysis boundary. Callers of [`FeedbackService`]
/// never see these; the service substitutes the fallback payload.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The HTTP call failed.
    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider returned a payload we could not interpret.
    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

/// What the caller wants analyzed.
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    /// Free-form description of the practice video.
    pub video_description: String,
    /// Premium requests ask for deeper suggestions.
    pub is_premium: bool,
}

/// Scores and suggestions for one practice session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Overall score, 0-100.
    pub overall_score: i64,
    /// Rhythm score, 0-100.
    pub rhythm_score: i64,
    /// Form score, 0-100.
    pub form_score: i64,
    /// Energy score, 0-100.
    pub energy_score: i64,
    /// Improvement tips.
    pub suggestions: Vec<String>,
}

/// Scores a described practice video.
#[async_trait]
pub trait DanceAnalyzer: Send + Sync {
    /// Produce scores and suggestions for the request.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, FeedbackError>;
}

/// The payload served when no analyzer is configured or the call fails.
/// Encouraging mid-range scores so the client UI renders something useful.
pub fn fallback_analysis(request: &AnalysisRequest) -> Analysis {
    let mut suggestions = vec![
        "Keep practicing to improve your timing".to_string(),
        "Focus on completing each movement fully".to_string(),
    ];
    if request.is_premium {
        suggestions.push("Record from a side angle to check your frame alignment".to_string());
    }
    Analysis {
        overall_score: 75,
        rhythm_score: 72,
        form_score: 78,
        energy_score: 80,
        suggestions,
    }
}

/// Wraps an optional analyzer with the fallback; building a feedback
/// record never fails.
pub struct FeedbackService {
    analyzer: Option<Box<dyn DanceAnalyzer>>,
}

impl FeedbackService {
    /// Service backed by a real analyzer (fallback still applies on error).
    pub fn new(analyzer: Box<dyn DanceAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
        }
    }

    /// Service that always serves the fallback payload.
    pub fn fallback_only() -> Self {
        Self { analyzer: None }
    }

    /// Analyze and assemble a complete feedback record.
    pub async fn generate(
        &self,
        session_id: &str,
        user_id: &str,
        request: &AnalysisRequest,
    ) -> AiFeedback {
        let analysis = match &self.analyzer {
            Some(analyzer) => match analyzer.analyze(request).await {
                Ok(a) => a,
                Err(e) => {
                    warn!(error = %e, session_id, "analysis failed, serving fallback");
                    fallback_analysis(request)
                }
            },
            None => fallback_analysis(request),
        };

        AiFeedback {
            feedback_id: ids::feedback_id(),
            session_id: session_id.to_owned(),
            user_id: user_id.to_owned(),
            overall_score: analysis.overall_score,
            rhythm_score: analysis.rhythm_score,
            form_score: analysis.form_score,
            energy_score: analysis.energy_score,
            suggestions: analysis.suggestions,
            timestamp: chrono::Utc::now().to_rfc3339(),
            is_premium: request.is_premium,
        }
    }
}
