//! Stored domain records.
//!
//! These are the JSON shapes served by the REST surface and persisted by
//! `stepsync-store`. Timestamps are RFC 3339 strings throughout; enums are
//! lowercase on the wire and in the database.

use serde::{Deserialize, Serialize};

/// Tutorial difficulty tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Suitable for first-time dancers.
    Beginner,
    /// Some experience assumed.
    Intermediate,
    /// Full routines at tempo.
    Advanced,
}

impl Difficulty {
    /// Database/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse the database/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Challenge difficulty tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeDifficulty {
    /// Open to everyone.
    Easy,
    /// Requires practice.
    Medium,
    /// Competition level.
    Hard,
}

impl ChallengeDifficulty {
    /// Database/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse the database/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Practice session formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// Single dancer.
    Solo,
    /// Two dancers in one room.
    Partner,
    /// Three or more dancers.
    Group,
}

impl SessionType {
    /// Database/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Partner => "partner",
            Self::Group => "group",
        }
    }

    /// Parse the database/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "solo" => Some(Self::Solo),
            "partner" => Some(Self::Partner),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// A registered dancer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Caller-supplied stable identifier.
    pub user_id: String,
    /// Display name.
    pub username: String,
    /// Avatar URL.
    pub profile_pic_url: String,
    /// Optional on-chain wallet address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

/// A dance tutorial video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanceTutorial {
    /// Server-assigned identifier.
    pub tutorial_id: String,
    /// Title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Video URL.
    pub video_url: String,
    /// Style name (stored lowercase, e.g. `hiphop`).
    pub dance_style: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Length in seconds.
    pub duration: i64,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Instructor display name.
    pub instructor: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// A community dance challenge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Server-assigned identifier.
    pub challenge_id: String,
    /// Title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// RFC 3339 start of the entry window.
    pub start_date: String,
    /// RFC 3339 end of the entry window.
    pub end_date: String,
    /// User who created the challenge.
    pub creator_id: String,
    /// Optional prize description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
    /// Difficulty tier.
    pub difficulty: ChallengeDifficulty,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// A video submission to a challenge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Server-assigned identifier.
    pub submission_id: String,
    /// Challenge being entered.
    pub challenge_id: String,
    /// Submitting user.
    pub user_id: String,
    /// Video URL.
    pub video_url: String,
    /// RFC 3339 submission time.
    pub timestamp: String,
    /// Like count.
    pub likes: i64,
    /// View count.
    pub views: i64,
    /// Optional title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A practice session. Its `session_id` doubles as the sync layer's room ID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    /// Server-assigned identifier (the sync room ID).
    pub session_id: String,
    /// First participant.
    pub user_id1: String,
    /// Optional second participant (absent for solo practice).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id2: Option<String>,
    /// Optional tutorial being practiced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutorial_id: Option<String>,
    /// RFC 3339 start time.
    pub start_time: String,
    /// RFC 3339 end time, once the session finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Whether the session is currently live.
    pub is_live: bool,
    /// Session format.
    pub session_type: SessionType,
    /// Optional recording URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
}

/// AI-generated feedback for a practice session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFeedback {
    /// Server-assigned identifier.
    pub feedback_id: String,
    /// Session the feedback concerns.
    pub session_id: String,
    /// User being scored.
    pub user_id: String,
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
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Whether premium-tier analysis was requested.
    pub is_premium: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn difficulty_roundtrip() {
        for d in [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ] {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn session_type_roundtrip() {
        for t in [SessionType::Solo, SessionType::Partner, SessionType::Group] {
            assert_eq!(SessionType::parse(t.as_str()), Some(t));
        }
        assert_eq!(SessionType::parse("duet"), None);
    }

    #[test]
    fn challenge_difficulty_roundtrip() {
        for d in [
            ChallengeDifficulty::Easy,
            ChallengeDifficulty::Medium,
            ChallengeDifficulty::Hard,
        ] {
            assert_eq!(ChallengeDifficulty::parse(d.as_str()), Some(d));
        }
    }

    #[test]
    fn user_wire_shape() {
        let user = User {
            user_id: "fid_42".into(),
            username: "ada".into(),
            profile_pic_url: "https://pics.example/ada.png".into(),
            wallet_address: None,
        };
        let v: Value = serde_json::to_value(&user).unwrap();
        assert_eq!(v["userId"], "fid_42");
        assert_eq!(v["profilePicUrl"], "https://pics.example/ada.png");
        // None fields are omitted, matching the original API responses
        assert!(v.get("walletAddress").is_none());
    }

    #[test]
    fn tutorial_difficulty_serializes_lowercase() {
        let v = serde_json::to_value(Difficulty::Intermediate).unwrap();
        assert_eq!(v, "intermediate");
    }

    #[test]
    fn practice_session_wire_shape() {
        let session = PracticeSession {
            session_id: "sess_1".into(),
            user_id1: "fid_1".into(),
            user_id2: Some("fid_2".into()),
            tutorial_id: None,
            start_time: "2026-08-30T12:00:00Z".into(),
            end_time: None,
            is_live: true,
            session_type: SessionType::Partner,
            recording_url: None,
        };
        let v: Value = serde_json::to_value(&session).unwrap();
        assert_eq!(v["sessionId"], "sess_1");
        assert_eq!(v["userId1"], "fid_1");
        assert_eq!(v["isLive"], true);
        assert_eq!(v["sessionType"], "partner");
        assert!(v.get("tutorialId").is_none());
    }

    #[test]
    fn feedback_deserializes_from_wire() {
        let wire = r#"{
            "feedbackId": "fbk_1",
            "sessionId": "sess_1",
            "userId": "fid_1",
            "overallScore": 82,
            "rhythmScore": 78,
            "formScore": 85,
            "energyScore": 80,
            "suggestions": ["Keep practicing to improve your timing"],
            "timestamp": "2026-08-30T12:00:00Z",
            "isPremium": false
        }"#;
        let fb: AiFeedback = serde_json::from_str(wire).unwrap();
        assert_eq!(fb.overall_score, 82);
        assert_eq!(fb.suggestions.len(), 1);
        assert!(!fb.is_premium);
    }
}
