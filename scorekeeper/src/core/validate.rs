//! Per-item business-rule validation
//!
//! Checks run in a fixed order and short-circuit on the first failure,
//! so a submission that is broken in several ways reports the earliest
//! reason in the sequence. Validation is pure: no cross-item state, no
//! clock.

use super::record::{CLIENT_UA_MAX_LEN, NICKNAME_MAX_LEN, ScoreSubmission, TAG_MAX_LEN, TAGS_MAX};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Points above this are heuristically implausible.
pub const SUSPECT_POINTS_CEILING: i64 = 999_999;
/// A run shorter than this many seconds with more than
/// [`SUSPECT_FAST_POINTS`] points is heuristically implausible.
pub const SUSPECT_FAST_DURATION_SECS: i64 = 10;
pub const SUSPECT_FAST_POINTS: i64 = 10_000;

/// Stable machine-readable rejection codes
///
/// The serialized spelling is the wire contract; callers match on the
/// string, so variants keep their SCREAMING_SNAKE names forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Nickname empty (or whitespace only)
    EmptyNickname,
    /// Nickname longer than [`NICKNAME_MAX_LEN`] characters
    NicknameTooLong,
    /// Negative points
    InvalidPoints,
    /// Negative line count
    InvalidLines,
    /// Negative level
    InvalidLevel,
    /// Negative duration
    InvalidDuration,
    /// More than [`TAGS_MAX`] tags
    TooManyTags,
    /// A tag longer than [`TAG_MAX_LEN`] characters
    TagTooLong,
    /// A client user-agent longer than [`CLIENT_UA_MAX_LEN`] characters
    ClientUaTooLong,
}

impl RejectReason {
    /// The stable wire spelling of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::EmptyNickname => "EMPTY_NICKNAME",
            RejectReason::NicknameTooLong => "NICKNAME_TOO_LONG",
            RejectReason::InvalidPoints => "INVALID_POINTS",
            RejectReason::InvalidLines => "INVALID_LINES",
            RejectReason::InvalidLevel => "INVALID_LEVEL",
            RejectReason::InvalidDuration => "INVALID_DURATION",
            RejectReason::TooManyTags => "TOO_MANY_TAGS",
            RejectReason::TagTooLong => "TAG_TOO_LONG",
            RejectReason::ClientUaTooLong => "CLIENT_UA_TOO_LONG",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error for RejectReason {}

/// Validate a submission against the business rules.
///
/// Checks in order: nickname non-empty after trimming, nickname length,
/// points sign, then sign of each optional numeric field when present,
/// then tag count and tag lengths, then the client user-agent length.
/// First failure wins.
pub fn validate(submission: &ScoreSubmission) -> Result<(), RejectReason> {
    if submission.nickname.trim().is_empty() {
        return Err(RejectReason::EmptyNickname);
    }
    if submission.nickname.chars().count() > NICKNAME_MAX_LEN {
        return Err(RejectReason::NicknameTooLong);
    }
    if submission.points < 0 {
        return Err(RejectReason::InvalidPoints);
    }
    if submission.lines.is_some_and(|n| n < 0) {
        return Err(RejectReason::InvalidLines);
    }
    if submission.level_reached.is_some_and(|n| n < 0) {
        return Err(RejectReason::InvalidLevel);
    }
    if submission.duration_seconds.is_some_and(|n| n < 0) {
        return Err(RejectReason::InvalidDuration);
    }
    if let Some(tags) = &submission.tags {
        if tags.len() > TAGS_MAX {
            return Err(RejectReason::TooManyTags);
        }
        if tags.iter().any(|t| t.chars().count() > TAG_MAX_LEN) {
            return Err(RejectReason::TagTooLong);
        }
    }
    if let Some(client) = &submission.client {
        if client
            .ua
            .as_ref()
            .is_some_and(|ua| ua.chars().count() > CLIENT_UA_MAX_LEN)
        {
            return Err(RejectReason::ClientUaTooLong);
        }
    }
    Ok(())
}

/// Heuristic implausibility check. Never rejects: the result is stored
/// on the record's `suspect` field and ranking does not filter by it.
pub fn is_suspect(submission: &ScoreSubmission) -> bool {
    if submission.points > SUSPECT_POINTS_CEILING {
        return true;
    }
    submission
        .duration_seconds
        .is_some_and(|d| d < SUSPECT_FAST_DURATION_SECS)
        && submission.points > SUSPECT_FAST_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ScoreSubmission {
        ScoreSubmission {
            nickname: "player".into(),
            points: 100,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_submission() {
        assert_eq!(validate(&base()), Ok(()));
    }

    #[test]
    fn rejects_whitespace_nickname() {
        let mut s = base();
        s.nickname = "   ".into();
        assert_eq!(validate(&s), Err(RejectReason::EmptyNickname));
    }

    #[test]
    fn rejects_long_nickname() {
        let mut s = base();
        s.nickname = "x".repeat(17);
        assert_eq!(validate(&s), Err(RejectReason::NicknameTooLong));
    }

    #[test]
    fn sixteen_chars_is_fine() {
        let mut s = base();
        s.nickname = "x".repeat(16);
        assert_eq!(validate(&s), Ok(()));
    }

    #[test]
    fn rejects_negative_fields() {
        let mut s = base();
        s.points = -1;
        assert_eq!(validate(&s), Err(RejectReason::InvalidPoints));

        let mut s = base();
        s.lines = Some(-1);
        assert_eq!(validate(&s), Err(RejectReason::InvalidLines));

        let mut s = base();
        s.level_reached = Some(-3);
        assert_eq!(validate(&s), Err(RejectReason::InvalidLevel));

        let mut s = base();
        s.duration_seconds = Some(-10);
        assert_eq!(validate(&s), Err(RejectReason::InvalidDuration));
    }

    #[test]
    fn zero_valued_optionals_pass() {
        let mut s = base();
        s.lines = Some(0);
        s.level_reached = Some(0);
        s.duration_seconds = Some(0);
        assert_eq!(validate(&s), Ok(()));
    }

    #[test]
    fn rejects_tag_violations() {
        let mut s = base();
        s.tags = Some(vec!["a".into(); 6]);
        assert_eq!(validate(&s), Err(RejectReason::TooManyTags));

        let mut s = base();
        s.tags = Some(vec!["fine".into(), "y".repeat(25)]);
        assert_eq!(validate(&s), Err(RejectReason::TagTooLong));

        let mut s = base();
        s.tags = Some(vec!["z".repeat(24); 5]);
        assert_eq!(validate(&s), Ok(()));
    }

    #[test]
    fn rejects_oversized_client_ua() {
        use crate::core::record::ClientInfo;

        let mut s = base();
        s.client = Some(ClientInfo {
            version: None,
            platform: None,
            ua: Some("u".repeat(CLIENT_UA_MAX_LEN + 1)),
        });
        assert_eq!(validate(&s), Err(RejectReason::ClientUaTooLong));

        // Exactly at the limit is fine, as is a client with no ua
        s.client = Some(ClientInfo {
            version: Some("1.0".into()),
            platform: None,
            ua: Some("u".repeat(CLIENT_UA_MAX_LEN)),
        });
        assert_eq!(validate(&s), Ok(()));

        s.client = Some(ClientInfo {
            version: Some("1.0".into()),
            platform: None,
            ua: None,
        });
        assert_eq!(validate(&s), Ok(()));
    }

    #[test]
    fn first_failure_wins() {
        // Empty nickname and negative points: nickname check comes first
        let s = ScoreSubmission {
            nickname: "".into(),
            points: -5,
            ..Default::default()
        };
        assert_eq!(validate(&s), Err(RejectReason::EmptyNickname));
    }

    #[test]
    fn reason_codes_serialize_to_stable_spellings() {
        let json = serde_json::to_string(&RejectReason::EmptyNickname).unwrap();
        assert_eq!(json, "\"EMPTY_NICKNAME\"");
        let json = serde_json::to_string(&RejectReason::NicknameTooLong).unwrap();
        assert_eq!(json, "\"NICKNAME_TOO_LONG\"");
        assert_eq!(RejectReason::TagTooLong.to_string(), "TAG_TOO_LONG");
    }

    #[test]
    fn suspect_heuristics() {
        let mut s = base();
        assert!(!is_suspect(&s));

        s.points = 1_000_000;
        assert!(is_suspect(&s));

        let mut fast = base();
        fast.points = 20_000;
        fast.duration_seconds = Some(5);
        assert!(is_suspect(&fast));

        // High score over a plausible duration is not suspect
        fast.duration_seconds = Some(600);
        assert!(!is_suspect(&fast));
    }
}
