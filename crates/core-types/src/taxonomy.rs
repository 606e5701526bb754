//! Closed set of user actions the tracker records.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Grouping of event kinds by the surface that emits them.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EventFamily {
    Navigation,
    Content,
    Social,
    Economic,
    Monetization,
    Discovery,
    Session,
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum EventType {
    PageView,
    PostView,
    PostLike,
    PostShare,
    PostComment,
    PostCreate,
    ProfileView,
    Follow,
    Unfollow,
    WalletView,
    TaskComplete,
    RewardClaim,
    AdImpression,
    AdClick,
    Search,
    SessionStart,
    SessionEnd,
}

impl EventType {
    pub const ALL: [EventType; 17] = [
        EventType::PageView,
        EventType::PostView,
        EventType::PostLike,
        EventType::PostShare,
        EventType::PostComment,
        EventType::PostCreate,
        EventType::ProfileView,
        EventType::Follow,
        EventType::Unfollow,
        EventType::WalletView,
        EventType::TaskComplete,
        EventType::RewardClaim,
        EventType::AdImpression,
        EventType::AdClick,
        EventType::Search,
        EventType::SessionStart,
        EventType::SessionEnd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::PostView => "post_view",
            EventType::PostLike => "post_like",
            EventType::PostShare => "post_share",
            EventType::PostComment => "post_comment",
            EventType::PostCreate => "post_create",
            EventType::ProfileView => "profile_view",
            EventType::Follow => "follow",
            EventType::Unfollow => "unfollow",
            EventType::WalletView => "wallet_view",
            EventType::TaskComplete => "task_complete",
            EventType::RewardClaim => "reward_claim",
            EventType::AdImpression => "ad_impression",
            EventType::AdClick => "ad_click",
            EventType::Search => "search",
            EventType::SessionStart => "session_start",
            EventType::SessionEnd => "session_end",
        }
    }

    pub fn family(self) -> EventFamily {
        match self {
            EventType::PageView => EventFamily::Navigation,
            EventType::PostView
            | EventType::PostLike
            | EventType::PostShare
            | EventType::PostComment
            | EventType::PostCreate => EventFamily::Content,
            EventType::ProfileView | EventType::Follow | EventType::Unfollow => {
                EventFamily::Social
            }
            EventType::WalletView | EventType::TaskComplete | EventType::RewardClaim => {
                EventFamily::Economic
            }
            EventType::AdImpression | EventType::AdClick => EventFamily::Monetization,
            EventType::Search => EventFamily::Discovery,
            EventType::SessionStart | EventType::SessionEnd => EventFamily::Session,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownEventType(value.to_string()))
    }
}

/// Interactions a post card can report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PostAction {
    View,
    Like,
    Share,
    Comment,
    Create,
}

impl PostAction {
    pub fn event_type(self) -> EventType {
        match self {
            PostAction::View => EventType::PostView,
            PostAction::Like => EventType::PostLike,
            PostAction::Share => EventType::PostShare,
            PostAction::Comment => EventType::PostComment,
            PostAction::Create => EventType::PostCreate,
        }
    }
}

/// Interactions a sponsored card can report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdAction {
    Impression,
    Click,
}

impl AdAction {
    pub fn event_type(self) -> EventType {
        match self {
            AdAction::Impression => EventType::AdImpression,
            AdAction::Click => EventType::AdClick,
        }
    }
}
