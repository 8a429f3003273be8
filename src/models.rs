use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tags::Tag;

/// Record identifiers are opaque strings minted by the external store.
pub type Id = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Working,
    Finished,
}

impl Status {
    /// Parse a client-supplied status value. Anything outside the closed
    /// enum is rejected, not coerced.
    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "pending" => Some(Status::Pending),
            "working" => Some(Status::Working),
            "finished" => Some(Status::Finished),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Working => "working",
            Status::Finished => "finished",
        }
    }
}

/// One entry in a complaint's append-only moderation log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminComment {
    pub text: String,
    pub at: DateTime<Utc>,
    pub admin_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Complaint {
    pub id: Id,
    /// Always the authenticated subject at creation time; client-supplied
    /// ownership is never trusted.
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub tags: Vec<Tag>,
    pub image_url: Option<String>,
    pub upvotes: u32,
    pub admin_comments: Vec<AdminComment>,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Store-level insert payload. `owner_id` is filled in by the handler from
/// the verified token, never from the request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewComplaint {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub image_url: Option<String>,
}

/// Conjunctive filter set for the admin listing. `None` fields do not
/// constrain the result.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<Status>,
    pub owner_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub tag: Option<Tag>,
}

/// Local projection over the external identity store: display name plus the
/// admin marker used at token issuance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub admin: bool,
}

/// Principal as returned by the identity provider. The admin flag lives on
/// the profile projection, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}
