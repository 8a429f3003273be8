use async_trait::async_trait;

use crate::models::*;
use crate::tags::Tag;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn insert_complaint(&self, new: NewComplaint) -> StoreResult<Complaint>;
    async fn get_complaint(&self, id: &str) -> StoreResult<Complaint>;
    /// Newest first, optionally narrowed to one tag.
    async fn list_by_owner(&self, owner_id: &str, tag: Option<Tag>) -> StoreResult<Vec<Complaint>>;
    /// Conjunctive filters; `None` fields do not constrain.
    async fn list_filtered(&self, filter: ComplaintFilter) -> StoreResult<Vec<Complaint>>;
    async fn delete_complaint(&self, id: &str) -> StoreResult<()>;
    async fn set_status(&self, id: &str, status: Status) -> StoreResult<Complaint>;
    async fn set_assignee(&self, id: &str, assignee: &str) -> StoreResult<Complaint>;
    async fn set_image_url(&self, id: &str, url: Option<&str>) -> StoreResult<Complaint>;
    /// Single store-side operation; two concurrent calls both land.
    async fn increment_upvotes(&self, id: &str) -> StoreResult<Complaint>;
    /// Single store-side append to the ordered moderation log.
    async fn append_comment(&self, id: &str, comment: AdminComment) -> StoreResult<Complaint>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn insert_profile(&self, profile: Profile) -> StoreResult<Profile>;
    async fn get_profile(&self, id: &str) -> StoreResult<Profile>;
    /// Display name is the only mutable field; the profile must pre-exist.
    async fn update_display_name(&self, id: &str, name: &str) -> StoreResult<Profile>;
    async fn list_profiles(&self) -> StoreResult<Vec<Profile>>;
}

pub trait RecordStore: ComplaintStore + ProfileStore {}

impl<T> RecordStore for T where T: ComplaintStore + ProfileStore {}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    #[derive(Default)]
    struct State {
        complaints: HashMap<Id, Complaint>,
        profiles: HashMap<String, Profile>,
    }

    /// Test/dev backend. Mutations take one write lock per operation, so the
    /// increment and append paths are atomic here as well.
    #[derive(Clone, Default)]
    pub struct InMemStore {
        state: Arc<RwLock<State>>,
    }

    impl InMemStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ComplaintStore for InMemStore {
        async fn insert_complaint(&self, new: NewComplaint) -> StoreResult<Complaint> {
            let mut s = self.state.write().unwrap();
            let complaint = Complaint {
                id: uuid::Uuid::new_v4().to_string(),
                owner_id: new.owner_id,
                title: new.title,
                description: new.description,
                status: Status::Pending,
                tags: new.tags,
                image_url: new.image_url,
                upvotes: 0,
                admin_comments: Vec::new(),
                assigned_to: None,
                created_at: chrono::Utc::now(),
            };
            s.complaints.insert(complaint.id.clone(), complaint.clone());
            Ok(complaint)
        }

        async fn get_complaint(&self, id: &str) -> StoreResult<Complaint> {
            let s = self.state.read().unwrap();
            s.complaints.get(id).cloned().ok_or(StoreError::NotFound)
        }

        async fn list_by_owner(
            &self,
            owner_id: &str,
            tag: Option<Tag>,
        ) -> StoreResult<Vec<Complaint>> {
            let s = self.state.read().unwrap();
            let mut v: Vec<_> = s
                .complaints
                .values()
                .filter(|c| c.owner_id == owner_id)
                .filter(|c| tag.map_or(true, |t| c.tags.contains(&t)))
                .cloned()
                .collect();
            v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(v)
        }

        async fn list_filtered(&self, filter: ComplaintFilter) -> StoreResult<Vec<Complaint>> {
            let s = self.state.read().unwrap();
            let mut v: Vec<_> = s
                .complaints
                .values()
                .filter(|c| filter.status.map_or(true, |st| c.status == st))
                .filter(|c| filter.owner_id.as_deref().map_or(true, |o| c.owner_id == o))
                .filter(|c| filter.since.map_or(true, |t| c.created_at >= t))
                .filter(|c| filter.tag.map_or(true, |t| c.tags.contains(&t)))
                .cloned()
                .collect();
            v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(v)
        }

        async fn delete_complaint(&self, id: &str) -> StoreResult<()> {
            let mut s = self.state.write().unwrap();
            s.complaints.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
        }

        async fn set_status(&self, id: &str, status: Status) -> StoreResult<Complaint> {
            let mut s = self.state.write().unwrap();
            let c = s.complaints.get_mut(id).ok_or(StoreError::NotFound)?;
            c.status = status;
            Ok(c.clone())
        }

        async fn set_assignee(&self, id: &str, assignee: &str) -> StoreResult<Complaint> {
            let mut s = self.state.write().unwrap();
            let c = s.complaints.get_mut(id).ok_or(StoreError::NotFound)?;
            c.assigned_to = Some(assignee.to_string());
            Ok(c.clone())
        }

        async fn set_image_url(&self, id: &str, url: Option<&str>) -> StoreResult<Complaint> {
            let mut s = self.state.write().unwrap();
            let c = s.complaints.get_mut(id).ok_or(StoreError::NotFound)?;
            c.image_url = url.map(str::to_owned);
            Ok(c.clone())
        }

        async fn increment_upvotes(&self, id: &str) -> StoreResult<Complaint> {
            let mut s = self.state.write().unwrap();
            let c = s.complaints.get_mut(id).ok_or(StoreError::NotFound)?;
            c.upvotes += 1;
            Ok(c.clone())
        }

        async fn append_comment(&self, id: &str, comment: AdminComment) -> StoreResult<Complaint> {
            let mut s = self.state.write().unwrap();
            let c = s.complaints.get_mut(id).ok_or(StoreError::NotFound)?;
            c.admin_comments.push(comment);
            Ok(c.clone())
        }
    }

    #[async_trait]
    impl ProfileStore for InMemStore {
        async fn insert_profile(&self, profile: Profile) -> StoreResult<Profile> {
            let mut s = self.state.write().unwrap();
            if s.profiles.contains_key(&profile.id) {
                return Err(StoreError::Conflict);
            }
            s.profiles.insert(profile.id.clone(), profile.clone());
            Ok(profile)
        }

        async fn get_profile(&self, id: &str) -> StoreResult<Profile> {
            let s = self.state.read().unwrap();
            s.profiles.get(id).cloned().ok_or(StoreError::NotFound)
        }

        async fn update_display_name(&self, id: &str, name: &str) -> StoreResult<Profile> {
            let mut s = self.state.write().unwrap();
            let p = s.profiles.get_mut(id).ok_or(StoreError::NotFound)?;
            p.display_name = name.to_string();
            Ok(p.clone())
        }

        async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
            let s = self.state.read().unwrap();
            let mut v: Vec<_> = s.profiles.values().cloned().collect();
            v.sort_by(|a, b| a.email.cmp(&b.email));
            Ok(v)
        }
    }
}

// Remote store (feature = "rest-store"): the BaaS row API. Complaint and
// profile rows live in /rest/v1/complaints and /rest/v1/profiles; upvote and
// comment-append go through store-side functions so each is one conditional
// update rather than a read-then-write pair.
#[cfg(feature = "rest-store")]
pub mod rest {
    use super::*;
    use reqwest::{Client, RequestBuilder, Response, StatusCode};
    use serde_json::json;

    #[derive(Clone)]
    pub struct RestStore {
        client: Client,
        base_url: String,
        api_key: String,
    }

    impl RestStore {
        pub fn new(base_url: &str, api_key: &str) -> Self {
            Self {
                client: Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }
        }

        fn rows(&self, table: &str) -> String {
            format!("{}/rest/v1/{}", self.base_url, table)
        }

        fn rpc(&self, function: &str) -> String {
            format!("{}/rest/v1/rpc/{}", self.base_url, function)
        }

        fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
            rb.header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key))
        }

        async fn check(resp: Response) -> StoreResult<Response> {
            match resp.status() {
                s if s.is_success() => Ok(resp),
                StatusCode::NOT_FOUND => Err(StoreError::NotFound),
                StatusCode::CONFLICT => Err(StoreError::Conflict),
                s => {
                    let body = resp.text().await.unwrap_or_default();
                    Err(StoreError::Unavailable(format!("store returned {s}: {body}")))
                }
            }
        }

        /// Row endpoints answer with a JSON array even for single-row
        /// operations; an empty array means the filter matched nothing.
        async fn one<T: serde::de::DeserializeOwned>(resp: Response) -> StoreResult<T> {
            let mut rows: Vec<T> = Self::checked_json(resp).await?;
            match rows.len() {
                0 => Err(StoreError::NotFound),
                _ => Ok(rows.remove(0)),
            }
        }

        async fn checked_json<T: serde::de::DeserializeOwned>(resp: Response) -> StoreResult<T> {
            Self::check(resp)
                .await?
                .json::<T>()
                .await
                .map_err(|e| StoreError::Unavailable(format!("malformed store response: {e}")))
        }

        async fn send(rb: RequestBuilder) -> StoreResult<Response> {
            rb.send()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))
        }
    }

    #[async_trait]
    impl ComplaintStore for RestStore {
        async fn insert_complaint(&self, new: NewComplaint) -> StoreResult<Complaint> {
            let row = json!({
                "owner_id": new.owner_id,
                "title": new.title,
                "description": new.description,
                "status": Status::Pending,
                "tags": new.tags,
                "image_url": new.image_url,
                "upvotes": 0,
                "admin_comments": [],
                "assigned_to": null,
            });
            let resp = Self::send(
                self.authed(self.client.post(self.rows("complaints")))
                    .header("Prefer", "return=representation")
                    .json(&row),
            )
            .await?;
            Self::one(resp).await
        }

        async fn get_complaint(&self, id: &str) -> StoreResult<Complaint> {
            let resp = Self::send(
                self.authed(self.client.get(self.rows("complaints")))
                    .query(&[("id", format!("eq.{id}"))]),
            )
            .await?;
            Self::one(resp).await
        }

        async fn list_by_owner(
            &self,
            owner_id: &str,
            tag: Option<Tag>,
        ) -> StoreResult<Vec<Complaint>> {
            let mut params = vec![
                ("owner_id".to_string(), format!("eq.{owner_id}")),
                ("order".to_string(), "created_at.desc".to_string()),
            ];
            if let Some(t) = tag {
                params.push(("tags".to_string(), format!("cs.{{{}}}", t.as_str())));
            }
            let resp = Self::send(
                self.authed(self.client.get(self.rows("complaints"))).query(&params),
            )
            .await?;
            Self::checked_json(resp).await
        }

        async fn list_filtered(&self, filter: ComplaintFilter) -> StoreResult<Vec<Complaint>> {
            let mut params = vec![("order".to_string(), "created_at.desc".to_string())];
            if let Some(st) = filter.status {
                params.push(("status".to_string(), format!("eq.{}", st.as_str())));
            }
            if let Some(owner) = &filter.owner_id {
                params.push(("owner_id".to_string(), format!("eq.{owner}")));
            }
            if let Some(since) = filter.since {
                params.push(("created_at".to_string(), format!("gte.{}", since.to_rfc3339())));
            }
            if let Some(t) = filter.tag {
                params.push(("tags".to_string(), format!("cs.{{{}}}", t.as_str())));
            }
            let resp = Self::send(
                self.authed(self.client.get(self.rows("complaints"))).query(&params),
            )
            .await?;
            Self::checked_json(resp).await
        }

        async fn delete_complaint(&self, id: &str) -> StoreResult<()> {
            let resp = Self::send(
                self.authed(self.client.delete(self.rows("complaints")))
                    .query(&[("id", format!("eq.{id}"))])
                    .header("Prefer", "return=representation"),
            )
            .await?;
            Self::one::<Complaint>(resp).await.map(|_| ())
        }

        async fn set_status(&self, id: &str, status: Status) -> StoreResult<Complaint> {
            self.patch_complaint(id, json!({ "status": status })).await
        }

        async fn set_assignee(&self, id: &str, assignee: &str) -> StoreResult<Complaint> {
            self.patch_complaint(id, json!({ "assigned_to": assignee })).await
        }

        async fn set_image_url(&self, id: &str, url: Option<&str>) -> StoreResult<Complaint> {
            self.patch_complaint(id, json!({ "image_url": url })).await
        }

        async fn increment_upvotes(&self, id: &str) -> StoreResult<Complaint> {
            let resp = Self::send(
                self.authed(self.client.post(self.rpc("increment_upvotes")))
                    .json(&json!({ "complaint_id": id })),
            )
            .await?;
            let updated: Option<Complaint> = Self::checked_json(resp).await?;
            updated.ok_or(StoreError::NotFound)
        }

        async fn append_comment(&self, id: &str, comment: AdminComment) -> StoreResult<Complaint> {
            let resp = Self::send(
                self.authed(self.client.post(self.rpc("append_admin_comment")))
                    .json(&json!({ "complaint_id": id, "comment": comment })),
            )
            .await?;
            let updated: Option<Complaint> = Self::checked_json(resp).await?;
            updated.ok_or(StoreError::NotFound)
        }
    }

    impl RestStore {
        async fn patch_complaint(
            &self,
            id: &str,
            body: serde_json::Value,
        ) -> StoreResult<Complaint> {
            let resp = Self::send(
                self.authed(self.client.patch(self.rows("complaints")))
                    .query(&[("id", format!("eq.{id}"))])
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;
            Self::one(resp).await
        }
    }

    #[async_trait]
    impl ProfileStore for RestStore {
        async fn insert_profile(&self, profile: Profile) -> StoreResult<Profile> {
            let resp = Self::send(
                self.authed(self.client.post(self.rows("profiles")))
                    .header("Prefer", "return=representation")
                    .json(&profile),
            )
            .await?;
            Self::one(resp).await
        }

        async fn get_profile(&self, id: &str) -> StoreResult<Profile> {
            let resp = Self::send(
                self.authed(self.client.get(self.rows("profiles")))
                    .query(&[("id", format!("eq.{id}"))]),
            )
            .await?;
            Self::one(resp).await
        }

        async fn update_display_name(&self, id: &str, name: &str) -> StoreResult<Profile> {
            let resp = Self::send(
                self.authed(self.client.patch(self.rows("profiles")))
                    .query(&[("id", format!("eq.{id}"))])
                    .header("Prefer", "return=representation")
                    .json(&json!({ "display_name": name })),
            )
            .await?;
            Self::one(resp).await
        }

        async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
            let resp = Self::send(
                self.authed(self.client.get(self.rows("profiles")))
                    .query(&[("order", "email.asc")]),
            )
            .await?;
            Self::checked_json(resp).await
        }
    }
}
