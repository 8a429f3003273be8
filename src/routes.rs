use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{create_jwt, Auth};
use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::image::{process_upload, MAX_UPLOAD_BYTES};
use crate::models::*;
use crate::rate_limit::RateLimiterFacade;
use crate::require_admin;
use crate::storage::ObjectStore;
use crate::store::RecordStore;
use crate::tags::{self, Tag, VOCABULARY};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/signup").route(web::post().to(signup)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/admin/login").route(web::post().to(admin_login)))
        .service(web::resource("/complaints").route(web::get().to(list_own_complaints)))
        .service(web::resource("/submit").route(web::post().to(submit_complaint)))
        .service(web::resource("/complaints/{id}").route(web::delete().to(delete_own_complaint)))
        .service(
            web::resource("/complaints/{id}/image")
                .route(web::delete().to(delete_complaint_image)),
        )
        .service(web::resource("/complaints/{id}/upvote").route(web::post().to(upvote_complaint)))
        .service(web::resource("/tags").route(web::get().to(list_tags)))
        .service(web::resource("/profile").route(web::get().to(get_profile)))
        .service(web::resource("/profile/update").route(web::post().to(update_profile)))
        .service(web::resource("/admin/complaints").route(web::get().to(admin_list_complaints)))
        .service(
            web::resource("/admin/complaints/{id}")
                .route(web::get().to(admin_get_complaint))
                .route(web::delete().to(admin_delete_complaint)),
        )
        .service(
            web::resource("/admin/complaints/{id}/status").route(web::put().to(admin_set_status)),
        )
        .service(
            web::resource("/admin/complaints/{id}/assign").route(web::put().to(admin_assign)),
        )
        .service(
            web::resource("/admin/complaints/{id}/comment").route(web::post().to(admin_comment)),
        )
        .service(web::resource("/admin/users").route(web::get().to(admin_list_users)))
        .service(web::resource("/admin/statistics").route(web::get().to(admin_statistics)))
        .service(web::resource("/admin/profile").route(web::get().to(admin_profile)))
        .route("/healthz", web::get().to(healthz));
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub objects: Arc<dyn ObjectStore>,
    pub rate_limiter: Option<RateLimiterFacade>,
}

// ---------------- auth & profile -----------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub profile: Profile,
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Identity and profile created", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    data: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::InvalidInput("a valid email is required".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::InvalidInput("password must be at least 8 characters".into()));
    }
    let display_name = req.display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::InvalidInput("display_name must not be empty".into()));
    }

    let identity = data.identity.signup(&req.email, &req.password).await?;
    // Admin provenance: the flag is set on the profile projection, here at
    // creation (bootstrap list) or store-side by an operator, and read back
    // at every token issuance.
    let bootstrap = std::env::var("BOOTSTRAP_ADMIN_EMAILS").unwrap_or_default();
    let is_bootstrap_admin = bootstrap
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .any(|s| s.trim().eq_ignore_ascii_case(&req.email));
    let profile = data
        .store
        .insert_profile(Profile {
            id: identity.id,
            email: identity.email,
            display_name: display_name.to_string(),
            admin: is_bootstrap_admin,
        })
        .await?;
    let token = issue_for(&profile)?;
    Ok(HttpResponse::Created().json(AuthResponse { token, profile }))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 403, description = "Invalid credentials")
    )
)]
pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    let identity = data.identity.login(&req.email, &req.password).await?;
    // The admin flag comes from the profile projection here and everywhere
    // else a token is minted.
    let profile = data.store.get_profile(&identity.id).await?;
    let token = issue_for(&profile)?;
    Ok(HttpResponse::Ok().json(AuthResponse { token, profile }))
}

#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin token issued", body = AuthResponse),
        (status = 403, description = "Invalid credentials or not an administrator")
    )
)]
pub async fn admin_login(
    data: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    let identity = data.identity.login(&req.email, &req.password).await?;
    let profile = data.store.get_profile(&identity.id).await?;
    if !profile.admin {
        return Err(ApiError::Forbidden);
    }
    let token = issue_for(&profile)?;
    Ok(HttpResponse::Ok().json(AuthResponse { token, profile }))
}

fn issue_for(profile: &Profile) -> Result<String, ApiError> {
    create_jwt(&profile.id, &profile.email, &profile.display_name, profile.admin).map_err(|e| {
        log::error!("token issuance failed: {e}");
        ApiError::Dependency
    })
}

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Own profile", body = Profile),
        (status = 404, description = "Profile missing")
    )
)]
pub async fn get_profile(auth: Auth, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let profile = data.store.get_profile(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub display_name: String,
}

#[utoipa::path(
    post,
    path = "/profile/update",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 404, description = "Profile missing")
    )
)]
pub async fn update_profile(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = payload.display_name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput("display_name must not be empty".into()));
    }
    // The profile must pre-exist (created during signup).
    let profile = data.store.update_display_name(&auth.0.sub, name).await?;
    Ok(HttpResponse::Ok().json(profile))
}

// ---------------- user complaint operations ------------------------

#[derive(Debug, Deserialize)]
pub struct TagFilterQuery {
    pub tag: Option<String>,
}

#[utoipa::path(
    get,
    path = "/complaints",
    params(("tag" = Option<String>, Query, description = "Narrow to one tag; unknown tags apply no filter")),
    responses((status = 200, description = "Own complaints, newest first", body = [Complaint]))
)]
pub async fn list_own_complaints(
    auth: Auth,
    data: web::Data<AppState>,
    query: web::Query<TagFilterQuery>,
) -> Result<HttpResponse, ApiError> {
    // An unrecognized tag value means "no filter", not an error.
    let tag = query.tag.as_deref().and_then(Tag::parse);
    let complaints = data.store.list_by_owner(&auth.0.sub, tag).await?;
    Ok(HttpResponse::Ok().json(complaints))
}

#[utoipa::path(
    post,
    path = "/submit",
    responses(
        (status = 201, description = "Complaint created", body = Complaint),
        (status = 400, description = "Missing or malformed fields"),
        (status = 413, description = "Image too large"),
        (status = 415, description = "Attached file is not an image"),
        (status = 422, description = "Image could not be decoded")
    )
)]
pub async fn submit_complaint(
    auth: Auth,
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    if let Some(rl) = &data.rate_limiter {
        if !rl.allow_submit(&auth.0.sub) {
            return Err(ApiError::RateLimited);
        }
    }

    let form = SubmitForm::read(payload).await?;
    let title = form.title.as_deref().map(str::trim).unwrap_or_default();
    let description = form.description.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::InvalidInput("title must not be empty".into()));
    }
    if description.is_empty() {
        return Err(ApiError::InvalidInput("description must not be empty".into()));
    }
    let complaint_tags = match &form.tags {
        Some(raw) => tags::validate(&serde_json::Value::String(raw.clone()))
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?,
        None => Vec::new(),
    };

    let image_url = match &form.image {
        Some(bytes) => {
            if let Some(rl) = &data.rate_limiter {
                if !rl.allow_image(&auth.0.sub) {
                    return Err(ApiError::RateLimited);
                }
            }
            Some(process_upload(data.objects.as_ref(), bytes).await?)
        }
        None => None,
    };

    let new = NewComplaint {
        owner_id: auth.0.sub.clone(),
        title: title.to_string(),
        description: description.to_string(),
        tags: complaint_tags,
        image_url: image_url.clone(),
    };
    let complaint = match data.store.insert_complaint(new).await {
        Ok(c) => c,
        Err(e) => {
            // Storage already succeeded; nothing rolls it back. Leave a trail
            // for manual reconciliation of the orphaned object.
            if let Some(url) = &image_url {
                log::warn!("complaint insert failed, orphaned image object at {url}");
            }
            return Err(e.into());
        }
    };
    Ok(HttpResponse::Created().json(complaint))
}

/// Accumulated multipart fields for `/submit`: at most one image file plus
/// text fields. Field sizes are enforced while streaming.
struct SubmitForm {
    title: Option<String>,
    description: Option<String>,
    tags: Option<String>,
    image: Option<Vec<u8>>,
}

const TEXT_FIELD_LIMIT: usize = 64 * 1024;

impl SubmitForm {
    async fn read(mut payload: Multipart) -> Result<Self, ApiError> {
        let mut form =
            SubmitForm { title: None, description: None, tags: None, image: None };
        while let Some(field) = payload.try_next().await.map_err(|e| {
            log::error!("multipart error: {e}");
            ApiError::InvalidInput("malformed multipart payload".into())
        })? {
            let Some(name) = field.content_disposition().get_name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                "title" => form.title = Some(Self::text(field).await?),
                "description" => form.description = Some(Self::text(field).await?),
                "tags" => form.tags = Some(Self::text(field).await?),
                "image" => {
                    if form.image.is_some() {
                        return Err(ApiError::InvalidInput(
                            "at most one image per submission".into(),
                        ));
                    }
                    form.image = Some(Self::file(field).await?);
                }
                _ => continue,
            }
        }
        Ok(form)
    }

    async fn text(mut field: actix_multipart::Field) -> Result<String, ApiError> {
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            log::error!("multipart read error: {e}");
            ApiError::InvalidInput("malformed multipart payload".into())
        })? {
            if bytes.len() + chunk.len() > TEXT_FIELD_LIMIT {
                return Err(ApiError::InvalidInput("text field too large".into()));
            }
            bytes.extend_from_slice(&chunk);
        }
        String::from_utf8(bytes)
            .map_err(|_| ApiError::InvalidInput("text field must be UTF-8".into()))
    }

    async fn file(mut field: actix_multipart::Field) -> Result<Vec<u8>, ApiError> {
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            log::error!("multipart read error: {e}");
            ApiError::InvalidInput("malformed multipart payload".into())
        })? {
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(ApiError::PayloadTooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[utoipa::path(
    delete,
    path = "/complaints/{id}",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such complaint owned by the caller")
    )
)]
pub async fn delete_own_complaint(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let complaint = data.store.get_complaint(&id).await?;
    // Ownership mismatch is indistinguishable from absence.
    if complaint.owner_id != auth.0.sub {
        return Err(ApiError::NotFound);
    }
    data.store.delete_complaint(&id).await?;
    remove_stored_image(data.objects.as_ref(), complaint.image_url.as_deref()).await;
    Ok(HttpResponse::NoContent().finish())
}

/// Best-effort object cleanup after a record-side delete. Failure leaves an
/// orphaned object, which is logged for manual reconciliation.
async fn remove_stored_image(objects: &dyn ObjectStore, image_url: Option<&str>) {
    let Some(url) = image_url else { return };
    match objects.name_from_url(url) {
        Some(name) => {
            if let Err(e) = objects.delete(&name).await {
                log::warn!("orphaned image object at {url}: {e}");
            }
        }
        None => log::warn!("persisted image URL {url} does not match the object store"),
    }
}

#[utoipa::path(
    delete,
    path = "/complaints/{id}/image",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Image removed", body = Complaint),
        (status = 404, description = "No such complaint, or no image attached")
    )
)]
pub async fn delete_complaint_image(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let complaint = data.store.get_complaint(&id).await?;
    if complaint.owner_id != auth.0.sub {
        return Err(ApiError::NotFound);
    }
    let Some(url) = complaint.image_url.as_deref() else {
        return Err(ApiError::NotFound);
    };

    // Object delete and URL clear are not transactional; each partial failure
    // leaves a recoverable state and a log line.
    if let Some(name) = data.objects.name_from_url(url) {
        if let Err(e) = data.objects.delete(&name).await {
            log::error!("image object delete failed for {url}: {e}");
            return Err(ApiError::Dependency);
        }
    } else {
        log::warn!("persisted image URL {url} does not match the object store");
    }
    let updated = match data.store.set_image_url(&id, None).await {
        Ok(c) => c,
        Err(e) => {
            log::warn!("image object deleted but URL clear failed for complaint {id}");
            return Err(e.into());
        }
    };
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    post,
    path = "/complaints/{id}/upvote",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Counter incremented", body = Complaint),
        (status = 404, description = "No such complaint")
    )
)]
pub async fn upvote_complaint(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    if let Some(rl) = &data.rate_limiter {
        if !rl.allow_upvote(&auth.0.sub) {
            return Err(ApiError::RateLimited);
        }
    }
    // One store-side operation; concurrent upvotes all land.
    let updated = data.store.increment_upvotes(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    get,
    path = "/tags",
    responses((status = 200, description = "Valid tag vocabulary", body = [Tag]))
)]
pub async fn list_tags(_auth: Auth) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(VOCABULARY))
}

// ---------------- admin operations ---------------------------------

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub status: Option<String>,
    pub owner: Option<String>,
    pub since: Option<String>,
    pub tag: Option<String>,
}

#[utoipa::path(
    get,
    path = "/admin/complaints",
    params(
        ("status" = Option<String>, Query, description = "pending | working | finished"),
        ("owner" = Option<String>, Query, description = "Owner identity id"),
        ("since" = Option<String>, Query, description = "RFC 3339 lower bound on creation time"),
        ("tag" = Option<String>, Query, description = "Narrow to one tag")
    ),
    responses(
        (status = 200, description = "Filtered complaints, newest first", body = [Complaint]),
        (status = 400, description = "Malformed filter value"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn admin_list_complaints(
    auth: Auth,
    data: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let q = query.into_inner();
    let status = match q.status.as_deref() {
        Some(s) => Some(
            Status::parse(s)
                .ok_or_else(|| ApiError::InvalidInput(format!("unknown status '{s}'")))?,
        ),
        None => None,
    };
    let since = match q.since.as_deref() {
        Some(s) => Some(
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| ApiError::InvalidInput("since must be an RFC 3339 timestamp".into()))?,
        ),
        None => None,
    };
    let filter = ComplaintFilter {
        status,
        owner_id: q.owner,
        since,
        tag: q.tag.as_deref().and_then(Tag::parse),
    };
    let complaints = data.store.list_filtered(filter).await?;
    Ok(HttpResponse::Ok().json(complaints))
}

pub async fn admin_get_complaint(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let complaint = data.store.get_complaint(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: String,
}

#[utoipa::path(
    put,
    path = "/admin/complaints/{id}/status",
    request_body = SetStatusRequest,
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Status updated", body = Complaint),
        (status = 400, description = "Status outside the closed enum"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "No such complaint")
    )
)]
pub async fn admin_set_status(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<SetStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let status = Status::parse(&payload.status).ok_or_else(|| {
        ApiError::InvalidInput("status must be one of pending, working, finished".into())
    })?;
    let updated = data.store.set_status(&path.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequest {
    pub assignee: String,
}

#[utoipa::path(
    put,
    path = "/admin/complaints/{id}/assign",
    request_body = AssignRequest,
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Assignee set", body = Complaint),
        (status = 403, description = "Admins only"),
        (status = 404, description = "No such complaint")
    )
)]
pub async fn admin_assign(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<AssignRequest>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let assignee = payload.assignee.trim();
    if assignee.is_empty() {
        return Err(ApiError::InvalidInput("assignee must not be empty".into()));
    }
    // No roster check: any identifier is accepted.
    let updated = data.store.set_assignee(&path.into_inner(), assignee).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub text: String,
}

#[utoipa::path(
    post,
    path = "/admin/complaints/{id}/comment",
    request_body = CommentRequest,
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Comment appended", body = Complaint),
        (status = 400, description = "Empty comment"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "No such complaint")
    )
)]
pub async fn admin_comment(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::InvalidInput("comment text must not be empty".into()));
    }
    let comment = AdminComment {
        text: text.to_string(),
        at: Utc::now(),
        admin_id: auth.0.sub.clone(),
    };
    // One store-side append; concurrent comments interleave without loss.
    let updated = data.store.append_comment(&path.into_inner(), comment).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/complaints/{id}",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "No such complaint")
    )
)]
pub async fn admin_delete_complaint(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let id = path.into_inner();
    let complaint = data.store.get_complaint(&id).await?;
    data.store.delete_complaint(&id).await?;
    remove_stored_image(data.objects.as_ref(), complaint.image_url.as_deref()).await;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn admin_list_users(
    auth: Auth,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let profiles = data.store.list_profiles().await?;
    Ok(HttpResponse::Ok().json(profiles))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsResponse {
    pub total: usize,
    pub pending: usize,
    pub working: usize,
    pub finished: usize,
    pub upvotes_total: u64,
    pub with_image: usize,
}

pub async fn admin_statistics(
    auth: Auth,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let complaints = data.store.list_filtered(ComplaintFilter::default()).await?;
    let stats = StatisticsResponse {
        total: complaints.len(),
        pending: complaints.iter().filter(|c| c.status == Status::Pending).count(),
        working: complaints.iter().filter(|c| c.status == Status::Working).count(),
        finished: complaints.iter().filter(|c| c.status == Status::Finished).count(),
        upvotes_total: complaints.iter().map(|c| u64::from(c.upvotes)).sum(),
        with_image: complaints.iter().filter(|c| c.image_url.is_some()).count(),
    };
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn admin_profile(
    auth: Auth,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin!(auth);
    let profile = data.store.get_profile(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
