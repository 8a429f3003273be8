use crate::models::{AdminComment, Complaint, NewComplaint, Profile, Status};
use crate::tags::Tag;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::signup,
        crate::routes::login,
        crate::routes::admin_login,
        crate::routes::list_own_complaints,
        crate::routes::submit_complaint,
        crate::routes::delete_own_complaint,
        crate::routes::delete_complaint_image,
        crate::routes::upvote_complaint,
        crate::routes::list_tags,
        crate::routes::get_profile,
        crate::routes::update_profile,
        crate::routes::admin_list_complaints,
        crate::routes::admin_set_status,
        crate::routes::admin_assign,
        crate::routes::admin_comment,
        crate::routes::admin_delete_complaint,
    ),
    components(schemas(
        Complaint, NewComplaint, AdminComment, Profile, Status, Tag,
        crate::routes::SignupRequest, crate::routes::LoginRequest,
        crate::routes::AuthResponse, crate::routes::UpdateProfileRequest,
        crate::routes::SetStatusRequest, crate::routes::AssignRequest,
        crate::routes::CommentRequest, crate::routes::StatisticsResponse
    )),
    tags(
        (name = "complaints", description = "Complaint submission and self-service"),
        (name = "admin", description = "Triage and moderation"),
        (name = "auth", description = "Identity and session tokens"),
    )
)]
pub struct ApiDoc;
