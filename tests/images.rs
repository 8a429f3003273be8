#![cfg(feature = "inmem-store")]

use actix_web::{test, App};
use gripe::image::MAX_UPLOAD_BYTES;
use image::GenericImageView;
use gripe::route_config;
use serial_test::serial;

mod common;
use common::{backend, bearer, png_bytes, user_token, MultipartBuilder};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(route_config),
        )
        .await
    };
}

macro_rules! submit_with_image {
    ($app:expr, $token:expr, $image:expr) => {{
        let (ct, body) = MultipartBuilder::new()
            .text("title", "graffiti")
            .text("description", "east wall")
            .file("image", "evidence.png", $image)
            .build();
        let req = test::TestRequest::post()
            .uri("/submit")
            .insert_header(bearer($token))
            .insert_header(("Content-Type", ct))
            .set_payload(body)
            .to_request();
        test::call_service($app, req).await
    }};
}

#[actix_web::test]
#[serial]
async fn image_is_normalized_and_stored_under_uuid_name() {
    let (handles, state) = backend();
    let app = init_app!(state);

    let resp = submit_with_image!(&app, &user_token("alice"), &png_bytes(2400, 1200));
    assert_eq!(resp.status(), 201);
    let complaint: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    let url = complaint["image_url"].as_str().unwrap().to_string();
    assert!(url.ends_with(".jpg"));

    // the stored object is the re-encoded JPEG, fit to the bounding box
    let map = handles.objects.inner.lock().unwrap();
    assert_eq!(map.len(), 1);
    let (bytes, mime) = map.values().next().unwrap();
    assert_eq!(mime, "image/jpeg");
    let stored = image::load_from_memory(bytes).unwrap();
    assert_eq!((stored.width(), stored.height()), (1200, 600));
}

#[actix_web::test]
#[serial]
async fn non_image_upload_is_unsupported_media() {
    let (handles, state) = backend();
    let app = init_app!(state);

    let resp = submit_with_image!(&app, &user_token("alice"), b"just some text bytes");
    assert_eq!(resp.status(), 415);
    assert_eq!(handles.objects.object_count(), 0);
}

#[actix_web::test]
#[serial]
async fn oversized_upload_is_payload_too_large() {
    let (handles, state) = backend();
    let app = init_app!(state);

    let blob = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let resp = submit_with_image!(&app, &user_token("alice"), &blob);
    assert_eq!(resp.status(), 413);
    assert_eq!(handles.objects.object_count(), 0);
}

#[actix_web::test]
#[serial]
async fn corrupt_image_is_unprocessable() {
    let (handles, state) = backend();
    let app = init_app!(state);

    let mut bytes = png_bytes(64, 64);
    bytes.truncate(24); // PNG magic survives, pixel data does not
    let resp = submit_with_image!(&app, &user_token("alice"), &bytes);
    assert_eq!(resp.status(), 422);
    assert_eq!(handles.objects.object_count(), 0);
}

#[actix_web::test]
#[serial]
async fn owner_can_remove_the_image_and_the_object_goes_away() {
    let (handles, state) = backend();
    let app = init_app!(state);

    let resp = submit_with_image!(&app, &user_token("alice"), &png_bytes(800, 600));
    assert_eq!(resp.status(), 201);
    let complaint: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    let id = complaint["id"].as_str().unwrap().to_string();
    assert_eq!(handles.objects.object_count(), 1);

    // a non-owner sees nothing to delete
    let req = test::TestRequest::delete()
        .uri(&format!("/complaints/{id}/image"))
        .insert_header(bearer(&user_token("mallory")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
    assert_eq!(handles.objects.object_count(), 1);

    // the owner clears it; URL nulled, object deleted
    let req = test::TestRequest::delete()
        .uri(&format!("/complaints/{id}/image"))
        .insert_header(bearer(&user_token("alice")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert!(updated["image_url"].is_null());
    assert_eq!(handles.objects.object_count(), 0);

    // removing again finds no image
    let req = test::TestRequest::delete()
        .uri(&format!("/complaints/{id}/image"))
        .insert_header(bearer(&user_token("alice")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
#[serial]
async fn deleting_a_complaint_cleans_up_its_object() {
    let (handles, state) = backend();
    let app = init_app!(state);

    let resp = submit_with_image!(&app, &user_token("alice"), &png_bytes(640, 480));
    assert_eq!(resp.status(), 201);
    let complaint: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    let id = complaint["id"].as_str().unwrap().to_string();
    assert_eq!(handles.objects.object_count(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/complaints/{id}"))
        .insert_header(bearer(&user_token("alice")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
    assert_eq!(handles.objects.object_count(), 0);
}
