//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, register_user, seed_category,
    verification_store, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_signup_with_verified_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register_user(&server).await.unwrap();

    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.user.role, "user");
    assert_eq!(auth.user.joined_type, "normal");
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_signup_requires_verified_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();

    // No verification flow for this address
    let response = server.post("/api/v1/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _auth) = register_user(&server).await.unwrap();

    // Re-verify the same address and try again
    let store = verification_store().unwrap();
    let code = store.issue(&request.email).await.unwrap();
    let verify = serde_json::json!({ "email": request.email, "code": code });
    let response = server
        .post("/api/v1/auth/email/verify-code", &verify)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.post("/api/v1/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_request_verification_code() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();

    let body = serde_json::json!({ "email": request.email });
    let response = server
        .post("/api/v1/auth/email/request-code", &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _auth) = register_user(&server).await.unwrap();

    let login_req = LoginRequest::from_signup(&request);
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.username, request.username);
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _auth) = register_user(&server).await.unwrap();

    let login_req = LoginRequest {
        email: request.email.clone(),
        password: "WrongPass999!".to_string(),
    };
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_unknown_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login_req = LoginRequest {
        email: "nonexistent@example.com".to_string(),
        password: "TestPass123!".to_string(),
    };

    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();

    // Refresh
    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server
        .post("/api/v1/auth/refresh", &refresh_req)
        .await
        .unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(!rotated.access_token.is_empty());
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The old refresh token is spent
    let response = server
        .post("/api/v1/auth/refresh", &refresh_req)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();

    let body = serde_json::json!({ "refresh_token": auth.refresh_token });
    let response = server
        .post_auth("/api/v1/auth/logout", &auth.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_login_sets_token_cookies() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _auth) = register_user(&server).await.unwrap();

    let login_req = LoginRequest::from_signup(&request);
    let url = format!("{}/api/v1/auth/login", server.base_url());
    let response = server
        .client
        .post(&url)
        .json(&login_req)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("access_token=") && c.contains("HttpOnly")));
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("refresh_token=") && c.contains("HttpOnly")));
}

#[tokio::test]
async fn test_access_token_cookie_authenticates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register_user(&server).await.unwrap();

    // No Authorization header, only the cookie
    let url = format!("{}/api/v1/users/me", server.base_url());
    let response = server
        .client
        .get(&url)
        .header("Cookie", format!("access_token={}", auth.access_token))
        .send()
        .await
        .unwrap();
    let user: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.username, request.username);
}

#[tokio::test]
async fn test_refresh_from_cookie() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();

    // Empty body, the token rides in the cookie
    let url = format!("{}/api/v1/auth/refresh", server.base_url());
    let response = server
        .client
        .post(&url)
        .header("Cookie", format!("refresh_token={}", auth.refresh_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));

    let rotated: AuthResponse = {
        let envelope: integration_tests::Envelope<AuthResponse> = response.json().await.unwrap();
        envelope.data
    };
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The rotation spent the cookie's token too
    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server
        .post("/api/v1/auth/refresh", &refresh_req)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_without_token_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // No body, no cookie
    let url = format!("{}/api/v1/auth/refresh", server.base_url());
    let response = server.client.post(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_token_cookies() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();

    // Browser-style logout: tokens come from cookies, no body
    let url = format!("{}/api/v1/auth/logout", server.base_url());
    let response = server
        .client
        .post(&url)
        .header(
            "Cookie",
            format!(
                "access_token={}; refresh_token={}",
                auth.access_token, auth.refresh_token
            ),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("access_token=") && c.contains("Max-Age=0")));
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("refresh_token=") && c.contains("Max-Age=0")));

    // The cookie's refresh token was revoked
    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server
        .post("/api/v1/auth/refresh", &refresh_req)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register_user(&server).await.unwrap();

    let response = server
        .get_auth("/api/v1/users/me", &auth.access_token)
        .await
        .unwrap();
    let user: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.username, request.username);
}

#[tokio::test]
async fn test_get_current_user_unauthorized() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/users/me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_profile() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();

    let body = serde_json::json!({ "location": "Busan" });
    let response = server
        .patch_auth("/api/v1/users/me", &auth.access_token, &body)
        .await
        .unwrap();
    let user: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.location.as_deref(), Some("Busan"));
}

#[tokio::test]
async fn test_change_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register_user(&server).await.unwrap();

    let body = serde_json::json!({
        "current_password": request.password,
        "new_password": "NewTestPass456!",
    });
    let response = server
        .post_auth("/api/v1/users/me/password", &auth.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Old password no longer works
    let login_req = LoginRequest::from_signup(&request);
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();

    // New password does
    let login_req = LoginRequest {
        email: request.email.clone(),
        password: "NewTestPass456!".to_string(),
    };
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_get_public_profile() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register_user(&server).await.unwrap();

    let response = server
        .get(&format!("/api/v1/users/{}", auth.user.id))
        .await
        .unwrap();
    let user: PublicUser = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.username, request.username);
}

// ============================================================================
// Category Tests
// ============================================================================

#[tokio::test]
async fn test_list_categories() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    seed_category().await.unwrap();

    let response = server.get("/api/v1/categories").await.unwrap();
    let categories: Vec<CategoryResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(!categories.is_empty());
}

#[tokio::test]
async fn test_create_category_requires_admin() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();

    let body = serde_json::json!({ "name": "Forbidden Category" });
    let response = server
        .post_auth("/api/v1/categories", &auth.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Gathering Tests
// ============================================================================

#[tokio::test]
async fn test_create_gathering() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(gathering.title, gathering_req.title);
    assert_eq!(gathering.owner_id, auth.user.id);
    assert_eq!(gathering.kind, "study");
    assert_eq!(gathering.status, "recruiting");
    assert_eq!(gathering.current_members, 1);
}

#[tokio::test]
async fn test_get_gathering_detail_as_owner() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let created: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}", created.id),
            &auth.access_token,
        )
        .await
        .unwrap();
    let detail: GatheringDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(detail.id, created.id);
    assert_eq!(detail.my_status, "owner");
    assert_eq!(detail.member_counts.approved, 1);
}

#[tokio::test]
async fn test_list_gatherings() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();

    let response = server
        .get(&format!("/api/v1/gatherings?category_id={category_id}"))
        .await
        .unwrap();
    let page: Paginated<GatheringResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(!page.data.is_empty());
}

#[tokio::test]
async fn test_gathering_statistics() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get(&format!("/api/v1/gatherings/{}/statistics", gathering.id))
        .await
        .unwrap();
    let stats: GatheringStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(stats.gathering_id, gathering.id);
    assert_eq!(stats.current_members, 1);
    assert_eq!(stats.max_members, gathering_req.max_members);
    assert_eq!(stats.remaining_seats, gathering_req.max_members - 1);
    assert!(!stats.is_full);
}

#[tokio::test]
async fn test_update_gathering() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let body = serde_json::json!({ "title": "Renamed Study" });
    let response = server
        .patch_auth(
            &format!("/api/v1/gatherings/{}", gathering.id),
            &auth.access_token,
            &body,
        )
        .await
        .unwrap();
    let updated: GatheringResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(updated.title, "Renamed Study");
}

#[tokio::test]
async fn test_delete_gathering() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/gatherings/{}", gathering.id),
            &auth.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/api/v1/gatherings/{}", gathering.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Member Tests
// ============================================================================

#[tokio::test]
async fn test_join_and_approve_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_member_req, applicant) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &owner.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Applicant requests to join
    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{}/members", gathering.id),
            &applicant.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    let member: MemberResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(member.status, "pending");
    assert_eq!(member.role, "participant");
    assert_eq!(member.user.id, applicant.user.id);

    // Owner sees the pending request
    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/members?status=pending", gathering.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    let pending: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pending.iter().any(|m| m.id == member.id));

    // Owner approves
    let response = server
        .post_auth(
            &format!(
                "/api/v1/gatherings/{}/members/{}/approve",
                gathering.id, member.id
            ),
            &owner.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    let approved: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(approved.status, "approved");

    // Applicant now sees themselves as approved
    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/members/me", gathering.id),
            &applicant.access_token,
        )
        .await
        .unwrap();
    let membership: MyMembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(membership.status, "approved");

    // The seat count moved
    let response = server
        .get(&format!("/api/v1/gatherings/{}/statistics", gathering.id))
        .await
        .unwrap();
    let stats: GatheringStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.current_members, 2);
}

#[tokio::test]
async fn test_cancel_join_request() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_member_req, applicant) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &owner.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{}/members", gathering.id),
            &applicant.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{}/members/me/cancel", gathering.id),
            &applicant.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/members/me", gathering.id),
            &applicant.access_token,
        )
        .await
        .unwrap();
    let membership: MyMembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(membership.status, "not_member");
}

#[tokio::test]
async fn test_owner_membership_probe() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/members/me", gathering.id),
            &auth.access_token,
        )
        .await
        .unwrap();
    let membership: MyMembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(membership.status, "owner");
}

// ============================================================================
// Seat Accounting Tests
// ============================================================================

async fn create_gathering_with_capacity(
    server: &TestServer,
    token: &str,
    category_id: &str,
    max_members: i32,
) -> GatheringResponse {
    let mut request = CreateGatheringRequest::study(category_id);
    request.max_members = max_members;
    let response = server
        .post_auth("/api/v1/gatherings", token, &request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn join_as(server: &TestServer, token: &str, gathering_id: &str) -> MemberResponse {
    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{gathering_id}/members"),
            token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn approve_member(
    server: &TestServer,
    owner_token: &str,
    gathering_id: &str,
    member_id: &str,
) -> reqwest::Response {
    server
        .post_auth(
            &format!("/api/v1/gatherings/{gathering_id}/members/{member_id}/approve"),
            owner_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap()
}

async fn seat_stats(server: &TestServer, gathering_id: &str) -> GatheringStatsResponse {
    let response = server
        .get(&format!("/api/v1/gatherings/{gathering_id}/statistics"))
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn gathering_detail(
    server: &TestServer,
    token: &str,
    gathering_id: &str,
) -> GatheringDetailResponse {
    let response = server
        .get_auth(&format!("/api/v1/gatherings/{gathering_id}"), token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

#[tokio::test]
async fn test_concurrent_approvals_respect_capacity() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_a_req, applicant_a) = register_user(&server).await.unwrap();
    let (_b_req, applicant_b) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    // One free seat beyond the leader
    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 2).await;

    let member_a = join_as(&server, &applicant_a.access_token, &gathering.id).await;
    let member_b = join_as(&server, &applicant_b.access_token, &gathering.id).await;

    // Both approvals race for the last seat
    let (first, second) = tokio::join!(
        approve_member(&server, &owner.access_token, &gathering.id, &member_a.id),
        approve_member(&server, &owner.access_token, &gathering.id, &member_b.id),
    );

    let statuses = [first.status(), second.status()];
    let wins = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let losses = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();
    assert_eq!(wins, 1, "exactly one approval may take the last seat");
    assert_eq!(losses, 1, "the other approval must be rejected as full");

    let stats = seat_stats(&server, &gathering.id).await;
    assert_eq!(stats.current_members, 2);
    assert_eq!(i64::from(stats.current_members), stats.member_counts.approved);
    assert!(stats.is_full);
    assert_eq!(stats.remaining_seats, 0);
}

#[tokio::test]
async fn test_approve_beyond_capacity_fails() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_a_req, applicant_a) = register_user(&server).await.unwrap();
    let (_b_req, applicant_b) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 2).await;

    let member_a = join_as(&server, &applicant_a.access_token, &gathering.id).await;
    let member_b = join_as(&server, &applicant_b.access_token, &gathering.id).await;

    let response = approve_member(&server, &owner.access_token, &gathering.id, &member_a.id).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    // The gathering is full; the counter must not move
    let response = approve_member(&server, &owner.access_token, &gathering.id, &member_b.id).await;
    assert_status(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();

    let stats = seat_stats(&server, &gathering.id).await;
    assert_eq!(stats.current_members, 2);
    assert_eq!(i64::from(stats.current_members), stats.member_counts.approved);
}

#[tokio::test]
async fn test_filling_last_seat_completes_recruitment() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_a_req, applicant) = register_user(&server).await.unwrap();
    let (_late_req, latecomer) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 2).await;

    let member = join_as(&server, &applicant.access_token, &gathering.id).await;
    let response = approve_member(&server, &owner.access_token, &gathering.id, &member.id).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let detail = gathering_detail(&server, &owner.access_token, &gathering.id).await;
    assert_eq!(detail.status, "recruitment_complete");

    // No further join requests once recruitment closed
    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{}/members", gathering.id),
            &latecomer.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_member_leave_frees_seat() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_a_req, applicant) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 2).await;

    let member = join_as(&server, &applicant.access_token, &gathering.id).await;
    let response = approve_member(&server, &owner.access_token, &gathering.id, &member.id).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/gatherings/{}/members/me", gathering.id),
            &applicant.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let stats = seat_stats(&server, &gathering.id).await;
    assert_eq!(stats.current_members, 1);
    assert_eq!(i64::from(stats.current_members), stats.member_counts.approved);

    // Leaving reopens recruitment
    let detail = gathering_detail(&server, &owner.access_token, &gathering.id).await;
    assert_eq!(detail.status, "recruiting");
}

#[tokio::test]
async fn test_leader_cannot_leave() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 5).await;

    let response = server
        .delete_auth(
            &format!("/api/v1/gatherings/{}/members/me", gathering.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_leader_cannot_be_removed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 5).await;

    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/members", gathering.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let leader = members.iter().find(|m| m.role == "leader").unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/gatherings/{}/members/{}", gathering.id, leader.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_member_frees_seat() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_a_req, applicant) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 5).await;

    let member = join_as(&server, &applicant.access_token, &gathering.id).await;
    let response = approve_member(&server, &owner.access_token, &gathering.id, &member.id).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/gatherings/{}/members/{}", gathering.id, member.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let stats = seat_stats(&server, &gathering.id).await;
    assert_eq!(stats.current_members, 1);
    assert_eq!(i64::from(stats.current_members), stats.member_counts.approved);

    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/members/me", gathering.id),
            &applicant.access_token,
        )
        .await
        .unwrap();
    let membership: MyMembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(membership.status, "not_member");
}

#[tokio::test]
async fn test_delete_gathering_with_members_fails() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_a_req, applicant) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering =
        create_gathering_with_capacity(&server, &owner.access_token, &category_id, 5).await;

    let member = join_as(&server, &applicant.access_token, &gathering.id).await;
    let response = approve_member(&server, &owner.access_token, &gathering.id, &member.id).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/gatherings/{}", gathering.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();

    // Still there
    let response = server
        .get(&format!("/api/v1/gatherings/{}", gathering.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_send_and_list_messages() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &auth.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let body = serde_json::json!({ "content": "Hello, room!" });
    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{}/messages", gathering.id),
            &auth.access_token,
            &body,
        )
        .await
        .unwrap();
    let message: ChatMessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(message.content, "Hello, room!");
    assert_eq!(message.gathering_id, gathering.id);
    assert_eq!(message.user_id, auth.user.id);

    let response = server
        .get_auth(
            &format!("/api/v1/gatherings/{}/messages", gathering.id),
            &auth.access_token,
        )
        .await
        .unwrap();
    let page: Paginated<ChatMessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(page.data.iter().any(|m| m.id == message.id));
}

#[tokio::test]
async fn test_chat_requires_membership() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_owner_req, owner) = register_user(&server).await.unwrap();
    let (_outsider_req, outsider) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let gathering_req = CreateGatheringRequest::study(&category_id);
    let response = server
        .post_auth("/api/v1/gatherings", &owner.access_token, &gathering_req)
        .await
        .unwrap();
    let gathering: GatheringResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let body = serde_json::json!({ "content": "Let me in" });
    let response = server
        .post_auth(
            &format!("/api/v1/gatherings/{}/messages", gathering.id),
            &outsider.access_token,
            &body,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Question Tests
// ============================================================================

#[tokio::test]
async fn test_create_question() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let question_req = CreateQuestionRequest::unique(&category_id);
    let response = server
        .post_auth("/api/v1/questions", &auth.access_token, &question_req)
        .await
        .unwrap();
    let question: QuestionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(question.title, question_req.title);
    assert_eq!(question.user_id, auth.user.id);
    assert!(!question.is_solved);
}

#[tokio::test]
async fn test_question_detail_counts_views() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let question_req = CreateQuestionRequest::unique(&category_id);
    let response = server
        .post_auth("/api/v1/questions", &auth.access_token, &question_req)
        .await
        .unwrap();
    let created: QuestionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get(&format!("/api/v1/questions/{}", created.id))
        .await
        .unwrap();
    let first: QuestionResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/api/v1/questions/{}", created.id))
        .await
        .unwrap();
    let second: QuestionResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(second.view_count > first.view_count);
}

#[tokio::test]
async fn test_solve_question() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_request, auth) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let question_req = CreateQuestionRequest::unique(&category_id);
    let response = server
        .post_auth("/api/v1/questions", &auth.access_token, &question_req)
        .await
        .unwrap();
    let question: QuestionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/questions/{}/solve", question.id),
            &auth.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    let solved: QuestionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(solved.is_solved);

    let response = server
        .post_auth(
            &format!("/api/v1/questions/{}/unsolve", question.id),
            &auth.access_token,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    let reopened: QuestionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!reopened.is_solved);
}

#[tokio::test]
async fn test_answer_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_asker_req, asker) = register_user(&server).await.unwrap();
    let (_helper_req, helper) = register_user(&server).await.unwrap();
    let category_id = seed_category().await.unwrap();

    let question_req = CreateQuestionRequest::unique(&category_id);
    let response = server
        .post_auth("/api/v1/questions", &asker.access_token, &question_req)
        .await
        .unwrap();
    let question: QuestionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Another user answers
    let body = serde_json::json!({ "content": "Through DATABASE_URL." });
    let response = server
        .post_auth(
            &format!("/api/v1/questions/{}/answers", question.id),
            &helper.access_token,
            &body,
        )
        .await
        .unwrap();
    let answer: AnswerResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(answer.question_id, question.id);
    assert_eq!(answer.user_id, helper.user.id);

    // Anyone can list the answers
    let response = server
        .get(&format!("/api/v1/questions/{}/answers", question.id))
        .await
        .unwrap();
    let answers: Vec<AnswerResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(answers.iter().any(|a| a.id == answer.id));

    // The author can edit their answer
    let body = serde_json::json!({ "content": "Through DATABASE_URL and REDIS_URL." });
    let response = server
        .patch_auth(
            &format!("/api/v1/answers/{}", answer.id),
            &helper.access_token,
            &body,
        )
        .await
        .unwrap();
    let updated: AnswerResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.content, "Through DATABASE_URL and REDIS_URL.");

    // Someone else cannot delete it
    let response = server
        .delete_auth(&format!("/api/v1/answers/{}", answer.id), &asker.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}
