use common::error::ApiError;
use common::model::auth::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest, User,
};

pub async fn current_user() -> Result<User, ApiError> {
    super::get_json("/auth/currentUser", &[]).await
}

pub async fn login(request: &LoginRequest) -> Result<(), ApiError> {
    super::post_empty("/auth/login", request).await
}

pub async fn logout() -> Result<(), ApiError> {
    super::post_empty("/auth/logout", &serde_json::json!({})).await
}

pub async fn register(request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
    super::post_json("/auth/register", request).await
}

pub async fn forgot_password(request: &ForgotPasswordRequest) -> Result<MessageResponse, ApiError> {
    super::post_json("/auth/forgot-password", request).await
}

pub async fn reset_password(request: &ResetPasswordRequest) -> Result<MessageResponse, ApiError> {
    super::post_json("/auth/reset-password", request).await
}

pub async fn verify_email(token: &str) -> Result<MessageResponse, ApiError> {
    super::get_json(&format!("/auth/verify-email/{token}"), &[]).await
}
