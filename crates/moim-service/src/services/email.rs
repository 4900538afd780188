//! Email verification service
//!
//! Issues six-digit codes with a short TTL and checks them. Delivery goes
//! through the `EmailSender` trait so environments without an SMTP relay can
//! log the code instead.

use async_trait::async_trait;
use moim_cache::{RateWindow, VerificationOutcome};
use tracing::{info, instrument, warn};

use crate::dto::{SendVerificationRequest, VerificationSentResponse, VerifyEmailRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Code lifetime reported to clients, in seconds
const CODE_EXPIRES_IN: u64 = 5 * 60;

/// Outbound email delivery
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a verification code to an address
    async fn send_verification_code(&self, email: &str, code: &str) -> ServiceResult<()>;
}

/// Development sender that logs the code instead of delivering it
#[derive(Debug, Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_verification_code(&self, email: &str, code: &str) -> ServiceResult<()> {
        info!(email = %email, code = %code, "Verification code (log sender)");
        Ok(())
    }
}

/// Email verification service
pub struct EmailService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EmailService<'a> {
    /// Create a new EmailService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue and send a verification code
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn send_verification(
        &self,
        request: SendVerificationRequest,
    ) -> ServiceResult<VerificationSentResponse> {
        let window = RateWindow::email(self.ctx.rate_limit_config().email_per_hour);
        let decision = self.ctx.rate_limiter().hit(&window, &request.email).await?;
        if !decision.is_allowed() {
            warn!(email = %request.email, "Verification email rate limited");
            return Err(ServiceError::App(
                moim_common::AppError::RateLimitExceeded,
            ));
        }

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::Domain(
                moim_core::DomainError::EmailAlreadyExists,
            ));
        }

        let code = self.ctx.verification_store().issue(&request.email).await?;
        self.ctx
            .email_sender()
            .send_verification_code(&request.email, &code)
            .await?;

        info!(email = %request.email, "Verification code sent");

        Ok(VerificationSentResponse {
            email: request.email,
            expires_in: CODE_EXPIRES_IN,
        })
    }

    /// Check a submitted code; a match flags the address verified
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn verify_email(&self, request: VerifyEmailRequest) -> ServiceResult<()> {
        let outcome = self
            .ctx
            .verification_store()
            .check(&request.email, &request.code)
            .await?;

        match outcome {
            VerificationOutcome::Verified => {
                info!(email = %request.email, "Email verified");
                Ok(())
            }
            VerificationOutcome::Invalid => {
                warn!(email = %request.email, "Invalid verification code");
                Err(ServiceError::validation("Invalid or expired code"))
            }
        }
    }
}
