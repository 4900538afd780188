//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, CreateAnswerRequest, CreateCategoryRequest, CreateChatMessageRequest,
    CreateGatheringRequest, CreateQuestionRequest, DeleteAccountRequest, GatheringListQuery,
    KakaoLoginRequest, LoginRequest, LogoutRequest, MessageListQuery, QuestionListQuery,
    RefreshTokenRequest, RegisterRequest, SendVerificationRequest, SolveQuestionRequest,
    UpdateAnswerRequest, UpdateCategoryRequest, UpdateGatheringRequest,
    UpdateGatheringStatusRequest, UpdateQuestionRequest, UpdateUserRequest, VerifyEmailRequest,
};

pub use responses::{
    AnswerResponse, AuthResponse, CategoryResponse, ChatMessageResponse, CurrentUserResponse,
    GatheringDetailResponse, GatheringResponse, GatheringStatsResponse, MemberCountsResponse,
    MemberResponse, MyMembershipResponse, PaginatedResponse, PaginationMeta, PublicUserResponse,
    QuestionDetailResponse, QuestionResponse, VerificationSentResponse,
};
