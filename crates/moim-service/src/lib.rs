//! # moim-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    AnswerResponse, AuthResponse, CategoryResponse, ChangePasswordRequest, ChatMessageResponse,
    CreateAnswerRequest, CreateCategoryRequest, CreateChatMessageRequest, CreateGatheringRequest,
    CreateQuestionRequest, CurrentUserResponse, DeleteAccountRequest, GatheringDetailResponse,
    GatheringListQuery, GatheringResponse, GatheringStatsResponse, KakaoLoginRequest, LoginRequest,
    LogoutRequest, MemberResponse, MessageListQuery, MyMembershipResponse, PaginatedResponse,
    PublicUserResponse, QuestionDetailResponse, QuestionListQuery, QuestionResponse,
    RefreshTokenRequest, RegisterRequest, SendVerificationRequest, SolveQuestionRequest,
    UpdateAnswerRequest, UpdateCategoryRequest, UpdateGatheringRequest,
    UpdateGatheringStatusRequest, UpdateQuestionRequest, UpdateUserRequest,
    VerificationSentResponse, VerifyEmailRequest,
};
pub use services::{
    AnswerService, AuthService, CategoryService, ChatService, EmailSender, EmailService,
    GatheringService, LogEmailSender, MemberService, OAuthService, QuestionService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
