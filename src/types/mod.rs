// src/types/mod.rs
pub mod application;
pub mod auth;
pub mod interview;
pub mod response;

pub use application::{
    Application, ApplicationStatus, CreateApplicationRequest, UpdateApplicationRequest,
};
pub use auth::{LoginRequest, LoginResponse, RegisterRequest, User};
pub use interview::{
    CreateInterviewRequest, Interview, InterviewStatus, UpdateInterviewRequest,
    UpdateReviewRequest,
};
pub use response::{ApiErrorBody, MessageResponse};
