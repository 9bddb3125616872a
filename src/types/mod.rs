//! Core types for the study-rag system

pub mod quiz;
pub mod response;

pub use quiz::{ChatTurn, QuizItem};
pub use response::{
    AnswerResponse, HistoryResponse, KeyPointsResponse, QuizResponse, SessionStatusResponse,
    SummaryResponse, UploadResponse,
};
