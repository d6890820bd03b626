//! Questions sent to the support team, which do not require an account.

use axum::{extract::State, response::Response};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::DbState,
    database_id::DatabaseId,
    db::lock_connection,
    extract::ApiJson,
    response::no_content,
    validation::{FieldErrors, first_failure},
};

const MAX_CONTENT_LENGTH: usize = 5000;

/// What a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionCategory {
    Utilization,
    Error,
    Suggestion,
    Etc,
}

impl QuestionCategory {
    fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Utilization => "UTILIZATION",
            QuestionCategory::Error => "ERROR",
            QuestionCategory::Suggestion => "SUGGESTION",
            QuestionCategory::Etc => "ETC",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<QuestionCategory>,
}

/// A validated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub email: String,
    pub content: String,
    pub category: QuestionCategory,
}

impl QuestionRequest {
    /// Check every field, collecting a message for each invalid one.
    pub fn validate(self) -> Result<Question, Error> {
        let mut field_errors = FieldErrors::new();

        if let Some(message) = first_failure(&[
            (self.email.trim().is_empty(), "이메일을 입력해주세요"),
            (
                !EmailAddress::is_valid(&self.email),
                "이메일 형식이 올바르지 않습니다.",
            ),
        ]) {
            field_errors.add("email", message);
        }

        let content_length = self.content.chars().count();
        if !(1..=MAX_CONTENT_LENGTH).contains(&content_length) {
            field_errors.add(
                "content",
                "문의 내용은 1자 이상 5000자 이하로 입력해주세요",
            );
        }

        let Some(category) = self.category else {
            field_errors.add("category", "문의 카테고리를 입력해주세요");
            return Err(Error::InvalidFields(field_errors));
        };

        field_errors.into_result(Question {
            email: self.email,
            content: self.content,
            category,
        })
    }
}

/// Create the question table.
pub fn create_question_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS question (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )?;

    Ok(())
}

/// Store a question for the support team.
pub fn create_question(question: &Question, connection: &Connection) -> Result<DatabaseId, Error> {
    connection.execute(
        "INSERT INTO question (email, content, category) VALUES (?1, ?2, ?3)",
        (&question.email, &question.content, question.category.as_str()),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Accept a question from anyone, signed in or not.
pub async fn send_question_endpoint(
    State(state): State<DbState>,
    ApiJson(request): ApiJson<QuestionRequest>,
) -> Result<Response, Error> {
    let question = request.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let question_id = create_question(&question, &connection)?;
    tracing::info!(
        "Received question {question_id} about {}",
        question.category.as_str()
    );

    Ok(no_content())
}
