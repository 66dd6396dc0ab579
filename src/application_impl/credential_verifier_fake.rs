use crate::application_port::*;
use crate::domain_model::SubjectId;
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct FakeUser {
    password: String,
    subject_id: SubjectId,
}

/// In-memory credential directory for development and tests.
/// Passwords are compared in plain text.
#[derive(Debug, Default)]
pub struct FakeCredentialVerifier {
    users: DashMap<String, FakeUser>,
}

impl FakeCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
        subject_id: SubjectId,
    ) -> Self {
        self.add_user(username, password, subject_id);
        self
    }

    pub fn add_user(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        subject_id: SubjectId,
    ) {
        self.users.insert(
            username.into(),
            FakeUser {
                password: password.into(),
                subject_id,
            },
        );
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for FakeCredentialVerifier {
    async fn verify_user_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SubjectId, AuthError> {
        match self.users.get(username) {
            Some(user) if user.password == password => Ok(user.subject_id.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
