//! User entity <-> model mapper

use moim_core::entities::{JoinedType, User, UserRole};
use moim_core::{DomainError, Snowflake};

use super::bad_enum;
use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&model.role).ok_or_else(|| bad_enum("role", &model.role))?;
        let joined_type = JoinedType::parse(&model.joined_type)
            .ok_or_else(|| bad_enum("joined_type", &model.joined_type))?;

        Ok(User {
            id: Snowflake::new(model.id),
            email: model.email,
            username: model.username,
            role,
            joined_type,
            profile: model.profile,
            education_level: model.education_level,
            location: model.location,
            failed_login_attempts: model.failed_login_attempts,
            last_failed_login: model.last_failed_login,
            is_active: model.is_active,
            is_deleted: model.is_deleted,
            deleted_at: model.deleted_at,
            deletion_scheduled_at: model.deletion_scheduled_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model() -> UserModel {
        let now = Utc::now();
        UserModel {
            id: 1,
            email: "a@example.com".to_string(),
            username: "alice".to_string(),
            password_hash: None,
            role: "user".to_string(),
            joined_type: "kakao".to_string(),
            profile: None,
            education_level: None,
            location: None,
            failed_login_attempts: 0,
            last_failed_login: None,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            deletion_scheduled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_from_model() {
        let user = User::try_from(model()).unwrap();
        assert_eq!(user.id, Snowflake::new(1));
        assert_eq!(user.joined_type, JoinedType::Kakao);
    }

    #[test]
    fn test_bad_role_rejected() {
        let mut m = model();
        m.role = "superuser".to_string();
        assert!(User::try_from(m).is_err());
    }
}
