use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use compost_auth_schema::password_reset_otps;

use crate::domain::repository::OtpRepository;
use crate::domain::types::PasswordResetOtp;
use crate::error::AuthServiceError;

// ── Password-reset code repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn upsert(&self, otp: &PasswordResetOtp) -> Result<(), AuthServiceError> {
        let model = password_reset_otps::ActiveModel {
            id: Set(otp.id),
            email: Set(otp.email.clone()),
            otp_code: Set(otp.otp_code.clone()),
            created_at: Set(otp.created_at),
            expires_at: Set(otp.expires_at),
            used_at: Set(None),
        };
        password_reset_otps::Entity::insert(model)
            .on_conflict(
                OnConflict::column(password_reset_otps::Column::Email)
                    .update_columns([
                        password_reset_otps::Column::Id,
                        password_reset_otps::Column::OtpCode,
                        password_reset_otps::Column::CreatedAt,
                        password_reset_otps::Column::ExpiresAt,
                        password_reset_otps::Column::UsedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert password reset otp")?;
        Ok(())
    }

    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError> {
        let model = password_reset_otps::Entity::find()
            .filter(password_reset_otps::Column::Email.eq(email))
            .filter(password_reset_otps::Column::OtpCode.eq(code))
            .filter(password_reset_otps::Column::UsedAt.is_null())
            .filter(password_reset_otps::Column::ExpiresAt.gt(now))
            .order_by_desc(password_reset_otps::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find active password reset otp")?;
        Ok(model.map(otp_from_model))
    }

    async fn find_latest_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError> {
        let model = password_reset_otps::Entity::find()
            .filter(password_reset_otps::Column::Email.eq(email))
            .filter(password_reset_otps::Column::OtpCode.eq(code))
            .order_by_desc(password_reset_otps::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find password reset otp by code")?;
        Ok(model.map(otp_from_model))
    }

    async fn mark_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AuthServiceError> {
        // A replaced row carries a new id, so a stale id matches nothing.
        let result = password_reset_otps::Entity::update_many()
            .col_expr(password_reset_otps::Column::UsedAt, Expr::value(at))
            .filter(password_reset_otps::Column::Id.eq(id))
            .filter(password_reset_otps::Column::UsedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark password reset otp used")?;
        Ok(result.rows_affected > 0)
    }
}

fn otp_from_model(model: password_reset_otps::Model) -> PasswordResetOtp {
    PasswordResetOtp {
        id: model.id,
        email: model.email,
        otp_code: model.otp_code,
        created_at: model.created_at,
        expires_at: model.expires_at,
        used_at: model.used_at,
    }
}

// ── Recovery token repository (email-link reset) ──────────────────────────────

#[cfg(feature = "legacy-link-reset")]
pub use legacy::DbRecoveryTokenRepository;

#[cfg(feature = "legacy-link-reset")]
mod legacy {
    use anyhow::Context as _;
    use chrono::{DateTime, Utc};
    use sea_orm::{
        ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
        QueryFilter, sea_query::Expr,
    };
    use uuid::Uuid;

    use compost_auth_schema::password_reset_tokens;

    use crate::domain::repository::RecoveryTokenRepository;
    use crate::domain::types::PasswordResetToken;
    use crate::error::AuthServiceError;

    #[derive(Clone)]
    pub struct DbRecoveryTokenRepository {
        pub db: DatabaseConnection,
    }

    impl RecoveryTokenRepository for DbRecoveryTokenRepository {
        async fn create(&self, token: &PasswordResetToken) -> Result<(), AuthServiceError> {
            password_reset_tokens::ActiveModel {
                id: Set(token.id),
                email: Set(token.email.clone()),
                token_hash: Set(token.token_hash.clone()),
                created_at: Set(token.created_at),
                expires_at: Set(token.expires_at),
                used_at: Set(None),
            }
            .insert(&self.db)
            .await
            .context("create password reset token")?;
            Ok(())
        }

        async fn find_by_hash(
            &self,
            token_hash: &str,
        ) -> Result<Option<PasswordResetToken>, AuthServiceError> {
            let model = password_reset_tokens::Entity::find()
                .filter(password_reset_tokens::Column::TokenHash.eq(token_hash))
                .one(&self.db)
                .await
                .context("find password reset token")?;
            Ok(model.map(|m| PasswordResetToken {
                id: m.id,
                email: m.email,
                token_hash: m.token_hash,
                created_at: m.created_at,
                expires_at: m.expires_at,
                used_at: m.used_at,
            }))
        }

        async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AuthServiceError> {
            // Conditional update so two concurrent clicks cannot both win.
            let result = password_reset_tokens::Entity::update_many()
                .col_expr(password_reset_tokens::Column::UsedAt, Expr::value(at))
                .filter(password_reset_tokens::Column::Id.eq(id))
                .filter(password_reset_tokens::Column::UsedAt.is_null())
                .exec(&self.db)
                .await
                .context("consume password reset token")?;
            Ok(result.rows_affected > 0)
        }
    }
}
