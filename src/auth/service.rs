//! Login and token refresh.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::{now_string, Database, Member, MemberRepository};
use crate::{GnubridgeError, Result};

use super::password::verify_password;
use super::token::TokenAuthority;

/// Tokens plus the member they were issued for.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: Member,
    pub access_token: String,
    pub refresh_token: String,
}

/// Freshly rotated token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Service for credential checks and token issuance.
pub struct AuthService<'a> {
    db: &'a Database,
    tokens: &'a TokenAuthority,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService.
    pub fn new(db: &'a Database, tokens: &'a TokenAuthority) -> Self {
        Self { db, tokens }
    }

    /// Authenticate a member by login id and password.
    ///
    /// Unknown members and wrong passwords fail identically.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<LoginResult> {
        let member = MemberRepository::new(self.db.pool())
            .get_by_mb_id(user_id)
            .await?
            .filter(|m| verify_password(password, &m.mb_password))
            .ok_or_else(invalid_credentials)?;

        let access_token =
            self.tokens
                .issue_access_token(&member.mb_id, &member.mb_nick, member.mb_level)?;
        let refresh_token = self.tokens.issue_refresh_token(&member.mb_id)?;

        self.touch_login_time(member.mb_id.clone());
        info!(user_id = %member.mb_id, "member logged in");

        Ok(LoginResult {
            user: member,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// Nickname and level are re-read from the member row, never copied from
    /// the old token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|_| GnubridgeError::InvalidToken)?;

        let member = MemberRepository::new(self.db.pool())
            .get_by_mb_id(&claims.sub)
            .await?
            .ok_or(GnubridgeError::InvalidToken)?;

        Ok(TokenPair {
            access_token: self.tokens.issue_access_token(
                &member.mb_id,
                &member.mb_nick,
                member.mb_level,
            )?,
            refresh_token: self.tokens.issue_refresh_token(&member.mb_id)?,
        })
    }

    fn touch_login_time(&self, mb_id: String) {
        let db = self.db.clone();
        tokio::spawn(async move {
            let now = now_string();
            if let Err(e) = MemberRepository::new(db.pool())
                .update_login_time(&mb_id, &now)
                .await
            {
                warn!(user_id = %mb_id, error = %e, "failed to record login time");
            }
        });
    }
}

fn invalid_credentials() -> GnubridgeError {
    GnubridgeError::Unauthorized("Invalid credentials".to_string())
}
