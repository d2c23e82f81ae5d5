use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::UserRole;

/// Token type discriminator; a refresh token is never accepted as an access token.
const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT claims stored in access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique per token so two tokens issued in the same second hash differently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// "access" or "refresh".
    #[serde(default)]
    pub typ: String,
}

impl Claims {
    /// The caller's role, `None` if the claim holds an unknown string.
    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }
}

#[derive(Debug)]
pub enum TokenError {
    MissingSecret,
    Jwt(jsonwebtoken::errors::Error),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::MissingSecret => f.write_str("JWT_SECRET must be set"),
            TokenError::Jwt(e) => write!(f, "{e}"),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        TokenError::Jwt(e)
    }
}

/// SHA-256 of a raw JWT as lowercase hex. Only this hash is persisted for
/// refresh tokens; the raw token lives in the client cookie.
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn jwt_secret() -> Result<String, TokenError> {
    std::env::var("JWT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(TokenError::MissingSecret)
}

pub fn access_token_expiry_minutes() -> i64 {
    std::env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15)
}

pub fn refresh_token_expiry_days() -> i64 {
    std::env::var("JWT_REFRESH_TOKEN_EXPIRY_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(7)
}

fn sign(claims: &Claims) -> Result<String, TokenError> {
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_secret()?.as_bytes()),
    )?)
}

fn claims_for(user_id: i64, username: &str, role: &str, ttl: Duration, typ: &str) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user_id,
        username: username.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
        typ: typ.to_string(),
    }
}

pub fn create_access_token(user_id: i64, username: &str, role: &str) -> Result<String, TokenError> {
    let ttl = Duration::minutes(access_token_expiry_minutes());
    sign(&claims_for(user_id, username, role, ttl, TOKEN_TYPE_ACCESS))
}

pub fn create_refresh_token(
    user_id: i64,
    username: &str,
    role: &str,
) -> Result<(String, chrono::DateTime<Utc>), TokenError> {
    let ttl = Duration::days(refresh_token_expiry_days());
    let claims = claims_for(user_id, username, role, ttl, TOKEN_TYPE_REFRESH);
    let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
    Ok((sign(&claims)?, expires_at))
}

fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret()?.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Validate an access token. Tokens typed "refresh" are rejected.
pub fn validate_access_token(token: &str) -> Result<Claims, TokenError> {
    let claims = decode_claims(token)?;
    if claims.typ != TOKEN_TYPE_ACCESS {
        return Err(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidToken,
        )
        .into());
    }
    Ok(claims)
}

/// Validate a refresh token. Only tokens typed "refresh" pass.
pub fn validate_refresh_token(token: &str) -> Result<Claims, TokenError> {
    let claims = decode_claims(token)?;
    if claims.typ != TOKEN_TYPE_REFRESH {
        return Err(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidToken,
        )
        .into());
    }
    Ok(claims)
}
