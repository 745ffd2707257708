//! sfera-auth-core - núcleo de autenticação
//!
//! Claims JWT e validação de tokens do painel

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sfera_common::{UserId, utils::new_id};
use sfera_errors::{AppError, AppResult};

/// Claims do token de sessão
///
/// O payload segue o formato que o painel sempre emitiu:
/// `id` numérico do usuário, e-mail e tipo (perfil).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (ID do usuário, como string)
    pub sub: String,
    /// Nome de exibição
    #[serde(default)]
    pub nome: String,
    /// E-mail
    #[serde(default)]
    pub email: String,
    /// Perfil (admin, tecnico, ...)
    #[serde(default)]
    pub tipo: String,
    /// Expiração
    pub exp: i64,
    /// Emitido em
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

impl Claims {
    pub fn new(
        user_id: UserId,
        nome: &str,
        email: &str,
        tipo: &str,
        expires_in_secs: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            nome: nome.to_string(),
            email: email.to_string(),
            tipo: tipo.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: new_id().to_string(),
        }
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        UserId::from_string(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn is_admin(&self) -> bool {
        self.tipo == "admin"
    }
}

/// Serviço de tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl TokenService {
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    /// Gera um token de sessão
    pub fn generate_token(
        &self,
        user_id: UserId,
        nome: &str,
        email: &str,
        tipo: &str,
    ) -> AppResult<String> {
        let claims = Claims::new(user_id, nome, email, tipo, self.expires_in);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Valida um token de sessão
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// Expiração configurada (segundos)
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }
}
