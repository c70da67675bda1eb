use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::user_dto::UserResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::user_repository::UserRepository;
use crate::services::auth_service::verify_password;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};

const INVALID_CREDENTIALS: &str = "Email o contraseña incorrectos";

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: UserRepository::new(state.pool.clone()),
            jwt: state.jwt.clone(),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        // Mismo mensaje para email desconocido y contraseña errónea
        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            warn!("🔐 Login fallido para {}", user.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            warn!("🔐 Login de usuario inactivo: {}", user.email);
            return Err(AppError::Forbidden("Usuario desactivado".to_string()));
        }

        let (token, claims) = generate_token(user.id, &user.email, user.role, &self.jwt)?;
        self.repository.record_login(user.id).await?;

        info!("✅ Login correcto: {} ({})", user.email, user.role.as_str());

        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_at: claims.expires_at(),
            user: UserResponse::from(user),
        })
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserResponse, AppError> {
        let found = self
            .repository
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| not_found_error("Usuario", user.user_id))?;

        Ok(UserResponse::from(found))
    }
}
