use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::search_pattern;
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserFilters, UserResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::repositories::user_repository::{UserData, UserRepository};
use crate::services::auth_service::hash_password;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, unprocessable_error, AppError};

pub struct UserController {
    repository: UserRepository,
    state: AppState,
}

impl UserController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: UserRepository::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    pub async fn list(&self, filters: UserFilters) -> Result<Paginated<UserResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());

        let (users, total) = self
            .repository
            .list(search.as_deref(), filters.role, page.limit(), page.offset())
            .await?;

        Ok(Paginated::new(users, total, page).map(UserResponse::from))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        if self.repository.email_taken(&request.email, None).await? {
            return Err(conflict_error("Usuario", "email", &request.email));
        }

        let password_hash = hash_password(request.password).await?;
        let user = self
            .repository
            .create(
                UserData {
                    name: &request.name,
                    email: &request.email,
                    role: request.role.unwrap_or(UserRole::Operator),
                    is_active: true,
                },
                &password_hash,
            )
            .await?;

        info!("👤 Usuario creado: {} ({})", user.email, user.id);
        Ok(ApiResponse::success_with_message(UserResponse::from(user), "Usuario creado exitosamente"))
    }

    pub async fn update(
        &self,
        current: &AuthenticatedUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        if id == current.user_id && (!request.is_active || request.role != UserRole::Admin) {
            return Err(unprocessable_error("No puedes desactivarte ni quitarte el rol de administrador"));
        }

        let previous = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Usuario", id))?;

        if self.repository.email_taken(&request.email, Some(id)).await? {
            return Err(conflict_error("Usuario", "email", &request.email));
        }

        let password_hash = match request.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let user = self
            .repository
            .update(
                id,
                UserData {
                    name: &request.name,
                    email: &request.email,
                    role: request.role,
                    is_active: request.is_active,
                },
                password_hash.as_deref(),
            )
            .await?
            .ok_or_else(|| not_found_error("Usuario", id))?;

        // Los tokens llevan el rol: desactivar, cambiar rol o contraseña
        // cierra las sesiones abiertas
        if !user.is_active || user.role != previous.role || password_hash.is_some() {
            self.state.revoke_user_sessions(user.id).await;
        }

        info!("👤 Usuario actualizado: {}", user.id);
        Ok(ApiResponse::success_with_message(UserResponse::from(user), "Usuario actualizado exitosamente"))
    }

    pub async fn delete(&self, current: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if id == current.user_id {
            return Err(unprocessable_error("No puedes eliminar tu propio usuario"));
        }

        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Usuario", id));
        }
        self.state.revoke_user_sessions(id).await;

        info!("🗑️ Usuario eliminado: {}", id);
        Ok(ApiResponse::message("Usuario eliminado exitosamente"))
    }
}
