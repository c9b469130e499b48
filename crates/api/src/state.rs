use std::sync::Arc;

use tollgate_db::repositories::UserRepository;

use crate::auth::guard::AccessGuard;
use crate::auth::jwt::TokenIssuer;
use crate::auth::revocation::RevocationStore;
use crate::auth::service::AuthService;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// User storage, also used for health checks.
    pub users: Arc<dyn UserRepository>,
    /// Sign-up / sign-in orchestration.
    pub auth: Arc<AuthService>,
    /// Gate for protected routes and sign-out.
    pub guard: Arc<AccessGuard>,
}

impl AppState {
    /// Wire the authentication core from its collaborators.
    ///
    /// The token issuer is built from `config.jwt`.
    pub fn new(
        config: &ServerConfig,
        users: Arc<dyn UserRepository>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.jwt));
        let auth = Arc::new(AuthService::new(Arc::clone(&users), Arc::clone(&tokens)));
        let guard = Arc::new(AccessGuard::new(tokens, revocations));

        Self {
            users,
            auth,
            guard,
        }
    }
}
