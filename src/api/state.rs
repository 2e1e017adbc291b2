//! Application state for shared services

use crate::infrastructure::admission::AdmissionGate;
use crate::infrastructure::auth::{PublicKeyPublisher, TokenIssuer};
use crate::infrastructure::user::UserService;

/// Services shared by every handler. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub token_issuer: TokenIssuer,
    pub key_publisher: PublicKeyPublisher,
    pub user_service: UserService,
    pub admission_gate: AdmissionGate,
}
