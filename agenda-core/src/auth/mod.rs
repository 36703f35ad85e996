//! Authentication: session state machine, backend API and the store that drives both.

pub mod api;
pub mod state;
mod store;

pub use api::{AuthApi, AuthResponse, HttpAuthApi, LoginCredentials, RegisterData};
pub use state::{AuthAction, AuthState, AuthStatus, User};
pub use store::AuthStore;
