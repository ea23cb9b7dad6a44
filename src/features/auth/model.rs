/// Caller identity established by the auth gate and stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub roles: Vec<String>,
}
