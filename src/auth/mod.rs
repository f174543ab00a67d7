use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claim name carrying the owner identity
pub const OWNER_CLAIM: &str = "id";

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Authentication-stage failures. All of them deny access before any data is read.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredential,

    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedHeader,

    #[error("Invalid or unverifiable token")]
    InvalidSignature,

    #[error("Unable to parse token claims")]
    UnparseableClaims,

    #[error("Token has no owner claim")]
    MissingOwnerClaim,
}

/// Decoded payload of a token whose signature has been verified
pub type ClaimSet = Map<String, Value>;

/// Claim set that passed signature verification, carried between the two auth checks
#[derive(Debug, Clone)]
pub struct VerifiedClaims(ClaimSet);

impl VerifiedClaims {
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }
}

/// Trusted user identifier that scopes every store access of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerIdentity(String);

impl OwnerIdentity {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verifies HMAC-signed bearer tokens against the service's shared secret.
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct CredentialValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    audit_logging: bool,
}

impl std::fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialValidator")
            .field("algorithms", &self.validation.algorithms)
            .field("audit_logging", &self.audit_logging)
            .finish_non_exhaustive()
    }
}

impl CredentialValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // exp/nbf are checked when present but tokens are not required to carry them
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            audit_logging: false,
        }
    }

    pub fn with_audit_logging(mut self, enabled: bool) -> Self {
        self.audit_logging = enabled;
        self
    }

    /// Full check: header shape, signature, claim set, owner claim
    pub fn validate(&self, header: Option<&str>) -> Result<OwnerIdentity, AuthError> {
        let claims = self.verify_header(header)?;
        self.owner_identity(&claims)
    }

    /// First check: the request carries a well-formed, correctly signed token
    pub fn verify_header(&self, header: Option<&str>) -> Result<VerifiedClaims, AuthError> {
        let token = extract_bearer_token(header)?;
        self.verify_token(token)
    }

    /// Verify the signature and decode the claim set of a raw token
    pub fn verify_token(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Rejected token with unreadable header: {}", e);
            AuthError::InvalidSignature
        })?;

        if !HMAC_ALGORITHMS.contains(&header.alg) {
            tracing::warn!("Rejected token signed with non-HMAC algorithm {:?}", header.alg);
            return Err(AuthError::InvalidSignature);
        }

        let token_data = decode::<Value>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            // Signature already verified; only the payload failed to parse
            ErrorKind::Json(_) | ErrorKind::Utf8(_) => AuthError::UnparseableClaims,
            _ => {
                tracing::debug!("Token verification failed: {}", e);
                AuthError::InvalidSignature
            }
        })?;

        match token_data.claims {
            Value::Object(map) => Ok(VerifiedClaims(map)),
            _ => Err(AuthError::UnparseableClaims),
        }
    }

    /// Second check: derive the owner identity from verified claims
    pub fn owner_identity(&self, claims: &VerifiedClaims) -> Result<OwnerIdentity, AuthError> {
        let id = claims
            .get(OWNER_CLAIM)
            .and_then(Value::as_str)
            .ok_or(AuthError::MissingOwnerClaim)?;

        if self.audit_logging {
            tracing::info!(owner = %id, "Authenticated request");
        } else {
            tracing::debug!(owner = %id, "Authenticated request");
        }

        Ok(OwnerIdentity::new(id))
    }
}

/// Split `<scheme> <token>` and return the token
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.map(str::trim).filter(|v| !v.is_empty()).ok_or(AuthError::MissingCredential)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
