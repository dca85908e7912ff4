use std::fmt;
use std::str::FromStr;

use jiff::SignedDuration;

/// What happens to a refresh token once it has been exchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshRotation {
    /// The refresh token is single use.
    #[default]
    Rotate,
    /// The refresh token stays valid after use.
    Reuse,
}

/// How the server answers the revocation of an already revoked token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevocationReplay {
    /// Validation failure: invalid grant.
    #[default]
    Reject,
    /// Success response with `success: false`.
    Acknowledge,
}

/// Unknown policy name on the command line.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Unknown policy '{value}', expected one of {expected}")]
pub struct UnknownPolicy {
    value: String,
    expected: &'static str,
}

impl FromStr for RefreshRotation {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rotate" => Ok(Self::Rotate),
            "reuse" => Ok(Self::Reuse),
            _ => Err(UnknownPolicy {
                value: value.to_string(),
                expected: "rotate, reuse",
            }),
        }
    }
}

impl FromStr for RevocationReplay {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reject" => Ok(Self::Reject),
            "acknowledge" => Ok(Self::Acknowledge),
            _ => Err(UnknownPolicy {
                value: value.to_string(),
                expected: "reject, acknowledge",
            }),
        }
    }
}

/// Server settings.
///
/// The defaults accept the integration credentials of the development
/// environment.
#[derive(Clone)]
pub struct ServerConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: String,
    pub refresh_rotation: RefreshRotation,
    pub revocation_replay: RevocationReplay,
    pub token_lifetime: SignedDuration,
}

impl ServerConfig {
    #[must_use]
    pub fn with_refresh_rotation(mut self, refresh_rotation: RefreshRotation) -> Self {
        self.refresh_rotation = refresh_rotation;
        self
    }

    #[must_use]
    pub fn with_revocation_replay(mut self, revocation_replay: RevocationReplay) -> Self {
        self.revocation_replay = revocation_replay;
        self
    }

    #[must_use]
    pub fn with_token_lifetime(mut self, token_lifetime: SignedDuration) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    pub(crate) fn accepts(&self, client_id: &str, client_secret: &str) -> bool {
        self.client_id == client_id && self.client_secret == client_secret
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            client_id: "client_id$development$integration_client_id".to_string(),
            client_secret: "client_secret$development$integration_client_secret".to_string(),
            environment: "development".to_string(),
            refresh_rotation: RefreshRotation::default(),
            revocation_replay: RevocationReplay::default(),
            token_lifetime: SignedDuration::from_hours(1),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("refresh_rotation", &self.refresh_rotation)
            .field("revocation_replay", &self.revocation_replay)
            .field("token_lifetime", &self.token_lifetime)
            .finish()
    }
}
