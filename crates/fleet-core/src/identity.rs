//! Identity and legacy certificate kinds.
//!
//! Trusted clients used to be stored as typed certificates. They are now
//! identities keyed by authentication method, with certificate data kept in an
//! opaque metadata blob.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an identity authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    Tls,
    Oidc,
}

impl AuthMethod {
    /// Persisted numeric code.
    pub fn code(self) -> i64 {
        match self {
            AuthMethod::Tls => 1,
            AuthMethod::Oidc => 2,
        }
    }
}

/// Certificate kind as recorded by members that predate identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateType {
    Client,
    Server,
    Metrics,
}

impl CertificateType {
    pub fn from_code(code: i64) -> CoreResult<Self> {
        match code {
            1 => Ok(CertificateType::Client),
            2 => Ok(CertificateType::Server),
            3 => Ok(CertificateType::Metrics),
            other => Err(CoreError::UnknownCertificateType(other)),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            CertificateType::Client => 1,
            CertificateType::Server => 2,
            CertificateType::Metrics => 3,
        }
    }
}

/// Kind of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityType {
    CertificateClientRestricted,
    CertificateClientUnrestricted,
    CertificateServer,
    CertificateMetricsRestricted,
    OidcClient,
    CertificateMetricsUnrestricted,
}

impl IdentityType {
    /// Persisted numeric code.
    pub fn code(self) -> i64 {
        match self {
            IdentityType::CertificateClientRestricted => 1,
            IdentityType::CertificateClientUnrestricted => 2,
            IdentityType::CertificateServer => 3,
            IdentityType::CertificateMetricsRestricted => 4,
            IdentityType::OidcClient => 5,
            IdentityType::CertificateMetricsUnrestricted => 6,
        }
    }

    pub fn from_code(code: i64) -> CoreResult<Self> {
        match code {
            1 => Ok(IdentityType::CertificateClientRestricted),
            2 => Ok(IdentityType::CertificateClientUnrestricted),
            3 => Ok(IdentityType::CertificateServer),
            4 => Ok(IdentityType::CertificateMetricsRestricted),
            5 => Ok(IdentityType::OidcClient),
            6 => Ok(IdentityType::CertificateMetricsUnrestricted),
            other => Err(CoreError::UnknownIdentityType(other)),
        }
    }

    /// Name shown to API clients.
    pub fn api_name(self) -> &'static str {
        match self {
            IdentityType::CertificateClientRestricted => "Client certificate (restricted)",
            IdentityType::CertificateClientUnrestricted => "Client certificate (unrestricted)",
            IdentityType::CertificateServer => "Server certificate",
            IdentityType::CertificateMetricsRestricted => "Metrics certificate (restricted)",
            IdentityType::OidcClient => "OIDC client",
            IdentityType::CertificateMetricsUnrestricted => "Metrics certificate (unrestricted)",
        }
    }

    /// Identity type for a legacy certificate row.
    ///
    /// Server certificates are never restricted; the flag is ignored for them.
    pub fn from_certificate(cert_type: CertificateType, restricted: bool) -> Self {
        match (cert_type, restricted) {
            (CertificateType::Client, true) => IdentityType::CertificateClientRestricted,
            (CertificateType::Client, false) => IdentityType::CertificateClientUnrestricted,
            (CertificateType::Server, _) => IdentityType::CertificateServer,
            (CertificateType::Metrics, true) => IdentityType::CertificateMetricsRestricted,
            (CertificateType::Metrics, false) => IdentityType::CertificateMetricsUnrestricted,
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Metadata blob of a TLS identity.
///
/// Unknown fields written by newer members are preserved on round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateMetadata {
    /// PEM encoded certificate.
    #[serde(rename = "cert")]
    pub certificate: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CertificateMetadata {
    pub fn new(certificate: impl Into<String>) -> Self {
        Self {
            certificate: certificate.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
