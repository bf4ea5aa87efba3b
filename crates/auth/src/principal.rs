use crate::IdentityClaim;

/// Identity of a request whose bearer token has been verified.
///
/// There is no public constructor: the only way to obtain one is through
/// [`crate::CredentialVerifier::verify`]. Anything that takes an
/// `&AuthenticatedIdentity` (the role resolver, self-access checks, handlers)
/// therefore cannot run on an unauthenticated request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedIdentity {
    claim: IdentityClaim,
}

impl AuthenticatedIdentity {
    pub(crate) fn from_verified_claim(claim: IdentityClaim) -> Self {
        Self { claim }
    }

    pub fn email(&self) -> &str {
        &self.claim.email
    }

    pub fn claim(&self) -> &IdentityClaim {
        &self.claim
    }
}
