use chrono::{DateTime, Utc};
use phi_core::{DidUrl, ProtocolState, VerifierConfig};
use phi_crypto::verify_signature;
use phi_identity::{DidDocument, DidResolver, RegistryError, ResolveDid};
use std::fmt;

use crate::credential::VerifiableCredential;
use crate::error::{CredentialError, VerificationError};
use crate::validation::validate_structure;

/// Outcome of presenting a credential.
///
/// Recomputed on every presentation; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Denied(VerificationError),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted)
    }

    /// The denial reason, if the credential was denied.
    pub fn denial_reason(&self) -> Option<&VerificationError> {
        match self {
            Decision::Accepted => None,
            Decision::Denied(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accepted => write!(f, "ACCEPTED"),
            Decision::Denied(reason) => write!(f, "DENIED [{}]: {}", reason.code(), reason),
        }
    }
}

/// Verifies credentials presented by holders against their issuer's DID Document.
///
/// Stateless per call and safe to share across threads. The verifier never
/// grants access or issues rewards itself; callers act on [`Decision::Accepted`].
pub struct CredentialVerifier<R> {
    resolver: R,
    config: VerifierConfig,
}

impl<R> CredentialVerifier<R> {
    /// Create a verifier with zero clock-skew tolerance.
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, VerifierConfig::default())
    }

    pub fn with_config(resolver: R, config: VerifierConfig) -> Self {
        Self { resolver, config }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Steps 3 to 5, shared by the local and remote paths.
    fn verify_resolved(
        &self,
        mut run: Run<'_>,
        issuer_doc: &DidDocument,
        vc: &VerifiableCredential,
        now: DateTime<Utc>,
    ) -> Decision {
        // Step 3: structural validation
        run.advance(ProtocolState::Validating);
        if let Err(err) = validate_structure(vc, now, self.config.clock_skew()) {
            run.advance(ProtocolState::StructurallyInvalid);
            return run.deny(match err {
                CredentialError::EmptyProof => VerificationError::InvalidSignature,
                other => VerificationError::StructuralError(other),
            });
        }
        run.advance(ProtocolState::StructurallyValid);

        // validate_structure guarantees a proof with a non-empty signature
        let Some(proof) = vc.proof.as_ref() else {
            return run.deny(VerificationError::InvalidSignature);
        };

        // Step 4: locate the referenced key in the issuer document
        let method = DidUrl::parse_relative(&proof.verification_method, &issuer_doc.id)
            .ok()
            .and_then(|url| issuer_doc.find_verification_method(&url));
        let Some(method) = method else {
            return run.deny(VerificationError::UnknownVerificationMethod(
                proof.verification_method.clone(),
            ));
        };

        let key = method
            .algorithm()
            .and_then(|alg| method.key_bytes().map(|bytes| (alg, bytes)));
        let (algorithm, key_bytes) = match key {
            Ok(key) => key,
            Err(err) => return run.deny(VerificationError::KeyFormat(err)),
        };

        // Step 5: cryptographic proof
        run.advance(ProtocolState::VerifyingProof);
        let signing_input = match vc.signing_input() {
            Ok(input) => input,
            Err(err) => return run.deny(VerificationError::StructuralError(err)),
        };
        match verify_signature(algorithm, &key_bytes, &signing_input, &proof.signature) {
            Ok(true) => run.accept(),
            Ok(false) => run.deny(VerificationError::InvalidSignature),
            Err(err) => run.deny(VerificationError::KeyFormat(err)),
        }
    }
}

impl<R: ResolveDid> CredentialVerifier<R> {
    /// Decide whether `holder_did` may present `vc`, using the current time.
    pub fn resolve_and_verify(&self, holder_did: &str, vc: &VerifiableCredential) -> Decision {
        self.resolve_and_verify_at(holder_did, vc, Utc::now())
    }

    /// Decide whether `holder_did` may present `vc` at time `now`.
    pub fn resolve_and_verify_at(
        &self,
        holder_did: &str,
        vc: &VerifiableCredential,
        now: DateTime<Utc>,
    ) -> Decision {
        let mut run = Run::start(holder_did, vc);

        // Step 1: the credential must be about its presenter
        if let Err(err) = check_subject(holder_did, vc) {
            return run.deny(err);
        }

        // Step 2: resolve the issuer, never the holder
        run.advance(ProtocolState::Resolving);
        let issuer_doc = match self.resolver.resolve_did(&vc.issuer) {
            Ok(doc) => doc,
            Err(err) => return run.resolution_failed(err),
        };
        run.advance(ProtocolState::Resolved);

        self.verify_resolved(run, &issuer_doc, vc, now)
    }
}

impl<R: DidResolver> CredentialVerifier<R> {
    /// Like [`CredentialVerifier::resolve_and_verify`], resolving the issuer asynchronously.
    pub async fn resolve_and_verify_remote(
        &self,
        holder_did: &str,
        vc: &VerifiableCredential,
    ) -> Decision {
        self.resolve_and_verify_remote_at(holder_did, vc, Utc::now()).await
    }

    pub async fn resolve_and_verify_remote_at(
        &self,
        holder_did: &str,
        vc: &VerifiableCredential,
        now: DateTime<Utc>,
    ) -> Decision {
        let mut run = Run::start(holder_did, vc);

        if let Err(err) = check_subject(holder_did, vc) {
            return run.deny(err);
        }

        run.advance(ProtocolState::Resolving);
        let issuer_doc = match self.resolver.resolve(&vc.issuer).await {
            Ok(doc) => doc,
            Err(err) => return run.resolution_failed(err),
        };
        run.advance(ProtocolState::Resolved);

        self.verify_resolved(run, &issuer_doc, vc, now)
    }
}

fn check_subject(holder_did: &str, vc: &VerifiableCredential) -> Result<(), VerificationError> {
    if vc.credential_subject.id == holder_did {
        Ok(())
    } else {
        Err(VerificationError::SubjectMismatch {
            holder: holder_did.to_string(),
            subject: vc.credential_subject.id.clone(),
        })
    }
}

/// Tracks one pass through the protocol state machine.
struct Run<'a> {
    holder: &'a str,
    credential_id: &'a str,
    state: ProtocolState,
}

impl<'a> Run<'a> {
    fn start(holder: &'a str, vc: &'a VerifiableCredential) -> Self {
        Self {
            holder,
            credential_id: &vc.id,
            state: ProtocolState::Start,
        }
    }

    fn advance(&mut self, next: ProtocolState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal protocol transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(
            holder = self.holder,
            from = %self.state,
            to = %next,
            "protocol transition"
        );
        self.state = next;
    }

    fn resolution_failed(mut self, err: RegistryError) -> Decision {
        self.advance(ProtocolState::ResolutionFailed);
        self.deny(VerificationError::IssuerUnresolvable(err))
    }

    fn deny(mut self, reason: VerificationError) -> Decision {
        if !self.state.is_terminal() {
            self.advance(ProtocolState::Rejected);
        }
        tracing::warn!(
            holder = self.holder,
            credential_id = self.credential_id,
            reason = reason.code(),
            "credential denied: {}",
            reason
        );
        Decision::Denied(reason)
    }

    fn accept(mut self) -> Decision {
        self.advance(ProtocolState::Accepted);
        tracing::info!(
            holder = self.holder,
            credential_id = self.credential_id,
            "credential accepted"
        );
        Decision::Accepted
    }
}
