//! Signing of one unsigned transaction, as a small state machine:
//! `Unsigned → AwaitingSignature → Signed → Verified`, or `Failed`.

use router_lib::signature::{rsv_to_signature, verify_signature, KeyAlgorithm};
use router_lib::signer::{SignOutcome, Signer, SigningRequest};
use router_lib::RouterError;
use std::fmt::{self, Display, Formatter};
use tracing::{error, info};

use super::transaction::{make_signed_transaction, SignedTransaction, UnsignedTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningState {
    Unsigned,
    AwaitingSignature,
    Signed,
    Verified,
    Failed,
}

impl Display for SigningState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SigningState::Unsigned => write!(f, "unsigned"),
            SigningState::AwaitingSignature => write!(f, "awaiting signature"),
            SigningState::Signed => write!(f, "signed"),
            SigningState::Verified => write!(f, "verified"),
            SigningState::Failed => write!(f, "failed"),
        }
    }
}

pub struct SigningSession<'a> {
    unsigned: &'a UnsignedTransaction,
    state: SigningState,
    outcome: Option<SignOutcome>,
}

impl<'a> SigningSession<'a> {
    pub fn new(unsigned: &'a UnsignedTransaction) -> Self {
        Self {
            unsigned,
            state: SigningState::Unsigned,
            outcome: None,
        }
    }

    pub fn state(&self) -> SigningState {
        self.state
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::from_public_key(self.unsigned.public_key())
    }

    fn expect_state(&self, expected: SigningState) -> Result<(), RouterError> {
        if self.state != expected {
            return Err(RouterError::SigningState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn fail(&mut self, err: RouterError) -> RouterError {
        self.state = SigningState::Failed;
        err
    }

    /// Ask `signer` for a signature. `context` travels with the request to the oracle.
    pub async fn request_signature(&mut self, signer: &dyn Signer, context: &str) -> Result<(), RouterError> {
        self.expect_state(SigningState::Unsigned)?;
        self.state = SigningState::AwaitingSignature;

        let unsigned = self.unsigned;
        let message = unsigned.signing_message();
        let request = SigningRequest {
            algorithm: self.algorithm(),
            public_key: unsigned.public_key(),
            signing_hash: unsigned.signing_hash(),
            message: &message,
            context,
        };
        match signer.sign(&request).await {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.state = SigningState::Signed;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, sign_type = %request.algorithm, "request signature failed");
                Err(self.fail(e))
            }
        }
    }

    /// Check the returned signature against the transaction's public key.
    pub fn verify(&mut self) -> Result<(), RouterError> {
        self.expect_state(SigningState::Signed)?;
        let Some(outcome) = self.outcome.as_ref() else {
            return Err(self.fail(RouterError::SigningState {
                expected: SigningState::Signed.to_string(),
                actual: "no signature".to_string(),
            }));
        };
        let key_id = outcome.key_id.clone();
        let unsigned = self.unsigned;

        let checked = rsv_to_signature(&outcome.rsv, self.algorithm()).and_then(|signature| {
            verify_signature(
                unsigned.public_key(),
                unsigned.signing_hash(),
                &unsigned.signing_message(),
                &signature,
            )
        });
        if let Err(e) = checked {
            error!(key_id = %key_id, error = %e, "verify signature failed");
            return Err(self.fail(RouterError::SignatureVerification {
                key_id,
                reason: e.to_string(),
            }));
        }

        self.state = SigningState::Verified;
        Ok(())
    }

    /// Assemble the signed transaction. Only a verified session can finish.
    pub fn finish(self) -> Result<(SignedTransaction, SignOutcome), RouterError> {
        self.expect_state(SigningState::Verified)?;
        let outcome = self.outcome.ok_or_else(|| RouterError::SigningState {
            expected: SigningState::Verified.to_string(),
            actual: "no signature".to_string(),
        })?;
        let signed = make_signed_transaction(self.unsigned.public_key(), &outcome.rsv, self.unsigned)?;
        info!(key_id = %outcome.key_id, tx_hash = %signed.hash_hex(), "sign transaction finished");
        Ok((signed, outcome))
    }
}
