use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenSubject;
use super::errors::TokenError;

/// Signer for one token domain.
///
/// Bound at construction to a single secret and a single lifetime; the access
/// and refresh domains are two independent instances with independent
/// secrets. Uses HS256 (HMAC with SHA-256).
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer for one domain.
    ///
    /// # Arguments
    /// * `secret` - Signing secret (provisioned out of band, at least 32 bytes)
    /// * `ttl` - Lifetime applied to every token this signer issues
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a signed token embedding `subject` and an absolute expiry.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);
        let claims = Claims::for_subject(subject, self.ttl);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    /// * `Expired` - Signature verifies but the expiry has passed
    /// * `Invalid` - Signature does not verify (tampered, wrong secret, malformed)
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Decode a token's claims without verifying signature or expiry.
    ///
    /// # Security Warning
    /// The returned claims are unauthenticated. The only supported use is
    /// recovering a user id from an expired-but-otherwise-trusted refresh
    /// token for cleanup; never authorize an action from this method.
    ///
    /// # Errors
    /// * `Invalid` - Token format is invalid
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";
    const OTHER_SECRET: &[u8] = b"another_secret_at_least_32_bytes!!";

    fn subject() -> TokenSubject {
        TokenSubject {
            id: "user123".to_string(),
            login: "alice".to_string(),
            metadata: Some(serde_json::json!({"theme": "dark"})),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new(SECRET, Duration::minutes(15));

        let token = signer.issue(&subject()).expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = signer.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.subject(), subject());
    }

    #[test]
    fn test_verify_with_wrong_secret_is_invalid() {
        let issuer = TokenSigner::new(SECRET, Duration::minutes(15));
        let verifier = TokenSigner::new(OTHER_SECRET, Duration::minutes(15));

        let token = issuer.issue(&subject()).expect("Failed to issue token");

        let result = verifier.verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_garbage_is_invalid() {
        let signer = TokenSigner::new(SECRET, Duration::minutes(15));

        let result = signer.verify("not.a.token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_expired_is_distinct_from_invalid() {
        // A signer whose ttl lies in the past mints already-expired tokens.
        let expired_signer = TokenSigner::new(SECRET, Duration::seconds(-120));
        let verifier = TokenSigner::new(SECRET, Duration::minutes(15));

        let token = expired_signer
            .issue(&subject())
            .expect("Failed to issue token");

        let result = verifier.verify(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_signing_domains_are_independent() {
        let access = TokenSigner::new(SECRET, Duration::minutes(15));
        let refresh = TokenSigner::new(OTHER_SECRET, Duration::days(7));

        let refresh_token = refresh.issue(&subject()).expect("Failed to issue token");

        assert!(matches!(
            access.verify(&refresh_token),
            Err(TokenError::Invalid(_))
        ));
        assert!(refresh.verify(&refresh_token).is_ok());
    }

    #[test]
    fn test_decode_unverified_ignores_expiry_and_signature() {
        let expired_signer = TokenSigner::new(SECRET, Duration::seconds(-120));
        let other = TokenSigner::new(OTHER_SECRET, Duration::minutes(15));

        let token = expired_signer
            .issue(&subject())
            .expect("Failed to issue token");

        // Readable even though it is expired and `other` holds a different secret.
        let claims = other
            .decode_unverified(&token)
            .expect("Failed to decode unverified");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.login, "alice");
    }

    #[test]
    fn test_decode_unverified_rejects_malformed_token() {
        let signer = TokenSigner::new(SECRET, Duration::minutes(15));

        let result = signer.decode_unverified("garbage");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }
}
