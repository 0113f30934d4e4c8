//! Unit tests for token verification

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::domain::entities::token::{Claims, TokenUse};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryRevocationStore, RevocationStore};
use crate::services::token::{TokenIssuer, TokenVerifier};

use super::mocks::{test_config, FailingRevocationStore};

fn build_verifier() -> (TokenIssuer, TokenVerifier<InMemoryRevocationStore>, Arc<InMemoryRevocationStore>) {
    let config = test_config();
    let store = Arc::new(InMemoryRevocationStore::new());
    let issuer = TokenIssuer::new(config.clone());
    let verifier = TokenVerifier::new(&config, store.clone());
    (issuer, verifier, store)
}

/// Signs claims with the test secret outside the issuer, for cases the
/// issuer refuses to produce (already-expired tokens, foreign algorithms)
fn encode_with(claims: &Claims, algorithm: Algorithm, secret: &str) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_verify_rejects_garbage() {
    let (_, verifier, _) = build_verifier();

    let result = verifier.verify("not-a-token", TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Malformed))
    ));
}

#[tokio::test]
async fn test_verify_rejects_tampered_payload() {
    let (issuer, verifier, _) = build_verifier();

    let (token, _) = issuer.issue_access_token("alice", &[]).unwrap();
    let (other, _) = issuer.issue_access_token("mallory", &[]).unwrap();

    // Splice mallory's payload into alice's token; the signature no longer
    // covers the payload
    let victim: Vec<&str> = token.split('.').collect();
    let donor: Vec<&str> = other.split('.').collect();
    let tampered = format!("{}.{}.{}", victim[0], donor[1], victim[2]);

    let result = verifier.verify(&tampered, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[tokio::test]
async fn test_verify_rejects_foreign_secret() {
    let (_, verifier, _) = build_verifier();

    let claims = Claims::new_access_token("alice", Vec::new(), &test_config());
    let token = encode_with(&claims, Algorithm::HS256, "some-other-secret");

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[tokio::test]
async fn test_verify_rejects_algorithm_downgrade() {
    let (_, verifier, _) = build_verifier();

    // Same secret, different algorithm than the verifier pins
    let claims = Claims::new_access_token("alice", Vec::new(), &test_config());
    let token = encode_with(&claims, Algorithm::HS384, "unit-test-secret");

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::UnsupportedAlgorithm))
    ));
}

#[tokio::test]
async fn test_verify_rejects_unsigned_token() {
    let (issuer, verifier, _) = build_verifier();

    let (token, _) = issuer.issue_access_token("alice", &[]).unwrap();
    let payload = token.split('.').nth(1).unwrap();

    // Header is base64url for {"alg":"none","typ":"JWT"}, empty signature
    let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);

    let result = verifier.verify(&unsigned, TokenUse::Access).await;

    assert!(matches!(result, Err(DomainError::Token(_))));
}

#[tokio::test]
async fn test_verify_rejects_expired_token() {
    let (_, verifier, _) = build_verifier();

    let mut claims = Claims::new_access_token("alice", Vec::new(), &test_config());
    claims.iat -= 600;
    claims.nbf -= 600;
    claims.exp = Utc::now().timestamp() - 60;
    let token = encode_with(&claims, Algorithm::HS256, "unit-test-secret");

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Expired))
    ));
}

#[tokio::test]
async fn test_verify_expiry_boundary_is_expired() {
    let (_, verifier, _) = build_verifier();

    // A token whose expiration instant is now must already be rejected
    let mut claims = Claims::new_access_token("alice", Vec::new(), &test_config());
    claims.exp = Utc::now().timestamp();
    let token = encode_with(&claims, Algorithm::HS256, "unit-test-secret");

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Expired))
    ));
}

#[tokio::test]
async fn test_verify_rejects_token_not_yet_valid() {
    let (_, verifier, _) = build_verifier();

    let mut claims = Claims::new_access_token("alice", Vec::new(), &test_config());
    claims.nbf = Utc::now().timestamp() + 3600;
    claims.exp = Utc::now().timestamp() + 7200;
    let token = encode_with(&claims, Algorithm::HS256, "unit-test-secret");

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NotYetValid))
    ));
}

#[tokio::test]
async fn test_verify_rejects_wrong_token_use() {
    let (issuer, verifier, _) = build_verifier();

    let pair = issuer.issue_tokens("alice", &[]).unwrap();

    // A refresh token must never pass as an access token, nor the reverse
    let result = verifier.verify(&pair.refresh_token, TokenUse::Access).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::WrongTokenUse))
    ));

    let result = verifier.verify(&pair.access_token, TokenUse::Refresh).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::WrongTokenUse))
    ));
}

#[tokio::test]
async fn test_verify_rejects_revoked_token() {
    let (issuer, verifier, store) = build_verifier();

    let (token, claims) = issuer.issue_access_token("alice", &[]).unwrap();
    store.revoke(&claims.jti, claims.expires_at()).await.unwrap();

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Revoked))
    ));
}

#[tokio::test]
async fn test_verify_fails_closed_when_store_is_down() {
    let config = test_config();
    let issuer = TokenIssuer::new(config.clone());
    let verifier = TokenVerifier::new(&config, Arc::new(FailingRevocationStore));

    // The token is otherwise perfectly valid
    let (token, _) = issuer.issue_access_token("alice", &[]).unwrap();

    let result = verifier.verify(&token, TokenUse::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RevocationStoreUnavailable))
    ));
}

#[tokio::test]
async fn test_decode_skips_revocation_lookup() {
    let config = test_config();
    let issuer = TokenIssuer::new(config.clone());
    let verifier = TokenVerifier::new(&config, Arc::new(FailingRevocationStore));

    let (token, _) = issuer.issue_access_token("alice", &[]).unwrap();

    // decode checks signature and expiry only
    let claims = verifier.decode(&token).unwrap();
    assert_eq!(claims.sub, "alice");
}
