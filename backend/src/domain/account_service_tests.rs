//! Tests for the account service.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockCredentialHasher, MockTokenCodec, MockUserRepository, StoredCredentials, TokenCodecError,
};
use crate::domain::test_fixtures::{clock_at, fixture_clock, fixture_timestamp, user};
use crate::domain::ErrorCode;

type Service = AccountService<MockUserRepository, MockCredentialHasher>;

fn make_service(
    users: MockUserRepository,
    hasher: MockCredentialHasher,
    tokens: MockTokenCodec,
) -> Service {
    AccountService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(tokens),
        fixture_clock(),
    )
}

fn signing_codec() -> MockTokenCodec {
    let mut tokens = MockTokenCodec::new();
    tokens
        .expect_issue()
        .returning(|claims| Ok(format!("token-for-{}", claims.user_id)));
    tokens
}

fn registration() -> Registration {
    Registration::try_from_parts("ada", "ada@example.com", "analytical engine")
        .expect("valid registration")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("ada@example.com", password).expect("valid credentials")
}

#[tokio::test]
async fn register_hashes_password_and_seeds_default_workspace() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_register_account()
        .withf(|account| {
            account.password_hash == "hashed:analytical engine"
                && account.workspace.name() == "ada Workspace"
                && account.workspace.description() == "Default workspace"
                && account.project.name == "My First Project"
                && account.project.color == "#3B82F6"
        })
        .times(1)
        .return_once(|_| Ok(user(1, "ada")));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|password| Ok(format!("hashed:{password}")));

    let service = make_service(users, hasher, signing_codec());
    let session = service.register(&registration()).await.expect("registered");

    assert_eq!(session.token, "token-for-1");
    assert_eq!(session.user.username.as_ref(), "ada");
}

#[tokio::test]
async fn register_rejects_existing_email_before_hashing() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(user(1, "ada"))));
    users.expect_register_account().never();
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().never();

    let service = make_service(users, hasher, MockTokenCodec::new());
    let err = service.register(&registration()).await.expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("duplicate_email")
    );
}

#[tokio::test]
async fn register_maps_lost_insert_race_to_duplicate_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_register_account()
        .return_once(|_| Err(UserRepositoryError::duplicate_email("ada@example.com")));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().returning(|_| Ok("hash".to_owned()));

    let service = make_service(users, hasher, MockTokenCodec::new());
    let err = service.register(&registration()).await.expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_surfaces_store_outage() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserRepositoryError::connection("pool exhausted")));

    let service = make_service(users, MockCredentialHasher::new(), MockTokenCodec::new());
    let err = service.register(&registration()).await.expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case::unknown_email(None, 1, 0)]
#[case::wrong_password(Some("stored-hash"), 0, 1)]
#[tokio::test]
async fn login_failures_are_indistinguishable(
    #[case] stored_hash: Option<&'static str>,
    #[case] hashes: usize,
    #[case] verifies: usize,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(move |_| {
        Ok(stored_hash.map(|hash| StoredCredentials {
            user: user(1, "ada"),
            password_hash: hash.to_owned(),
        }))
    });
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "wrong")
        .times(hashes)
        .returning(|_| Ok("decoy".to_owned()));
    hasher
        .expect_verify()
        .times(verifies)
        .returning(|_, _| Ok(false));

    let service = make_service(users, hasher, MockTokenCodec::new());
    let err = service.login(&credentials("wrong")).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[tokio::test]
async fn unknown_email_ignores_decoy_hash_failure() {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(|_| Ok(None));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Err(CredentialHasherError::hashing("worker pool gone")));

    let service = make_service(users, hasher, MockTokenCodec::new());
    let err = service.login(&credentials("wrong")).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[tokio::test]
async fn login_issues_token_for_matching_password() {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(|_| {
        Ok(Some(StoredCredentials {
            user: user(4, "ada"),
            password_hash: "stored-hash".to_owned(),
        }))
    });
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_verify()
        .withf(|password, hash| password == "analytical engine" && hash == "stored-hash")
        .returning(|_, _| Ok(true));

    let service = make_service(users, hasher, signing_codec());
    let session = service
        .login(&credentials("analytical engine"))
        .await
        .expect("login");

    assert_eq!(session.token, "token-for-4");
}

#[rstest]
fn verify_token_collapses_codec_failures() {
    let mut tokens = MockTokenCodec::new();
    tokens
        .expect_decode()
        .returning(|_| Err(TokenCodecError::bad_signature()));
    let service = make_service(
        MockUserRepository::new(),
        MockCredentialHasher::new(),
        tokens,
    );

    let err = service.verify_token("forged").expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_TOKEN);
}

#[rstest]
#[case::fresh(Duration::days(6), true)]
#[case::expired(Duration::days(7), false)]
fn verify_token_enforces_expiry(#[case] age: Duration, #[case] accepted: bool) {
    let issued = SessionClaims::for_user(&user(1, "ada"), fixture_timestamp());
    let mut tokens = MockTokenCodec::new();
    tokens
        .expect_decode()
        .returning(move |_| Ok(issued.clone()));
    let service = AccountService::new(
        Arc::new(MockUserRepository::new()),
        Arc::new(MockCredentialHasher::new()),
        Arc::new(tokens),
        clock_at(fixture_timestamp() + age),
    );

    assert_eq!(service.verify_token("token").is_ok(), accepted);
}

#[tokio::test]
async fn current_user_rejects_deleted_account() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(users, MockCredentialHasher::new(), MockTokenCodec::new());

    let err = service
        .current_user(UserId::new(99))
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
