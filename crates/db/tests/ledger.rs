//! Integration tests for the token ledger service.
//!
//! Exercises the reservation CAS against a real database: deduction and
//! cooldown arming, business-rule refusals, and the single-winner guarantee
//! under concurrent attempts.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use mural_core::error::CoreError;
use mural_core::ledger::COOLDOWN_SECS;
use mural_core::types::DbId;
use mural_db::models::user::User;
use mural_db::repositories::UserRepo;
use mural_db::services::ledger::TokenLedger;
use mural_db::services::ServiceError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, subject: &str) -> User {
    UserRepo::find_or_create(pool, subject, "Test User")
        .await
        .unwrap()
}

async fn set_tokens(pool: &PgPool, id: DbId, tokens: i32) {
    sqlx::query("UPDATE users SET tokens_current = $2 WHERE id = $1")
        .bind(id)
        .bind(tokens)
        .execute(pool)
        .await
        .unwrap();
}

async fn set_cooldown_elapsed(pool: &PgPool, id: DbId) {
    sqlx::query("UPDATE users SET cooldown_until = NOW() - INTERVAL '1 second' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Reservation basics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_deducts_and_arms_cooldown(pool: PgPool) {
    let user = seed_user(&pool, "ledger-basic").await;
    let before = Utc::now();

    let updated = TokenLedger::reserve(&pool, user.id, "flux-dev").await.unwrap();

    assert_eq!(updated.tokens_current, user.tokens_current - 3);
    assert_eq!(updated.total_generations, 1);
    let until = updated.cooldown_until.unwrap();
    assert!(until >= before + Duration::seconds(COOLDOWN_SECS));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_rejects_unknown_model_before_mutation(pool: PgPool) {
    let user = seed_user(&pool, "ledger-unknown-model").await;

    let err = TokenLedger::reserve(&pool, user.id, "dall-e-2").await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::UnsupportedModel(_)));

    let after = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.tokens_current, user.tokens_current);
    assert_eq!(after.total_generations, 0);
    assert!(after.cooldown_until.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_fails_for_missing_user(pool: PgPool) {
    let err = TokenLedger::reserve(&pool, 999_999, "flux-schnell")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { entity: "User", .. }));
}

// ---------------------------------------------------------------------------
// Cooldown enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn immediate_second_reserve_hits_cooldown(pool: PgPool) {
    let user = seed_user(&pool, "ledger-cooldown").await;

    TokenLedger::reserve(&pool, user.id, "flux-schnell").await.unwrap();
    let err = TokenLedger::reserve(&pool, user.id, "flux-schnell")
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ServiceError::Core(CoreError::CooldownActive { remaining_secs }) if remaining_secs >= 1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_succeeds_after_cooldown_elapses(pool: PgPool) {
    let user = seed_user(&pool, "ledger-cooldown-elapsed").await;

    TokenLedger::reserve(&pool, user.id, "flux-schnell").await.unwrap();
    set_cooldown_elapsed(&pool, user.id).await;

    let updated = TokenLedger::reserve(&pool, user.id, "flux-schnell")
        .await
        .unwrap();
    assert_eq!(updated.total_generations, 2);
}

// ---------------------------------------------------------------------------
// Balance enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_refuses_insufficient_balance(pool: PgPool) {
    let user = seed_user(&pool, "ledger-broke").await;
    set_tokens(&pool, user.id, 2).await;

    let err = TokenLedger::reserve(&pool, user.id, "flux-dev").await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::Core(CoreError::InsufficientTokens {
            required: 3,
            available: 2
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exact_balance_drains_to_zero(pool: PgPool) {
    let user = seed_user(&pool, "ledger-exact").await;
    set_tokens(&pool, user.id, 1).await;

    let updated = TokenLedger::reserve(&pool, user.id, "flux-schnell")
        .await
        .unwrap();
    assert_eq!(updated.tokens_current, 0);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// With a balance of exactly one generation's cost, N concurrent attempts
/// produce exactly one winner; every loser gets a deterministic business
/// refusal (the winner armed the cooldown) or the transient contention
/// error. The final balance is zero and exactly one generation was counted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_reserves_have_single_winner(pool: PgPool) {
    let user = seed_user(&pool, "ledger-race").await;
    set_tokens(&pool, user.id, 1).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        let user_id = user.id;
        handles.push(tokio::spawn(async move {
            TokenLedger::reserve(&pool, user_id, "flux-schnell").await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(updated) => {
                successes += 1;
                assert_eq!(updated.tokens_current, 0);
            }
            Err(ServiceError::Core(
                CoreError::CooldownActive { .. }
                | CoreError::InsufficientTokens { .. }
                | CoreError::Contention { .. },
            )) => {}
            Err(other) => panic!("unexpected reservation error: {other}"),
        }
    }
    assert_eq!(successes, 1);

    let after = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.tokens_current, 0);
    assert_eq!(after.total_generations, 1);
}
