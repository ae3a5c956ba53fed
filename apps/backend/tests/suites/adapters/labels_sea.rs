use recipe_api::adapters::{ingredients_sea, tags_sea};
use recipe_api::db::txn::with_txn;
use recipe_api::entities::{ingredients, tags};
use recipe_api::error::AppError;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::support::build_test_state;
use crate::support::factory::create_test_user;

/// A lookup miss followed by an insert that loses to a concurrent writer:
/// the conflicting insert affects no rows and the existing tag comes back.
#[tokio::test]
async fn test_tag_insert_after_concurrent_winner_rereads_existing() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let user = create_test_user(txn, "cook").await?;

            let (winner, inserted) = tags_sea::insert_or_reread(txn, user.id, "Brunch").await?;
            assert!(inserted);

            let (loser, inserted) = tags_sea::insert_or_reread(txn, user.id, "Brunch").await?;
            assert!(!inserted, "conflicting insert must not report a new row");
            assert_eq!(loser, winner);

            let stored = tags::Entity::find()
                .filter(tags::Column::UserId.eq(user.id))
                .count(txn)
                .await?;
            assert_eq!(stored, 1);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn test_ingredient_insert_after_concurrent_winner_rereads_existing() -> Result<(), AppError>
{
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let user = create_test_user(txn, "cook").await?;

            let (winner, inserted) = ingredients_sea::ensure_by_name(txn, user.id, "Salt").await?;
            assert!(inserted);

            let (loser, inserted) =
                ingredients_sea::insert_or_reread(txn, user.id, "Salt").await?;
            assert!(!inserted, "conflicting insert must not report a new row");
            assert_eq!(loser, winner);

            let stored = ingredients::Entity::find()
                .filter(ingredients::Column::UserId.eq(user.id))
                .count(txn)
                .await?;
            assert_eq!(stored, 1);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn test_insert_or_reread_is_scoped_to_owner() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let cook = create_test_user(txn, "cook").await?;
            let other = create_test_user(txn, "other").await?;

            let (mine, _) = tags_sea::insert_or_reread(txn, cook.id, "Vegan").await?;
            let (theirs, inserted) = tags_sea::insert_or_reread(txn, other.id, "Vegan").await?;
            assert!(inserted);
            assert_ne!(mine.id, theirs.id);
            assert_eq!(theirs.user_id, other.id);

            Ok::<_, AppError>(())
        })
    })
    .await
}
