//! Favoritos y valoraciones: toggle, lista personal y moderación.

mod common;

use common::*;
use uuid::Uuid;
use vehicle_marketplace::services::favorite_service::FavoriteService;
use vehicle_marketplace::services::review_service::ReviewService;
use vehicle_marketplace::utils::errors::AppError;

#[tokio::test]
#[ignore]
async fn toggle_marks_and_unmarks_the_vehicle() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let user = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = FavoriteService::new(pool.clone());

    let favorited = service.toggle(user.id, vehicle.id).await.unwrap();
    assert!(favorited);
    assert!(service.is_favorite(user.id, vehicle.id).await.unwrap());

    let mine = service.my_favorites(user.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, vehicle.id);

    let favorited = service.toggle(user.id, vehicle.id).await.unwrap();
    assert!(!favorited);
    assert!(!service.is_favorite(user.id, vehicle.id).await.unwrap());
    assert!(service.my_favorites(user.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn toggle_on_unknown_vehicle_is_not_found() {
    let pool = setup_pool().await;
    let user = create_user(&pool).await;

    let service = FavoriteService::new(pool.clone());
    let err = service.toggle(user.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn review_rating_and_comment_are_validated() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let reviewer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReviewService::new(pool.clone());

    let err = service
        .add_review(vehicle.id, reviewer.id, 0, "muy malo")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = service
        .add_review(vehicle.id, reviewer.id, 6, "excelente")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = service
        .add_review(vehicle.id, reviewer.id, 4, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
#[ignore]
async fn seller_cannot_review_own_listing() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReviewService::new(pool.clone());
    let err = service
        .add_review(vehicle.id, seller.id, 5, "una joya")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
#[ignore]
async fn review_is_published_only_after_moderation() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let reviewer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReviewService::new(pool.clone());
    let review = service
        .add_review(vehicle.id, reviewer.id, 4, "Buen estado general")
        .await
        .unwrap();
    assert!(!review.is_approved);

    // Sin aprobar no aparece en la ficha pública
    assert!(service.reviews_of(vehicle.id).await.unwrap().is_empty());

    let approved = service.moderate(review.id, true).await.unwrap();
    assert!(approved.is_approved);

    let published = service.reviews_of(vehicle.id).await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, review.id);

    let err = service.moderate(Uuid::new_v4(), true).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn resubmitted_review_returns_to_moderation() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let reviewer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReviewService::new(pool.clone());
    let review = service
        .add_review(vehicle.id, reviewer.id, 5, "Impecable")
        .await
        .unwrap();
    service.moderate(review.id, true).await.unwrap();
    assert_eq!(service.reviews_of(vehicle.id).await.unwrap().len(), 1);

    // El reenvío pisa la valoración anterior y vuelve a quedar pendiente
    let resubmitted = service
        .add_review(vehicle.id, reviewer.id, 2, "Apareció óxido a la semana")
        .await
        .unwrap();
    assert_eq!(resubmitted.id, review.id);
    assert_eq!(resubmitted.rating, 2);
    assert!(!resubmitted.is_approved);
    assert!(service.reviews_of(vehicle.id).await.unwrap().is_empty());
}
