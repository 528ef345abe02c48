mod common;

use anyhow::Result;
use common::{date, memo_with_amounts, sample_memo, test_service};
use memobook::application::AppError;
use memobook::domain::MemoPatch;

#[tokio::test]
async fn test_create_assigns_id_and_created_at() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(sample_memo("Rahim Traders", "Gold ring", "2024-01-05"))
        .await?;

    assert!(memo.id >= 1);
    assert_eq!(memo.client_name, "Rahim Traders");
    assert_eq!(memo.item_name, "Gold ring");
    assert_eq!(memo.date, date("2024-01-05"));

    Ok(())
}

#[tokio::test]
async fn test_sequential_creates_have_unique_ids_and_ordered_timestamps() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut ids = Vec::new();
    let mut timestamps = Vec::new();
    for i in 0..5 {
        let memo = service
            .create_memo(sample_memo(&format!("Client {}", i), "Item", "2024-01-05"))
            .await?;
        ids.push(memo.id);
        timestamps.push(memo.created_at);
    }

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len(), "ids must be unique");

    for pair in timestamps.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "created_at must be monotonically non-decreasing"
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_blank_names_and_bad_counts() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut memo = sample_memo("", "Item", "2024-01-05");
    assert!(matches!(
        service.create_memo(memo).await,
        Err(AppError::Validation(_))
    ));

    memo = sample_memo("Client", "   ", "2024-01-05");
    assert!(matches!(
        service.create_memo(memo).await,
        Err(AppError::Validation(_))
    ));

    memo = sample_memo("Client", "Item", "2024-01-05");
    memo.item_count = 0;
    assert!(matches!(
        service.create_memo(memo).await,
        Err(AppError::Validation(_))
    ));

    memo = sample_memo("Client", "Item", "2024-01-05");
    memo.item_price = -100;
    assert!(matches!(
        service.create_memo(memo).await,
        Err(AppError::Validation(_))
    ));

    memo = sample_memo("Client", "Item", "2024-01-05");
    memo.paid = -1;
    assert!(matches!(
        service.create_memo(memo).await,
        Err(AppError::Validation(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_create_stores_caller_supplied_totals_verbatim() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // 3 x 100 with total 999 and due 1: arithmetically wrong, stored anyway.
    // The caller owns the arithmetic; the service never recomputes it.
    let mut memo = sample_memo("Client", "Item", "2024-01-05");
    memo.item_count = 3;
    memo.item_price = 100;
    memo.total_price = 999;
    memo.paid = 500;
    memo.due = 1;

    let stored = service.create_memo(memo).await?;
    assert_eq!(stored.total_price, 999);
    assert_eq!(stored.due, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_applies_only_supplied_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(memo_with_amounts("2024-01-05", 10000, 4000, 6000))
        .await?;

    let updated = service
        .update_memo(
            memo.id,
            MemoPatch {
                paid: Some(10000),
                due: Some(0),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.paid, 10000);
    assert_eq!(updated.due, 0);
    // Untouched fields keep their stored value
    assert_eq!(updated.client_name, memo.client_name);
    assert_eq!(updated.total_price, memo.total_price);
    assert_eq!(updated.date, memo.date);
    assert_eq!(updated.created_at, memo.created_at);
    assert_eq!(updated.id, memo.id);

    Ok(())
}

#[tokio::test]
async fn test_update_with_empty_patch_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(sample_memo("Client", "Item", "2024-01-05"))
        .await?;

    let result = service.update_memo(memo.id, MemoPatch::default()).await;
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));

    Ok(())
}

#[tokio::test]
async fn test_update_of_missing_memo_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .update_memo(
            9999,
            MemoPatch {
                paid: Some(100),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::MemoNotFound(9999))));

    Ok(())
}

#[tokio::test]
async fn test_update_values_are_not_revalidated() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(sample_memo("Client", "Item", "2024-01-05"))
        .await?;

    // Create would reject a zero count, but update applies it verbatim
    let updated = service
        .update_memo(
            memo.id,
            MemoPatch {
                item_count: Some(0),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.item_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(sample_memo("Client", "Item", "2024-01-05"))
        .await?;

    service.delete_memo(memo.id).await?;
    // Second delete of the same id never raises
    service.delete_memo(memo.id).await?;
    // Neither does deleting an id that never existed
    service.delete_memo(424242).await?;

    let page = service.list_memos(Default::default()).await?;
    assert_eq!(page.total, 0);

    Ok(())
}

#[tokio::test]
async fn test_deleted_memo_cannot_be_updated() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(sample_memo("Client", "Item", "2024-01-05"))
        .await?;
    service.delete_memo(memo.id).await?;

    let result = service
        .update_memo(
            memo.id,
            MemoPatch {
                paid: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::MemoNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_memo_image_url_lifecycle() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let memo = service
        .create_memo(
            sample_memo("Client", "Item", "2024-01-05")
                .with_image_url("https://example.com/memo-1.jpg"),
        )
        .await?;
    assert_eq!(
        memo.memo_image_url.as_deref(),
        Some("https://example.com/memo-1.jpg")
    );

    let updated = service
        .update_memo(
            memo.id,
            MemoPatch {
                memo_image_url: Some("https://example.com/memo-2.jpg".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(
        updated.memo_image_url.as_deref(),
        Some("https://example.com/memo-2.jpg")
    );

    Ok(())
}
