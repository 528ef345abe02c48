mod common;

use anyhow::Result;
use common::{memo_with_amounts, sample_memo, test_service};
use memobook::io::{Exporter, ImportOptions, Importer, LedgerSnapshot};

#[tokio::test]
async fn test_csv_export_then_import_round_trips() -> Result<()> {
    let (source, _temp1) = test_service().await?;

    source
        .create_memo(sample_memo("Rahim Traders", "Gold ring", "2024-01-05"))
        .await?;
    source
        .create_memo(memo_with_amounts("2024-01-06", 5000, 2000, 3000))
        .await?;

    let mut buffer = Vec::new();
    let exported = Exporter::new(&source).export_memos_csv(&mut buffer).await?;
    assert_eq!(exported, 2);

    let (target, _temp2) = test_service().await?;
    let result = Importer::new(&target)
        .import_memos_csv(buffer.as_slice(), ImportOptions::default())
        .await?;

    assert_eq!(result.imported, 2);
    assert!(result.errors.is_empty());

    let memos = target.list_all_memos().await?;
    assert_eq!(memos.len(), 2);
    assert_eq!(memos[0].client_name, "Rahim Traders");
    assert_eq!(memos[1].total_price, 5000);
    assert_eq!(memos[1].paid, 2000);
    assert_eq!(memos[1].due, 3000);

    Ok(())
}

#[tokio::test]
async fn test_dry_run_import_writes_nothing() -> Result<()> {
    let (source, _temp1) = test_service().await?;
    source
        .create_memo(sample_memo("Client", "Item", "2024-01-05"))
        .await?;

    let mut buffer = Vec::new();
    Exporter::new(&source).export_memos_csv(&mut buffer).await?;

    let (target, _temp2) = test_service().await?;
    let result = Importer::new(&target)
        .import_memos_csv(buffer.as_slice(), ImportOptions { dry_run: true })
        .await?;

    assert_eq!(result.imported, 1);
    assert!(target.list_all_memos().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_import_reports_bad_rows_and_keeps_good_ones() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let csv = "\
id,date,client_name,item_name,item_count,item_price,total_price,paid,due,memo_image_url,created_at
1,2024-01-05,Rahim Traders,Gold ring,1,100.00,100.00,100.00,0.00,,
2,not-a-date,Karim,Chain,1,50.00,50.00,50.00,0.00,,
3,2024-01-07,,Bangle,1,50.00,50.00,50.00,0.00,,
";

    let result = Importer::new(&service)
        .import_memos_csv(csv.as_bytes(), ImportOptions::default())
        .await?;

    // Row 2 has a bad date, row 3 fails create validation (blank client)
    assert_eq!(result.imported, 1);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].line, 3);
    assert_eq!(result.errors[0].field.as_deref(), Some("date"));
    assert_eq!(result.errors[1].line, 4);

    let memos = service.list_all_memos().await?;
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].client_name, "Rahim Traders");

    Ok(())
}

#[tokio::test]
async fn test_json_snapshot_export() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_memo(memo_with_amounts("2024-01-05", 1000, 400, 600))
        .await?;

    let mut buffer = Vec::new();
    let snapshot = Exporter::new(&service).export_full_json(&mut buffer).await?;
    assert_eq!(snapshot.memos.len(), 1);

    let parsed: LedgerSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed.memos.len(), 1);
    assert_eq!(parsed.memos[0].total_price, 1000);
    assert_eq!(parsed.memos[0].due, 600);

    Ok(())
}
