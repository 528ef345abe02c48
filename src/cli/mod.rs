use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, MemoQuery};
use crate::domain::{format_cents, parse_cents, MemoPatch, NewMemo, SortKey, StatsPeriod};

/// Memobook - Sales Memo Ledger
#[derive(Parser)]
#[command(name = "memobook")]
#[command(about = "A local-first sales memo ledger for small shops")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "memobook.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a new sales memo
    Add {
        /// Client name
        client: String,

        /// Item sold
        item: String,

        /// Number of units
        #[arg(short = 'n', long, default_value = "1")]
        count: i64,

        /// Unit price (e.g., "250" or "250.50")
        #[arg(short, long)]
        price: String,

        /// Amount received
        #[arg(long, default_value = "0")]
        paid: String,

        /// Date of the sale (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Total price; computed as count * price when omitted
        #[arg(long)]
        total: Option<String>,

        /// Amount due; computed as total - paid when omitted
        #[arg(long)]
        due: Option<String>,

        /// Reference to an externally stored memo image
        #[arg(long)]
        image_url: Option<String>,
    },

    /// List memos
    List {
        /// Maximum number of memos to show
        #[arg(short, long, default_value = "50")]
        limit: i64,

        /// Number of memos to skip
        #[arg(short, long, default_value = "0")]
        offset: i64,

        /// Sort key: created_at or date (always newest first)
        #[arg(long, default_value = "created_at")]
        sort_by: String,

        /// Case-insensitive search over client and item names
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Update fields of an existing memo
    Update {
        /// Memo id
        id: i64,

        /// New client name
        #[arg(long)]
        client: Option<String>,

        /// New item name
        #[arg(long)]
        item: Option<String>,

        /// New unit count
        #[arg(long)]
        count: Option<i64>,

        /// New unit price
        #[arg(long)]
        price: Option<String>,

        /// New total price
        #[arg(long)]
        total: Option<String>,

        /// New paid amount
        #[arg(long)]
        paid: Option<String>,

        /// New due amount
        #[arg(long)]
        due: Option<String>,

        /// New sale date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New memo image reference
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete a memo
    Delete {
        /// Memo id
        id: i64,
    },

    /// Show sales statistics
    Stats {
        /// Period: day, week, month, year (ignored when --from and --to are both given)
        #[arg(long, default_value = "week")]
        period: String,

        /// Explicit range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Explicit range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export the ledger to CSV or JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// Import memos from CSV
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                client,
                item,
                count,
                price,
                paid,
                date,
                total,
                due,
                image_url,
            } => {
                let service = LedgerService::connect(&self.database).await?;

                let item_price =
                    parse_cents(&price).context("Invalid price format. Use '250.00' or '250'")?;
                let paid = parse_cents(&paid).context("Invalid paid amount")?;

                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Utc::now().date_naive(),
                };

                // The service stores totals as handed to it; the CLI does the
                // arithmetic unless the caller overrides it.
                let total_price = match total {
                    Some(t) => parse_cents(&t).context("Invalid total amount")?,
                    None => count * item_price,
                };
                let due = match due {
                    Some(d) => parse_cents(&d).context("Invalid due amount")?,
                    None => total_price - paid,
                };

                let memo = service
                    .create_memo(NewMemo {
                        date,
                        client_name: client,
                        item_name: item,
                        item_count: count,
                        item_price,
                        total_price,
                        paid,
                        due,
                        memo_image_url: image_url,
                    })
                    .await?;

                println!(
                    "Recorded memo #{}: {} x{} for {} (total {}, due {})",
                    memo.id,
                    memo.item_name,
                    memo.item_count,
                    memo.client_name,
                    format_cents(memo.total_price),
                    format_cents(memo.due)
                );
            }

            Commands::List {
                limit,
                offset,
                sort_by,
                search,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let query = MemoQuery {
                    limit: Some(limit),
                    offset: Some(offset),
                    sort_by: SortKey::from_str(&sort_by).unwrap_or_default(),
                    search,
                };
                run_list_command(&service, query).await?;
            }

            Commands::Update {
                id,
                client,
                item,
                count,
                price,
                total,
                paid,
                due,
                date,
                image_url,
            } => {
                let service = LedgerService::connect(&self.database).await?;

                let patch = MemoPatch {
                    date: date.as_deref().map(parse_date).transpose()?,
                    client_name: client,
                    item_name: item,
                    item_count: count,
                    item_price: parse_money_opt(price, "price")?,
                    total_price: parse_money_opt(total, "total")?,
                    paid: parse_money_opt(paid, "paid")?,
                    due: parse_money_opt(due, "due")?,
                    memo_image_url: image_url,
                };

                let memo = service.update_memo(id, patch).await?;
                println!(
                    "Updated memo #{}: {} x{} for {} (total {}, due {})",
                    memo.id,
                    memo.item_name,
                    memo.item_count,
                    memo.client_name,
                    format_cents(memo.total_price),
                    format_cents(memo.due)
                );
            }

            Commands::Delete { id } => {
                let service = LedgerService::connect(&self.database).await?;
                service.delete_memo(id).await?;
                println!("Deleted memo #{}", id);
            }

            Commands::Stats {
                period,
                from,
                to,
                format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let period = StatsPeriod::from_str(&period).unwrap_or_default();
                let from = from.as_deref().map(parse_date).transpose()?;
                let to = to.as_deref().map(parse_date).transpose()?;

                let stats = service.sales_stats(period, from, to).await?;

                match format.as_str() {
                    "json" => {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    }
                    _ => {
                        println!("Sales Statistics");
                        println!("  Total sales:    {}", format_cents(stats.total_sales));
                        println!("  Cash available: {}", format_cents(stats.cash_available));
                        println!("  Total due:      {}", format_cents(stats.total_due));
                        println!();
                        if stats.period_sales.is_empty() {
                            println!("No sales in the selected range.");
                        } else {
                            println!(
                                "{:<12} {:>12} {:>12} {:>12}",
                                "DATE", "SALES", "PAID", "DUE"
                            );
                            println!("{}", "-".repeat(51));
                            for bucket in &stats.period_sales {
                                println!(
                                    "{:<12} {:>12} {:>12} {:>12}",
                                    bucket.period.to_string(),
                                    format_cents(bucket.sales),
                                    format_cents(bucket.paid),
                                    format_cents(bucket.due)
                                );
                            }
                        }
                    }
                }
            }

            Commands::Export { output, format } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, output.as_deref(), &format).await?;
            }

            Commands::Import { input, dry_run } => {
                let service = LedgerService::connect(&self.database).await?;
                run_import_command(&service, input.as_deref(), dry_run).await?;
            }
        }

        Ok(())
    }
}

async fn run_list_command(service: &LedgerService, query: MemoQuery) -> Result<()> {
    let page = service.list_memos(query).await?;

    if page.memos.is_empty() {
        println!("No memos found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<20} {:<20} {:>5} {:>12} {:>12} {:>12}",
        "ID", "DATE", "CLIENT", "ITEM", "QTY", "TOTAL", "PAID", "DUE"
    );
    println!("{}", "-".repeat(105));
    for memo in &page.memos {
        println!(
            "{:<6} {:<12} {:<20} {:<20} {:>5} {:>12} {:>12} {:>12}",
            memo.id,
            memo.date.to_string(),
            memo.client_name,
            memo.item_name,
            memo.item_count,
            format_cents(memo.total_price),
            format_cents(memo.paid),
            format_cents(memo.due)
        );
    }
    println!();
    println!("Showing {} of {} memo(s)", page.memos.len(), page.total);

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_memos_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} memo(s)", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported ledger snapshot: {} memo(s)", snapshot.memos.len());
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &LedgerService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let importer = Importer::new(service);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = importer
        .import_memos_csv(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Dry run complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!();
        println!("Errors:");
        for error in result.errors.iter().take(10) {
            let field = error
                .field
                .as_ref()
                .map(|f| format!("{}: ", f))
                .unwrap_or_default();
            println!("  Line {}: {}{}", error.line, field, error.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more error(s)", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn parse_money_opt(value: Option<String>, what: &str) -> Result<Option<i64>> {
    value
        .map(|v| parse_cents(&v))
        .transpose()
        .with_context(|| format!("Invalid {} amount. Use '250.00' or '250'", what))
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}
