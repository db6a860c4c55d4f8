use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use sportres_client::catalog::CatalogBrowser;
use sportres_client::config::Config;
use sportres_client::format::{format_date, format_idr, format_time};
use sportres_client::models::{Activity, Transaction, TransactionStatus};
use sportres_client::proof::read_proof_file;
use sportres_client::transactions::{TransactionManager, TransactionScope};
use sportres_client::{ApiClient, Session};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|e| format!("Configuration error: {}", e))?;

    let session = Session::new();
    let client = ApiClient::new(config.api_base_url.clone(), session.clone());

    if let (Some(email), Some(password)) = (&config.email, &config.password) {
        match client.login(email, password).await {
            Ok(profile) => println!("Logged in as {} ({})", profile.name, profile.role),
            Err(err) => eprintln!("Login failed: {}", err),
        }
    }

    let mut catalog = CatalogBrowser::new(client.clone(), config.per_page);
    catalog.refresh().await;
    print_catalog(&catalog);

    let mut ledger = TransactionManager::new(client.clone(), TransactionScope::Mine);

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        ledger.dismiss_expired_notification();
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "login" => match args.as_slice() {
                [email, password] => match client.login(email, password).await {
                    Ok(profile) => println!("Logged in as {} ({})", profile.name, profile.role),
                    Err(err) => eprintln!("Login failed: {}", err),
                },
                _ => eprintln!("Usage: login <email> <password>"),
            },
            "whoami" => match session.profile().await {
                Some(profile) => println!("{} <{}> role={}", profile.name, profile.email, profile.role),
                None => println!("Not logged in"),
            },
            "categories" | "activities" => print_catalog(&catalog),
            "next" => {
                match args.first().copied() {
                    Some("cat") => catalog.next_categories().await,
                    Some("act") => catalog.next_activities().await,
                    _ => eprintln!("Usage: next cat|act"),
                }
                print_catalog(&catalog);
            }
            "prev" => {
                match args.first().copied() {
                    Some("cat") => catalog.prev_categories().await,
                    Some("act") => catalog.prev_activities().await,
                    _ => eprintln!("Usage: prev cat|act"),
                }
                print_catalog(&catalog);
            }
            "filter" => match args.first().copied() {
                Some("all") => {
                    catalog.select_category(None).await;
                    print_catalog(&catalog);
                }
                Some(raw) => match raw.parse::<i64>() {
                    Ok(category_id) => {
                        catalog.select_category(Some(category_id)).await;
                        print_catalog(&catalog);
                    }
                    Err(_) => eprintln!("Usage: filter <category-id>|all"),
                },
                None => eprintln!("Usage: filter <category-id>|all"),
            },
            "detail" => match parse_id(&args) {
                Some(activity_id) => match catalog.activity_detail(activity_id).await {
                    Ok(activity) => print_activity_detail(&activity),
                    Err(err) => eprintln!("{}", err),
                },
                None => eprintln!("Usage: detail <activity-id>"),
            },
            "reserve" => match parse_id(&args) {
                Some(activity_id) => {
                    catalog.reserve(activity_id).await;
                    println!("Activity {} staged for payment", activity_id);
                }
                None => eprintln!("Usage: reserve <activity-id>"),
            },
            "staged" => match session.staged_reservation().await {
                Some(activity_id) => println!("Staged activity: {}", activity_id),
                None => println!("No reservation staged"),
            },
            "transactions" => {
                let scope = if args.first().copied() == Some("all") {
                    if !session.is_admin().await {
                        eprintln!("'transactions all' requires the admin role");
                        continue;
                    }
                    TransactionScope::All
                } else {
                    TransactionScope::Mine
                };
                if ledger.scope() != scope {
                    ledger = TransactionManager::new(client.clone(), scope);
                }
                ledger.refresh().await;
                print_transactions(&ledger);
            }
            "sort" => {
                ledger.sort_by_order_date();
                print_transactions(&ledger);
            }
            "cancel" => match parse_id(&args) {
                Some(transaction_id) => {
                    match ledger.cancel_request(transaction_id) {
                        Some(request) => ledger.cancel(request).await,
                        None => eprintln!("Transaction {} is not pending", transaction_id),
                    }
                    print_banner(&ledger);
                }
                None => eprintln!("Usage: cancel <transaction-id>"),
            },
            "proof" => match args.as_slice() {
                [raw_id, path] => match raw_id.parse::<i64>() {
                    Ok(transaction_id) => {
                        upload_proof(&mut ledger, transaction_id, Path::new(path)).await;
                        print_banner(&ledger);
                    }
                    Err(_) => eprintln!("Usage: proof <transaction-id> <image-file>"),
                },
                _ => eprintln!("Usage: proof <transaction-id> <image-file>"),
            },
            "override" => match args.as_slice() {
                [raw_id, raw_status] => {
                    if !session.is_admin().await {
                        eprintln!("'override' requires the admin role");
                        continue;
                    }
                    match raw_id.parse::<i64>() {
                        Ok(transaction_id) => {
                            let status = TransactionStatus::from_literal(raw_status);
                            match ledger.override_status(transaction_id, status).await {
                                Ok(()) => print_transactions(&ledger),
                                Err(err) => eprintln!("{}", err),
                            }
                        }
                        Err(_) => eprintln!("Usage: override <transaction-id> <status>"),
                    }
                }
                _ => eprintln!("Usage: override <transaction-id> <status>"),
            },
            "addcat" => {
                if !session.is_admin().await {
                    eprintln!("'addcat' requires the admin role");
                    continue;
                }
                let name = args.join(" ");
                match catalog.create_category(&name).await {
                    Ok(()) => print_catalog(&catalog),
                    Err(err) => eprintln!("{}", err),
                }
            }
            "delcat" => match parse_id(&args) {
                Some(category_id) => {
                    if !session.is_admin().await {
                        eprintln!("'delcat' requires the admin role");
                        continue;
                    }
                    match catalog.delete_category(category_id).await {
                        Ok(()) => print_catalog(&catalog),
                        Err(err) => eprintln!("{}", err),
                    }
                }
                None => eprintln!("Usage: delcat <category-id>"),
            },
            other => eprintln!("Unknown command '{}'; type 'help'", other),
        }
    }

    Ok(())
}

fn parse_id(args: &[&str]) -> Option<i64> {
    args.first().and_then(|raw| raw.parse::<i64>().ok())
}

async fn upload_proof(ledger: &mut TransactionManager, transaction_id: i64, path: &Path) {
    let Some(request) = ledger.proof_request(transaction_id) else {
        eprintln!("Transaction {} is not pending", transaction_id);
        return;
    };
    let (file_name, bytes) = match read_proof_file(path).await {
        Ok(staged) => staged,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    ledger.open_proof(request);
    ledger.stage_proof(&file_name, bytes).await;
    if ledger.proof().is_some_and(|p| p.staged_url().is_some()) {
        ledger.confirm_proof().await;
    } else {
        ledger.close_proof();
    }
}

fn print_help() {
    println!("Commands:");
    println!("  login <email> <password>      authenticate");
    println!("  whoami                        show the current profile");
    println!("  categories | activities       show the catalog view");
    println!("  next cat|act, prev cat|act    page through a listing");
    println!("  filter <category-id>|all      filter activities by category");
    println!("  detail <activity-id>          show one activity");
    println!("  reserve <activity-id>         stage a reservation for payment");
    println!("  staged                        show the staged reservation");
    println!("  transactions [all]            list transactions (all = admin)");
    println!("  sort                          toggle order-date sorting");
    println!("  cancel <transaction-id>       cancel a pending transaction");
    println!("  proof <transaction-id> <file> upload and attach payment proof");
    println!("  override <id> <status>        admin status override");
    println!("  addcat <name> / delcat <id>   admin category management");
    println!("  quit");
}

fn print_catalog(catalog: &CatalogBrowser) {
    let cursor = catalog.categories_cursor();
    println!(
        "Categories (page {} of {}):",
        cursor.page(),
        cursor
            .total_page()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
    println!("  [ALL]");
    for category in catalog.categories() {
        println!("  [{}] {}", category.id, category.name);
    }

    match catalog.selected_category() {
        Some(category_id) => println!("Activities (category {}):", category_id),
        None => {
            let cursor = catalog.activities_cursor();
            println!(
                "Activities (page {} of {}):",
                cursor.page(),
                cursor
                    .total_page()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "?".to_string())
            );
        }
    }
    if catalog.activities().is_empty() {
        println!("  Activities Not Available");
    }
    for activity in catalog.activities() {
        print_activity_line(activity);
    }
}

fn print_activity_line(activity: &Activity) {
    let price = match activity.reference_price() {
        Some(reference) => format!("{} (was {})", format_idr(activity.price), format_idr(reference)),
        None => format_idr(activity.price),
    };
    println!(
        "  [{}] {} | {} {}-{} | {} | slots {}/{} | {}",
        activity.id,
        activity.title,
        format_date(&activity.activity_date),
        format_time(&activity.start_time),
        format_time(&activity.end_time),
        activity.address,
        activity.booked_slots(),
        activity.slot,
        price,
    );
}

fn print_activity_detail(activity: &Activity) {
    println!("{}", activity.title);
    if let Some(description) = &activity.description {
        println!("{}", description);
    }
    println!("Category: {}", activity.sport_category.name);
    print_activity_line(activity);
    if let Some(organizer) = &activity.organizer {
        println!("Organizer: {}", organizer.name);
    }
    if let Some(city) = &activity.city {
        match &city.province {
            Some(province) => println!(
                "City: {}, Province: {}",
                city.city_name_full, province.province_name
            ),
            None => println!("City: {}", city.city_name_full),
        }
    }
    if activity.participants.is_empty() {
        println!("No participants yet.");
    } else {
        println!("Participants:");
        for participant in &activity.participants {
            println!("  {} ({})", participant.user.name, participant.user.email);
        }
    }
    if let Some(map_url) = &activity.map_url {
        println!("Map: {}", map_url);
    }
}

fn print_banner(ledger: &TransactionManager) {
    if let Some(notification) = ledger.active_notification() {
        println!("[{:?}] {}", notification.kind(), notification.message());
    }
}

fn print_transactions(ledger: &TransactionManager) {
    print_banner(ledger);
    if let Some(error) = ledger.last_error() {
        eprintln!("{}", error);
        return;
    }
    if ledger.transactions().is_empty() {
        println!("No transactions found");
        return;
    }
    for transaction in ledger.transactions() {
        print_transaction_line(transaction);
    }
}

fn print_transaction_line(transaction: &Transaction) {
    let items = &transaction.transaction_items;
    println!(
        "  [{}] {} | {} | {} | ordered {} expires {} | {} {}-{} at {}{}",
        transaction.id,
        items.title,
        transaction.invoice_id,
        transaction.status.as_str().to_uppercase(),
        format_date(&transaction.order_date),
        format_date(&transaction.expired_date),
        format_date(&items.sport_activities.activity_date),
        format_time(&items.sport_activities.start_time),
        format_time(&items.sport_activities.end_time),
        items.sport_activities.address,
        transaction
            .proof_payment_url
            .as_deref()
            .map(|url| format!(" | proof: {}", url))
            .unwrap_or_default(),
    );
    println!("      {}", format_idr(transaction.total_amount));
}
