//! Card Pricer CLI - one market valuation per invocation.
//!
//! Looks up comparable sold listings for the described card (fetching from
//! 130point.com when local data is stale) and prints a price estimate with
//! a confidence tier, plus a suggested asking price.

use std::path::PathBuf;
use std::sync::Arc;

use card_pricer::service::DEFAULT_MAX_AGE_DAYS;
use card_pricer::suggest::{self, ListingTraits, DEFAULT_FEE_PERCENT};
use card_pricer::{CardQuery, Point130Client, PricingService, Sport, SqliteStore};
use clap::Parser;

/// Estimate a sports card's market value from sold-listing comps
#[derive(Parser, Debug)]
#[command(name = "card_pricer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite sale-record database
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Sport (baseball, basketball, football, hockey, soccer, other)
    sport: Sport,

    /// Card year
    year: i32,

    /// Player name
    player: String,

    /// Card brand, e.g. "Topps Chrome"
    #[arg(long, default_value = "")]
    brand: String,

    /// Parallel/variation name, e.g. "Silver"
    #[arg(long, default_value = "")]
    parallel: String,

    /// The card is professionally graded
    #[arg(long, default_value_t = false)]
    graded: bool,

    /// Grading company (required with --graded), e.g. PSA
    #[arg(long, default_value = "")]
    grade_company: String,

    /// Grade value (required with --graded), e.g. 10
    #[arg(long, default_value = "")]
    grade_value: String,

    /// Serial run for the suggested price, e.g. "/99"
    #[arg(long)]
    serial: Option<String>,

    /// Rookie card (affects the suggested price)
    #[arg(long, default_value_t = false)]
    rookie: bool,

    /// Autograph card (affects the suggested price)
    #[arg(long, default_value_t = false)]
    auto: bool,

    /// Local data older than this many days triggers a fetch
    #[arg(long, default_value_t = DEFAULT_MAX_AGE_DAYS)]
    max_age_days: i64,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Returns the default database path: ~/.local/share/card_pricer/sales.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card_pricer")
        .join("sales.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    let store = match SqliteStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to open database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };

    let query = CardQuery {
        sport: args.sport,
        year: args.year,
        player_name: args.player.clone(),
        brand: args.brand.clone(),
        parallel_name: args.parallel.clone(),
        is_graded: args.graded,
        grade_company: args.grade_company.clone(),
        grade_value: args.grade_value.clone(),
    };

    let service = PricingService::new(store, Point130Client::new())
        .with_max_age_days(args.max_age_days);

    let result = match service.get_valuation(&query).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Valuation failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
        return;
    }

    if !result.success {
        println!("No comparable sales found ({}).", result.source);
        println!("Research the card manually instead:");
        println!("  Terapeak:   {}", suggest::terapeak_url(&query));
        println!("  eBay sold:  {}", suggest::ebay_sold_url(&query));
        return;
    }

    let median = result.median_price.unwrap_or_default();

    println!("Market value for {} {} {}:", args.year, args.player, args.sport);
    println!("  Median:      ${:.2}", median);
    println!("  Average:     ${:.2}", result.average_price.unwrap_or_default());
    println!(
        "  Range:       ${:.2} - ${:.2}",
        result.low_price.unwrap_or_default(),
        result.high_price.unwrap_or_default()
    );
    println!("  Sample:      {}", result.source);
    println!("  Confidence:  {}", result.confidence);
    if let Some(most_recent) = result.most_recent_sale {
        println!("  Last sale:   {}", most_recent.format("%Y-%m-%d"));
    }

    let traits = ListingTraits {
        variation: (!args.parallel.is_empty()).then(|| args.parallel.clone()),
        serial_numbered: args.serial.clone(),
        is_rookie: args.rookie,
        is_auto: args.auto,
    };
    let asking = suggest::suggest_price(median, &traits);

    println!();
    println!("  Suggested listing price: ${:.2}", asking);
    println!(
        "  Net after fees ({}%):    ${:.2}",
        DEFAULT_FEE_PERCENT,
        suggest::net_after_fees(asking, DEFAULT_FEE_PERCENT)
    );
}
