//! Auction House CLI
//!
//! Operates on the market snapshot: each run loads it, applies one
//! command, and dumps it back if anything changed.
//!
//! # Configuration
//!
//! Read from `--config`, the default locations, or `AUCTION_*` environment
//! variables (see `auctionhouse config`). `RUST_LOG` overrides the
//! configured log level.

use anyhow::Context;
use auctionhouse::config::{generate_default_config, Config, LoggingConfig};
use auctionhouse::{
    AuctionService, BuyInformation, Category, ItemHandle, Listing, ListingDuration,
    QueryOptions, Settings, Snapshot, Trader,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "auctionhouse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Auction house listing store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file (overrides the configured path)
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List an item for sale
    Sell {
        /// Seller display name
        #[arg(long)]
        seller: String,
        /// Seller stable id
        #[arg(long, default_value = "")]
        seller_id: String,
        /// Item type id, e.g. minecraft:diamond_sword
        #[arg(long)]
        item: String,
        /// Stack size
        #[arg(long, default_value = "1")]
        amount: u32,
        /// Price in coins
        #[arg(long)]
        price: u64,
        /// Category (armor, tools, items, blocks)
        #[arg(long)]
        category: Category,
        /// Hours until expiry
        #[arg(long, default_value = "0")]
        hours: i64,
        /// Minutes until expiry
        #[arg(long, default_value = "0")]
        minutes: i64,
    },

    /// Query listings
    List {
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        seller: Option<String>,
        /// Only listings priced at or below this
        #[arg(long)]
        max_price: Option<u64>,
        #[arg(long)]
        offset: Option<usize>,
        /// Page size (default: configured max_page_listings)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Buy a listing by store index
    Buy {
        index: usize,
        /// Coins offered
        #[arg(long)]
        amount: u64,
        /// Buyer display name
        #[arg(long)]
        buyer: String,
        #[arg(long, default_value = "")]
        buyer_id: String,
    },

    /// Cancel a listing by store index
    Cancel { index: usize },

    /// Remove sold and expired listings
    Sweep,

    /// Show index statistics
    Stats,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("auctionhouse={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.persistence.snapshot_path());

    let settings = Settings::from_config(&config.market);
    let show_expired = settings.show_expired();
    let mut market = AuctionService::new(settings);

    market.listing_added().add_listener(
        |listing: &Listing| {
            tracing::trace!(
                listing_id = %listing.id,
                seller = %listing.seller.name,
                price = listing.price,
                "Listing added"
            );
        },
        0,
    );

    Snapshot::load(&snapshot_path, &mut market)
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;

    let now = Utc::now();
    let changed = match cli.command {
        Commands::Sell {
            seller,
            seller_id,
            item,
            amount,
            price,
            category,
            hours,
            minutes,
        } => {
            if price == 0 {
                anyhow::bail!("Invalid price: must be greater than zero");
            }
            if hours < 0 || minutes < 0 || (hours == 0 && minutes == 0) {
                anyhow::bail!("Invalid expiration time: give --hours and/or --minutes");
            }

            let Some(listing) = Listing::from_duration(
                ItemHandle::new(item, amount),
                price,
                ListingDuration {
                    hours,
                    minutes,
                    ..Default::default()
                },
                Trader::new(seller, seller_id),
                category,
                now,
            ) else {
                anyhow::bail!("Invalid expiration time: duration is too long");
            };
            let remaining = listing.time_remaining(now);
            let index = market.insert_listing(listing);

            println!(
                "Listing #{} created for {} coins, expires in {}",
                index, price, remaining
            );
            true
        }

        Commands::List {
            category,
            seller,
            max_price,
            offset,
            limit,
        } => {
            let options = QueryOptions {
                category,
                seller_name: seller,
                max_price,
                page: auctionhouse::PageOptions {
                    offset,
                    max_listings: limit,
                },
            };

            let shown: Vec<(usize, &Listing)> = market
                .query_listing_indexed(Some(&options))
                .into_iter()
                .filter(|(_, l)| show_expired || !l.is_expired_at(now))
                .collect();

            if shown.is_empty() {
                println!("No listings found");
            }
            for (index, listing) in shown {
                println!(
                    "#{:<4} {:<28} x{:<3} {:>8} coins  {:<7} {:<16} {}{}",
                    index,
                    listing.item.type_id,
                    listing.item.amount,
                    listing.price,
                    listing.category.to_string(),
                    listing.seller.name,
                    listing.time_remaining(now),
                    if listing.sold { "  [sold]" } else { "" }
                );
            }
            false
        }

        Commands::Buy {
            index,
            amount,
            buyer,
            buyer_id,
        } => {
            let response =
                market.buy_listing(&BuyInformation::new(Trader::new(buyer, buyer_id), amount, index));

            if response.success {
                println!("Purchased listing #{}", index);
            } else {
                println!("Purchase failed: {}", response.reason);
            }
            response.success
        }

        Commands::Cancel { index } => match market.remove_at(index) {
            Some(listing) => {
                println!(
                    "Cancelled listing #{} ({} by {})",
                    index, listing.item.type_id, listing.seller.name
                );
                true
            }
            None => {
                println!("No listing at #{}", index);
                false
            }
        },

        Commands::Sweep => {
            let removed = market.sweep_expired(now);
            println!("Removed {} sold or expired listings", removed.len());
            !removed.is_empty()
        }

        Commands::Stats => {
            println!("{}", market.stats());
            false
        }

        Commands::Config { .. } => unreachable!("handled before loading the market"),
    };

    if changed {
        Snapshot::dump(&mut market, &snapshot_path)
            .with_context(|| format!("writing snapshot {}", snapshot_path.display()))?;
    }

    Ok(())
}
