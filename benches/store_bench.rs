//! Benchmarks for the auction house listing store
//!
//! Run with: cargo bench

use auctionhouse::{
    AuctionService, Category, ItemHandle, Listing, QueryOptions, Settings, SlotArray, Trader,
};
use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SELLERS: [&str; 8] = ["ana", "bob", "cat", "dan", "eve", "fay", "gus", "hal"];

fn create_listings(count: usize) -> Vec<Listing> {
    let expires_at = Utc::now() + Duration::hours(1);
    (0..count)
        .map(|i| {
            Listing::new(
                ItemHandle::new("minecraft:diamond", 1),
                (i % 500) as u64,
                expires_at,
                Trader::new(SELLERS[i % SELLERS.len()], i.to_string()),
                Category::ALL[i % Category::ALL.len()],
            )
        })
        .collect()
}

fn populated(count: usize) -> AuctionService {
    let mut market = AuctionService::new(Settings::default());
    for listing in create_listings(count) {
        market.insert_listing(listing);
    }
    market
}

fn bench_slot_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_array");

    group.bench_function("push_remove_churn", |b| {
        let mut array = SlotArray::new();
        for v in 0..1000usize {
            array.push(v);
        }

        let mut slot = 0usize;
        b.iter(|| {
            array.remove_at(black_box(slot));
            slot = array.push(black_box(slot));
            slot = (slot + 7) % 1000;
        })
    });

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        let listings = create_listings(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("insert_listing", size), &listings, |b, listings| {
            b.iter(|| {
                let mut market = AuctionService::new(Settings::default());
                for listing in listings {
                    market.insert_listing(black_box(listing.clone()));
                }
                market
            })
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let market = populated(10000);

    let by_category = QueryOptions::new().category(Category::Tools).max_price(250);
    let by_seller = QueryOptions::new().seller("eve");
    let combined = QueryOptions::new().category(Category::Armor).seller("bob").limit(45);

    group.bench_function("unfiltered", |b| b.iter(|| market.query_listing(None).len()));
    group.bench_function("category_price", |b| {
        b.iter(|| market.query_listing(Some(black_box(&by_category))).len())
    });
    group.bench_function("seller", |b| {
        b.iter(|| market.query_listing(Some(black_box(&by_seller))).len())
    });
    group.bench_function("category_and_seller", |b| {
        b.iter(|| market.query_listing(Some(black_box(&combined))).len())
    });

    group.finish();
}

criterion_group!(benches, bench_slot_array, bench_insert, bench_query);
criterion_main!(benches);
