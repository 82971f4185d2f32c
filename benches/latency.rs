//! Latency benchmarks for the order and request-auth hot paths.
//!
//! Run with: `cargo bench --bench latency`

use alloy_primitives::{Address, U256};
use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use trustless_core::signing::{
    authenticate, digest_meta, ExchangeDomain, OrderBuilder, OrderSigner, SignedOrder, Wallet,
};
use trustless_core::types::{Market, TradeIntent};
use trustless_core::{AmountEncoder, ExchangeConfig, FixedClock, OrderSettings, TokenInfo};

// Well-known development key, never funded.
const BENCH_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Config with ETH (18 decimals) and USD (2 decimals, 0.1% spread).
fn bench_config() -> ExchangeConfig {
    ExchangeConfig::new(Address::repeat_byte(0x35), Address::repeat_byte(0x9f))
        .with_token(
            "ETH",
            TokenInfo {
                decimals: 18,
                settle_spread: Decimal::ZERO,
                wrapper_address: Address::repeat_byte(0x96),
            },
        )
        .with_token(
            "USD",
            TokenInfo {
                decimals: 2,
                settle_spread: Decimal::new(1, 3),
                wrapper_address: Address::repeat_byte(0x83),
            },
        )
}

fn sell_intent(amount: Decimal) -> TradeIntent {
    TradeIntent::new(
        Market::new("ETH", "USD"),
        -amount,
        Decimal::new(1000, 0),
        Duration::hours(1),
    )
}

/// Benchmark exact amount encoding at increasing decimal precision.
fn bench_amount_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("amount_encoding");

    let config = bench_config();
    let settings = OrderSettings::default();
    let encoder = AmountEncoder::new(&config, &settings);

    for scale in [1u32, 6, 12, 18].iter() {
        let intent = sell_intent(Decimal::new(123_456_789, *scale));

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("sell", scale), &intent, |b, intent| {
            b.iter(|| black_box(encoder.encode_intent(black_box(intent))))
        });
    }

    let buy = TradeIntent::new(
        Market::new("ETH", "USD"),
        Decimal::new(1, 1),
        Decimal::new(1000, 0),
        Duration::hours(1),
    );
    group.bench_function("buy", |b| {
        b.iter(|| black_box(encoder.encode_intent(black_box(&buy))))
    });

    group.finish();
}

/// Benchmark EIP-712 hashing of an order.
fn bench_order_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_digest");

    let config = bench_config();
    let settings = OrderSettings::default();
    let clock = FixedClock::at_unix(1_700_000_000);
    let intent = sell_intent(Decimal::new(1, 1));
    let encoded = AmountEncoder::new(&config, &settings)
        .encode_intent(&intent)
        .unwrap();
    let order = OrderBuilder::new(&config, &clock)
        .with_salt(U256::from(42u64))
        .build(&intent, encoded, Address::repeat_byte(0xf3))
        .unwrap();

    group.bench_function("domain_separator", |b| {
        let domain = ExchangeDomain::zero_ex_v2(config.exchange_address);
        b.iter(|| black_box(domain.separator()))
    });

    group.bench_function("struct_hash", |b| {
        b.iter(|| black_box(black_box(&order).struct_hash()))
    });

    group.bench_function("digest", |b| {
        b.iter(|| black_box(black_box(&order).digest()))
    });

    let meta = order.to_meta();
    group.bench_function("digest_from_wire", |b| {
        b.iter(|| black_box(digest_meta(black_box(&meta))))
    });

    group.finish();
}

/// Benchmark secp256k1 signing and recovery.
fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("signing");

    let config = bench_config();
    let settings = OrderSettings::default();
    let clock = FixedClock::at_unix(1_700_000_000);
    let signer = OrderSigner::new(Wallet::from_private_key(BENCH_PRIVATE_KEY).unwrap());
    let intent = sell_intent(Decimal::new(1, 1));
    let encoded = AmountEncoder::new(&config, &settings)
        .encode_intent(&intent)
        .unwrap();
    let order = OrderBuilder::new(&config, &clock)
        .with_salt(U256::from(42u64))
        .build(&intent, encoded, signer.address())
        .unwrap();

    group.bench_function("sign_order", |b| {
        b.iter(|| black_box(signer.sign_order(black_box(order.clone()))))
    });

    let signed = signer.sign_order(order).unwrap();
    group.bench_function("recover_signer", |b| {
        b.iter(|| black_box(black_box(&signed).recover_signer()))
    });

    let meta = signed.to_meta();
    group.bench_function("verify_wire_order", |b| {
        b.iter(|| {
            SignedOrder::from_meta(black_box(&meta))
                .map(|order| order.is_signed_by_maker())
                .unwrap_or(false)
        })
    });

    group.finish();
}

/// Benchmark the full order pipeline, intent to wire JSON.
fn bench_full_order(c: &mut Criterion) {
    use std::sync::Arc;
    use trustless_core::TradingSession;

    let session = TradingSession::with_clock(
        bench_config(),
        OrderSettings::default(),
        Wallet::from_private_key(BENCH_PRIVATE_KEY).unwrap(),
        Arc::new(FixedClock::at_unix(1_700_000_000)),
    )
    .unwrap();
    let intent = sell_intent(Decimal::new(1, 1));

    c.bench_function("create_order", |b| {
        b.iter(|| black_box(session.create_order(black_box(&intent))))
    });

    let request = session.create_order(&intent).unwrap();
    c.bench_function("order_to_json", |b| {
        b.iter(|| black_box(serde_json::to_string(black_box(&request))))
    });
}

/// Benchmark request authentication.
fn bench_request_auth(c: &mut Criterion) {
    let wallet = Wallet::from_private_key(BENCH_PRIVATE_KEY).unwrap();
    let clock = FixedClock::at_unix(1_700_000_000);

    c.bench_function("authenticate", |b| {
        b.iter(|| black_box(authenticate(&clock, black_box(&wallet), "0x")))
    });
}

criterion_group!(
    benches,
    bench_amount_encoding,
    bench_order_digest,
    bench_signing,
    bench_full_order,
    bench_request_auth,
);

criterion_main!(benches);
