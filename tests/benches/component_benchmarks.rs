//! # Beacon Keeper Component Benchmarks
//!
//! | Component | Hot path | Target |
//! |-----------|----------|--------|
//! | bk-01 Result set | intake per advertisement | < 1µs |
//! | bk-02 Record codec | decode of a full registry | < 1ms |
//! | shared-bus | publish to 8 listeners | < 1µs |

use bk_01_scan_session::ResultSet;
use bk_02_device_registry::RecordCodec;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_bus::{ObserverBus, ScanEvent};
use shared_types::{DeviceAddress, RawAdvertisement, RememberedDevice, TagColor, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn tag_address(index: usize) -> String {
    format!("C0:FF:EE:00:{:02X}:{:02X}", (index >> 8) & 0xff, index & 0xff)
}

// ============================================================================
// BK-01: Result Set Intake
// ============================================================================

fn bench_result_set_intake(c: &mut Criterion) {
    let mut group = c.benchmark_group("bk-01-result-set");

    for tags in [8usize, 64, 512] {
        let advertisements: Vec<_> = (0..tags)
            .map(|i| RawAdvertisement::new(tag_address(i), -60, vec![0x02, 0x01, 0x06]))
            .collect();

        group.throughput(Throughput::Elements(tags as u64));
        group.bench_with_input(
            BenchmarkId::new("intake_throttled", tags),
            &advertisements,
            |b, advertisements| {
                let mut results = ResultSet::new(Duration::from_secs(1));
                let now = Instant::now();
                b.iter(|| {
                    for advertisement in advertisements {
                        if let Some(address) = advertisement.device_address() {
                            black_box(results.intake(address, advertisement, now));
                        }
                    }
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// BK-02: Record Codec
// ============================================================================

fn registry_of(size: usize) -> Vec<RememberedDevice> {
    (0..size)
        .filter_map(|i| DeviceAddress::parse(&tag_address(i)))
        .map(|address| {
            let mut device = RememberedDevice::new(address, Timestamp::new(1_700_000_000_000));
            device.alias = Some("Backpack".to_string());
            device.color = TagColor::Blue;
            device.with_signal_strength(-70)
        })
        .collect()
}

fn bench_record_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("bk-02-record-codec");

    for size in [10usize, 100, 1000] {
        let devices = registry_of(size);
        let encoded = RecordCodec::CURRENT.encode(&devices).unwrap_or_default();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &devices, |b, devices| {
            b.iter(|| black_box(RecordCodec::CURRENT.encode(devices)))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, bytes| {
            b.iter(|| black_box(RecordCodec::CURRENT.decode::<RememberedDevice>(bytes)))
        });
    }

    group.finish();
}

// ============================================================================
// SHARED-BUS: Publish Fan-out
// ============================================================================

fn bench_bus_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-bus-publish");

    for listeners in [1usize, 8, 64] {
        let bus = ObserverBus::<ScanEvent>::new();
        let delivered = Arc::new(AtomicU64::new(0));
        let handles: Vec<_> = (0..listeners)
            .map(|_| {
                let delivered = Arc::clone(&delivered);
                bus.subscribe_fn(move |_event: &ScanEvent| {
                    delivered.fetch_add(1, Ordering::Relaxed);
                })
            })
            .collect();

        group.bench_function(BenchmarkId::new("tick", listeners), |b| {
            let event = ScanEvent::Tick { current: 1, max: 30 };
            b.iter(|| black_box(bus.publish(&event)))
        });

        for handle in &handles {
            bus.unsubscribe(handle);
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_result_set_intake,
    bench_record_codec,
    bench_bus_publish
);
criterion_main!(benches);
