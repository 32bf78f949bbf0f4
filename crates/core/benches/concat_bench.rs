use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};

use boxcat_core::api::concatenate;
use boxcat_core::geometry::{Point, merge_boxes, rect_to_coordinates};
use boxcat_core::model::Document;

const SEED: u64 = 0x5eed_b0c5;

#[derive(Clone)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }
}

fn random_box(rng: &mut XorShift64) -> Vec<Point> {
    let x = rng.gen_f64(0.0, 1800.0).floor();
    let y = rng.gen_f64(0.0, 1000.0).floor();
    let w = rng.gen_f64(4.0, 120.0).floor();
    let h = rng.gen_f64(4.0, 40.0).floor();
    rect_to_coordinates((x, y, x + w, y + h))
}

/// A single-view document with `frames` time points and `per_frame` text
/// boxes aligned to each.
fn generate_document(seed: u64, frames: usize, per_frame: usize) -> Document {
    let mut rng = XorShift64::new(seed);
    let mut annotations: Vec<Value> = Vec::with_capacity(frames * (1 + 2 * per_frame));
    for f in 0..frames {
        let tp = format!("tp_{}", f);
        annotations.push(json!({
            "@type": "http://mmif.clams.ai/vocabulary/TimePoint/v1",
            "properties": {"id": tp, "timePoint": f * 30}
        }));
        for b in 0..per_frame {
            let bb = format!("bb_{}_{}", f, b);
            let coords: Vec<[f64; 2]> = random_box(&mut rng).iter().map(|&(x, y)| [x, y]).collect();
            annotations.push(json!({
                "@type": "http://mmif.clams.ai/vocabulary/BoundingBox/v1",
                "properties": {"id": bb, "boxType": "text", "coordinates": coords}
            }));
            annotations.push(json!({
                "@type": "http://mmif.clams.ai/vocabulary/Alignment/v1",
                "properties": {"id": format!("al_{}_{}", f, b), "source": tp, "target": bb}
            }));
        }
    }
    serde_json::from_value(json!({
        "metadata": {"mmif": "http://mmif.clams.ai/1.0.0"},
        "views": [{"id": "v_0", "metadata": {"contains": {}}, "annotations": annotations}]
    }))
    .expect("generated document is valid")
}

fn bench_merge_boxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_boxes");
    for &n in &[16usize, 256, 4096] {
        let mut rng = XorShift64::new(SEED ^ n as u64);
        let boxes: Vec<Vec<Point>> = (0..n).map(|_| random_box(&mut rng)).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &boxes, |b, boxes| {
            b.iter(|| black_box(merge_boxes(boxes.iter().map(Vec::as_slice)).unwrap()))
        });
    }
    group.finish();
}

fn bench_concatenate(c: &mut Criterion) {
    let mut group = c.benchmark_group("concatenate");
    for &(frames, per_frame) in &[(100usize, 8usize), (1000, 8), (20_000, 1)] {
        let doc = generate_document(SEED ^ frames as u64, frames, per_frame);
        group.throughput(Throughput::Elements((frames * per_frame) as u64));
        group.bench_with_input(
            BenchmarkId::new("frames", frames),
            &doc,
            |b, doc| {
                b.iter(|| {
                    let mut doc = doc.clone();
                    let summary = concatenate(&mut doc, None).unwrap();
                    black_box(summary.groups);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(concat_benches, bench_merge_boxes, bench_concatenate);
criterion_main!(concat_benches);
