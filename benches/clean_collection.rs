use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use muon_det_cleaner::cleaner::{build_veto_set, clean_collection, select_tracks};
use muon_det_cleaner::collections::RecHitCollection;
use muon_det_cleaner::det_id::{MuonDetId, RpcDetId};
use muon_det_cleaner::event::{Event, InputTag};
use muon_det_cleaner::geometry::{GlobalPoint, MuonGeometry, Surface};
use muon_det_cleaner::hits::{rec_hits::RpcRecHit, HitKind, TrackingHit};
use muon_det_cleaner::muons::{Muon, Track};
use muon_det_cleaner::technology::Rpc;
use muon_det_cleaner::{CleanerConfig, RpcRecHitColCleaner};

const N_HITS: usize = 5_000;

/// Every barrel roll of layer 1, subsector 1.
fn barrel_rolls() -> Vec<RpcDetId> {
    let mut rolls = Vec::new();
    for wheel in -2..=2 {
        for station in 1..=4 {
            for sector in 1..=12 {
                for roll in 1..=3 {
                    rolls.push(RpcDetId::new(0, wheel, station, sector, 1, 1, roll).unwrap());
                }
            }
        }
    }
    rolls
}

fn sector_phi(id: &RpcDetId) -> f64 {
    (f64::from(id.sector()) - 1.0) * std::f64::consts::PI / 6.0
}

fn make_geometry(rolls: &[RpcDetId]) -> MuonGeometry {
    let mut geometry = MuonGeometry::new();
    for id in rolls {
        let phi = sector_phi(id);
        let r = 400.0 + 60.0 * f64::from(id.station());
        geometry.add_rpc_roll(
            *id,
            Surface::facing_beam(Vector3::new(r * phi.cos(), r * phi.sin(), 0.0), phi),
        );
    }
    geometry
}

fn make_hits(rng: &mut StdRng, rolls: &[RpcDetId], geometry: &MuonGeometry) -> Vec<RpcRecHit> {
    (0..N_HITS)
        .map(|_| {
            let id = rolls[rng.random_range(0..rolls.len())];
            let eta = rng.random_range(-1.2..1.2);
            let phi = sector_phi(&id) + rng.random_range(-0.26..0.26);
            let surface = geometry.rpc_roll(&id).unwrap();
            let local = surface.to_local(&GlobalPoint::from_perp_eta_phi(500.0, eta, phi));
            RpcRecHit::new(id, rng.random_range(1..96), 2, local)
        })
        .collect()
}

/// Two muons, each leaving a hit in a handful of rolls.
fn make_muons(rng: &mut StdRng, rolls: &[RpcDetId]) -> Vec<Muon> {
    (0..2)
        .map(|_| {
            let hits = (0..6)
                .map(|_| {
                    let id = rolls[rng.random_range(0..rolls.len())];
                    TrackingHit::leaf(HitKind::RpcRecHit, id.raw())
                })
                .collect();
            let eta = rng.random_range(-1.0..1.0);
            let phi = rng.random_range(-3.1..3.1);
            Muon::tracker(Track::new(hits, eta, phi))
        })
        .collect()
}

fn bench_clean_collection(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let rolls = barrel_rolls();
    let geometry = make_geometry(&rolls);
    let input: RecHitCollection<RpcDetId, RpcRecHit> =
        make_hits(&mut rng, &rolls, &geometry).into_iter().collect();
    let muons = make_muons(&mut rng, &rolls);
    let tracks = select_tracks(&muons).unwrap();
    let veto = build_veto_set::<Rpc>(&tracks).unwrap();

    c.bench_function("clean_collection/rpc_5k_hits", |b| {
        b.iter(|| {
            let res = clean_collection::<Rpc>(
                black_box(&input),
                black_box(&veto),
                &tracks,
                &geometry,
                0.4,
            )
            .unwrap();
            black_box(res);
        })
    });
}

fn bench_produce(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let rolls = barrel_rolls();
    let geometry = make_geometry(&rolls);
    let config = CleanerConfig::builder()
        .old_collections(["rpcRecHits:a", "rpcRecHits:b"])
        .build()
        .unwrap();
    let cleaner = RpcRecHitColCleaner::new(config.clone());

    let mut template = Event::new(1);
    template.put_muons(config.muon_collection.clone(), make_muons(&mut rng, &rolls));
    for tag in ["a", "b"] {
        template.rpc_mut().insert_input(
            InputTag::new("rpcRecHits", tag),
            make_hits(&mut rng, &rolls, &geometry).into_iter().collect(),
        );
    }

    c.bench_function("produce/rpc_two_collections", |b| {
        b.iter_batched(
            || template.clone(),
            |mut event| {
                let summary = cleaner.produce(&mut event, &geometry).unwrap();
                black_box(summary);
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_clean_collection, bench_produce
);
criterion_main!(benches);
