use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use jetsub::{dimuon_invariant_mass, girth, lesub, Jet, Particle, Ragged, Vec3, MUON_MASS};

fn synthetic_jets(rng: &mut fastrand::Rng, n_events: usize) -> (Ragged<Jet>, Ragged<Particle>) {
    let constituents: Vec<Vec<Vec<Particle>>> = (0..n_events)
        .map(|_| {
            (0..rng.usize(..6))
                .map(|_| {
                    let phi0 = rng.f64() * 6.0 - 3.0;
                    let eta0 = rng.f64() * 4.0 - 2.0;
                    (0..rng.usize(..30))
                        .map(|_| {
                            let pt = rng.f64() * 40.0 + 0.5;
                            let phi = phi0 + rng.f64() * 0.8 - 0.4;
                            let eta = eta0 + rng.f64() * 0.8 - 0.4;
                            let p3 = Vec3::new(pt * phi.cos(), pt * phi.sin(), pt * eta.sinh());
                            Particle::new(p3.with_mass(0.13957039), 211, true)
                        })
                        .collect()
                })
                .collect()
        })
        .collect();
    let jets: Vec<Vec<Jet>> = constituents
        .iter()
        .map(|event| {
            event
                .iter()
                .map(|list| Jet::from_constituents(list))
                .collect()
        })
        .collect();
    (Ragged::from_lists(jets), Ragged::from_nested(constituents))
}

fn synthetic_muons(rng: &mut fastrand::Rng, n_events: usize) -> Ragged<Particle> {
    Ragged::from_lists(
        (0..n_events)
            .map(|_| {
                (0..rng.usize(..6))
                    .map(|_| {
                        let p3 = Vec3::new(
                            rng.f64() * 100.0 - 50.0,
                            rng.f64() * 100.0 - 50.0,
                            rng.f64() * 200.0 - 100.0,
                        );
                        let pdg = if rng.bool() { 13 } else { -13 };
                        Particle::new(p3.with_mass(MUON_MASS), pdg, true)
                    })
                    .collect()
            })
            .collect(),
    )
}

fn substructure_benchmark(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(0);
    let mut group = c.benchmark_group("Substructure Performance");
    for n_events in [1_000, 10_000, 100_000] {
        let (jets, constituents) = synthetic_jets(&mut rng, n_events);
        group.bench_with_input(
            BenchmarkId::new("girth", n_events),
            &(jets, constituents.clone()),
            |b, (jets, constituents)| {
                b.iter(|| std::hint::black_box(girth(jets, constituents).unwrap()))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("lesub", n_events),
            &constituents,
            |b, constituents| b.iter(|| std::hint::black_box(lesub(constituents).unwrap())),
        );
    }
    group.finish();
}

fn dimuon_benchmark(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut group = c.benchmark_group("Dimuon Performance");
    for n_events in [1_000, 10_000, 100_000] {
        let muons = synthetic_muons(&mut rng, n_events);
        group.bench_with_input(BenchmarkId::from_parameter(n_events), &muons, |b, muons| {
            b.iter(|| std::hint::black_box(dimuon_invariant_mass(muons).unwrap()))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = substructure_benchmark, dimuon_benchmark
}
criterion_main!(benches);
