use criterion::{black_box, Bencher, Criterion};
use rand::prelude::*;

use podium::{Entry, RankedSkipList};

fn populated(size: usize, rng: &mut SmallRng) -> (RankedSkipList<u32>, Vec<String>) {
    let mut list = RankedSkipList::new();
    let mut members = Vec::with_capacity(size);
    for i in 0..size {
        let member = format!("member-{i:08}");
        list.insert(Entry::new(member.clone(), rng.gen::<i32>() as i64, 0));
        members.push(member);
    }
    (list, members)
}

fn bench_insert(b: &mut Bencher, base: usize, inserts: usize) {
    let mut rng = SmallRng::from_rng(thread_rng()).unwrap();
    let (mut list, _) = populated(base, &mut rng);

    b.iter(|| {
        for _ in 0..inserts {
            let member = format!("member-{:08}", rng.gen::<u32>());
            list.insert(Entry::new(member, rng.gen::<i32>() as i64, 0));
        }
    });
}

fn bench_rank_of(b: &mut Bencher, size: usize) {
    let mut rng = SmallRng::from_rng(thread_rng()).unwrap();
    let (list, members) = populated(size, &mut rng);

    b.iter(|| {
        let member = &members[rng.gen_range(0..members.len())];
        black_box(list.rank_of(member));
    });
}

fn bench_at_rank(b: &mut Bencher, size: usize) {
    let mut rng = SmallRng::from_rng(thread_rng()).unwrap();
    let (list, _) = populated(size, &mut rng);

    b.iter(|| {
        let rank = rng.gen_range(1..=size as u64);
        black_box(list.at_rank(rank));
    });
}

fn bench_rank_range(b: &mut Bencher, size: usize, window: u64) {
    let mut rng = SmallRng::from_rng(thread_rng()).unwrap();
    let (list, _) = populated(size, &mut rng);

    b.iter(|| {
        let start = rng.gen_range(1..=size as u64);
        black_box(list.rank_range(start, start + window - 1));
    });
}

pub fn benchmark(c: &mut Criterion) {
    c.bench_function("RankedSkipList insert 1000 (empty)", |b| {
        bench_insert(b, 0, 1_000);
    });
    c.bench_function("RankedSkipList insert 1000 (100k base)", |b| {
        bench_insert(b, 100_000, 1_000);
    });

    c.bench_function("RankedSkipList rank_of (10k)", |b| {
        bench_rank_of(b, 10_000);
    });
    c.bench_function("RankedSkipList rank_of (100k)", |b| {
        bench_rank_of(b, 100_000);
    });

    c.bench_function("RankedSkipList at_rank (100k)", |b| {
        bench_at_rank(b, 100_000);
    });

    c.bench_function("RankedSkipList rank_range 100 (100k)", |b| {
        bench_rank_range(b, 100_000, 100);
    });

    c.bench_function("RankedSkipList iter (10k)", |b| {
        let mut rng = SmallRng::from_rng(thread_rng()).unwrap();
        let (list, _) = populated(10_000, &mut rng);
        b.iter(|| {
            for entry in &list {
                black_box(entry);
            }
        });
    });
}
