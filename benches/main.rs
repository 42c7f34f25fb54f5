#[macro_use]
extern crate criterion;

mod ranked_skiplist;

criterion_group!(
    benches,
    crate::ranked_skiplist::benchmark,
    crate::leaderboard::benchmark
);
criterion_main!(benches);
