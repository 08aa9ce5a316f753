use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use installment_core::render::{render_plan, DisplayOptions};
use installment_core::schedule::{
    generate, AmountPrecision, PlanRequest, ScheduleGenerator, TimeUnit,
};

fn sample_request(installments: u32) -> PlanRequest {
    PlanRequest::starting_on(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
        .with_total(125_000.0)
        .with_deposit(5_000.0)
        .with_installments(installments)
        .with_interval(TimeUnit::Month, 1)
}

fn bench_schedule(c: &mut Criterion) {
    let small = sample_request(10);
    let large = sample_request(360);
    let rounded = ScheduleGenerator::new(AmountPrecision::MinorUnits(2));

    c.bench_function("generate_10_monthly", |b| b.iter(|| generate(black_box(&small))));
    c.bench_function("generate_360_monthly", |b| b.iter(|| generate(black_box(&large))));
    c.bench_function("generate_360_minor_units", |b| {
        b.iter(|| rounded.generate(black_box(&large)))
    });

    let plan = generate(&large);
    let options = DisplayOptions::default();
    c.bench_function("render_360", |b| b.iter(|| render_plan(black_box(&plan), &options)));
}

criterion_group!(benches, bench_schedule);
criterion_main!(benches);
