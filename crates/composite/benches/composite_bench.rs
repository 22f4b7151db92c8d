use common::ProductId;
use composite::{CompositeService, ProductCompositeService, ReadMode};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{ProductAggregate, RecommendationSummary, ReviewSummary};
use integration::{InMemoryProductService, InMemoryRecommendationService, InMemoryReviewService};

fn seeded(
    rt: &tokio::runtime::Runtime,
    read_mode: ReadMode,
) -> CompositeService<InMemoryProductService, InMemoryRecommendationService, InMemoryReviewService>
{
    let service = CompositeService::new(
        InMemoryProductService::new(),
        InMemoryRecommendationService::new(),
        InMemoryReviewService::new(),
        "bench:7000",
        read_mode,
    );

    let recommendations = (1..=10)
        .map(|id| RecommendationSummary::new(id, "author", id % 5, "content"))
        .collect();
    let reviews = (1..=10)
        .map(|id| ReviewSummary::new(id, "author", "subject", "content"))
        .collect();
    let body = ProductAggregate::new(1, "Benchmark Widget", 100)
        .with_recommendations(recommendations)
        .with_reviews(reviews);
    rt.block_on(async { service.create_composite_product(body).await.unwrap() });

    service
}

fn bench_read_sequential(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = seeded(&rt, ReadMode::Sequential);

    c.bench_function("composite/read_sequential", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .get_composite_product(ProductId::new(1))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_read_concurrent(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = seeded(&rt, ReadMode::Concurrent);

    c.bench_function("composite/read_concurrent", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .get_composite_product(ProductId::new(1))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_create_delete_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = seeded(&rt, ReadMode::Sequential);

    c.bench_function("composite/create_delete", |b| {
        b.iter(|| {
            rt.block_on(async {
                let body = ProductAggregate::new(2, "Cycle", 1)
                    .with_recommendations(vec![RecommendationSummary::new(1, "a", 1, "c")])
                    .with_reviews(vec![ReviewSummary::new(1, "a", "s", "c")]);
                service.create_composite_product(body).await.unwrap();
                service
                    .delete_composite_product(ProductId::new(2))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_read_sequential,
    bench_read_concurrent,
    bench_create_delete_cycle
);
criterion_main!(benches);
