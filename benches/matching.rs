use std::hint::black_box;

use corridor::dispatcher::sync_handler;
use corridor::{Reply, Router};
use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;

fn zoo_router() -> Router {
    let mut router = Router::new();
    router.get("/", sync_handler(|_ctx| Ok(Reply::Empty)), vec![]);
    router.get("/zoo/animals", sync_handler(|_ctx| Ok(Reply::Empty)), vec![]);
    router.post("/zoo/animals", sync_handler(|_ctx| Ok(Reply::Empty)), vec![]);
    for verb in ["get", "put", "patch", "delete"] {
        let method = verb.parse().unwrap_or(corridor::router::RouteMethod::Get);
        router.register(method, "/zoo/animals/:id", sync_handler(|_ctx| Ok(Reply::Empty)), vec![]);
    }
    for i in 0..50 {
        router.get(
            format!("/zoo/enclosures/{i}/keepers/:keeper"),
            sync_handler(|_ctx| Ok(Reply::Empty)),
            vec![],
        );
    }
    router.all("/static/*", sync_handler(|_ctx| Ok(Reply::Empty)), vec![]);
    router
}

fn bench_find(c: &mut Criterion) {
    let table = zoo_router().compile();

    c.bench_function("find_root", |b| {
        b.iter(|| table.find(black_box(&Method::GET), black_box("/")))
    });
    c.bench_function("find_param", |b| {
        b.iter(|| table.find(black_box(&Method::PATCH), black_box("/zoo/animals/12345")))
    });
    c.bench_function("find_deep_table", |b| {
        b.iter(|| table.find(black_box(&Method::GET), black_box("/zoo/enclosures/49/keepers/ann")))
    });
    c.bench_function("find_wildcard", |b| {
        b.iter(|| table.find(black_box(&Method::GET), black_box("/static/css/site.css")))
    });
    c.bench_function("find_miss", |b| {
        b.iter(|| table.find(black_box(&Method::GET), black_box("/nowhere")))
    });
}

fn bench_compile(c: &mut Criterion) {
    let router = zoo_router();
    c.bench_function("compile_table", |b| b.iter(|| black_box(router.compile())));
}

criterion_group!(benches, bench_find, bench_compile);
criterion_main!(benches);
