use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("journeys-admin"));

// --- LLM Metrics ---

pub static GEN_AI_TOKEN_USAGE: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.token.usage")
        .with_description("Number of tokens used per LLM call")
        .with_unit("{token}")
        .build()
});

pub static GEN_AI_OPERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.operation.duration")
        .with_description("Duration of LLM and image operations in seconds")
        .with_unit("s")
        .build()
});

pub static GEN_AI_ERROR_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.error.count")
        .with_description("Number of LLM and image call errors")
        .with_unit("{error}")
        .build()
});

// --- Domain Metrics ---

pub static STAMPS_GENERATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("stamps.processed")
        .with_description("Stamp generation attempts by outcome")
        .with_unit("{stamp}")
        .build()
});

pub static REFERENCE_IMAGES_DOWNLOADED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("reference_images.downloaded")
        .with_description("Reference photos written to disk")
        .with_unit("{image}")
        .build()
});

pub static LOCATIONS_UPDATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("locations.updated")
        .with_description("Location mutations by kind")
        .with_unit("{location}")
        .build()
});

pub static GRAPHQL_REQUESTS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("graphql.requests")
        .with_description("GraphQL round trips to the backend")
        .with_unit("{request}")
        .build()
});

pub static GRAPHQL_CACHE_HITS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("graphql.cache.hits")
        .with_description("GraphQL queries answered from the local cache")
        .with_unit("{request}")
        .build()
});

// --- HTTP Metrics ---

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
            60000.0, 300000.0,
        ])
        .build()
});
