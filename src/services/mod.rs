/// OpenAPI document for every route.
pub mod documentation;
/// Question generation for previews and generated starts.
pub mod generation_service;
/// Liveness and degraded-mode reporting.
pub mod health_service;
/// Round lifecycle, answers and the blind bag.
pub mod quiz_service;
/// Mapping of quiz events onto SSE frames.
pub mod sse_events;
/// Per-client SSE streams with a handshake frame.
pub mod sse_service;
#[cfg(test)]
mod test_support;
