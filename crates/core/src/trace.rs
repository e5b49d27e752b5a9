// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! W3C trace-context propagation across process boundaries.
//!
//! Before spawning a child process, the current span's context is
//! injected into `TRACEPARENT`/`TRACESTATE` environment variables via
//! the globally-configured [`opentelemetry::propagation::TextMapPropagator`].
//! Children read those variables back into their own trace context on
//! startup.

use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::Context;
use std::collections::HashMap;

const TRACEPARENT: &str = "TRACEPARENT";
const TRACESTATE: &str = "TRACESTATE";

/// A `HashMap`-backed carrier for environment-variable-shaped key/value
/// pairs. Canonicalises keys to upper-case on injection; accepts either
/// case on extraction.
#[derive(Debug, Default)]
struct EnvCarrier(HashMap<String, String>);

impl Injector for EnvCarrier {
    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_uppercase(), value);
    }
}

impl Extractor for EnvCarrier {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(&key.to_uppercase())
            .or_else(|| self.0.get(key))
            .map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Inject the current trace context into `TRACEPARENT`/`TRACESTATE`
/// environment variable entries, appending them to `env`.
pub fn inject_trace_env(cx: &Context, env: &mut Vec<(String, String)>) {
    let mut carrier = EnvCarrier::default();
    opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.inject_context(cx, &mut carrier);
    });
    for key in [TRACEPARENT, TRACESTATE] {
        if let Some(value) = carrier.0.remove(key) {
            env.push((key.to_string(), value));
        }
    }
}

/// Extract a trace context from an inbound environment (as seen by a
/// freshly-spawned child via `std::env::vars()`), honouring both
/// upper- and lower-case spellings.
pub fn extract_trace_context(env: impl IntoIterator<Item = (String, String)>) -> Context {
    let mut carrier = EnvCarrier::default();
    for (k, v) in env {
        let upper = k.to_uppercase();
        if upper == TRACEPARENT || upper == TRACESTATE {
            carrier.0.insert(upper, v);
        }
    }
    opentelemetry::global::get_text_map_propagator(|propagator| propagator.extract(&carrier))
}
