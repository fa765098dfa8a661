pub mod tracing_telemetry;

pub use tracing_telemetry::TracingTelemetry;
