use crate::core::dispatch::{CommandEvent, Telemetry};

/// Emits one structured event per command invocation on the
/// `statsy::telemetry` target.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn command_invoked(&self, event: &CommandEvent) {
        tracing::info!(
            target: "statsy::telemetry",
            command = %event.command,
            user_id = event.user_id,
            guild = %event.guild,
            prefix = %event.prefix_fingerprint,
            channel_type = event.channel_type,
            "statsy.command"
        );
    }
}
