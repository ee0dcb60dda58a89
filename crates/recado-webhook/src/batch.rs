use recado_core::{
    domain::{CommandOutcome, InboundMessage, MessageKind},
    interpreter::Interpreter,
};

/// Run every text message of a payload through the interpreter, in order.
///
/// One message's failure never aborts its siblings; each outcome is logged
/// and collected independently. Non-text messages are skipped silently.
pub async fn process_messages(
    interpreter: &Interpreter,
    messages: &[InboundMessage],
) -> Vec<CommandOutcome> {
    let mut outcomes = Vec::new();

    for message in messages {
        if message.kind != MessageKind::Text {
            continue;
        }

        tracing::info!(from = %message.from.0, "processing message");
        let outcome = interpreter.interpret(&message.from.0, &message.text).await;

        if outcome.success {
            tracing::info!(
                from = %message.from.0,
                record_type = ?outcome.record_type,
                "command stored"
            );
        } else {
            tracing::warn!(
                from = %message.from.0,
                error = outcome.error.as_deref().unwrap_or(""),
                "command failed"
            );
        }

        outcomes.push(outcome);
    }

    outcomes
}
