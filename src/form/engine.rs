use serde_json::Value;
use tracing::trace;

use crate::domain::RecordSchema;

use super::buffer::EditBuffer;

/// Re-evaluates every derived field, dependencies first, and writes the
/// results into `buffer`. Returns how many derived values changed.
pub fn recompute(buffer: &mut EditBuffer, schema: &RecordSchema) -> usize {
    let mut changed = 0;
    for key in schema.derivation_order() {
        let Some(derivation) = schema.field(key).and_then(|field| field.derivation.as_ref()) else {
            continue;
        };
        let next = {
            let inputs: Vec<&Value> = derivation
                .dependencies()
                .iter()
                .map(|dependency| buffer.get(dependency).unwrap_or(&Value::Null))
                .collect();
            derivation.evaluate(&inputs)
        };
        if buffer.get(key) != Some(&next) {
            trace!(field = %key, value = %next, "derived value updated");
            buffer.insert(key.clone(), next);
            changed += 1;
        }
    }
    changed
}
