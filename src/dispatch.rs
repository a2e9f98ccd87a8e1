//! Dispatch loop shared by subjects and the topic registry.

use crate::config::DispatchPolicy;
use crate::error::{HandlerFailure, HandlerResult, Result};
use crate::types::DispatchReport;
use tracing::{debug, warn};

/// Invoke `handler` for each snapshotted entry in order.
///
/// The snapshot must already be detached from any lock: handlers are free to
/// re-enter the registry that produced it.
pub(crate) fn dispatch<I, F>(
    snapshot: I,
    policy: DispatchPolicy,
    mut handler: F,
) -> Result<DispatchReport>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> HandlerResult,
{
    let mut report = DispatchReport::default();

    for (index, entry) in snapshot.into_iter().enumerate() {
        match handler(entry) {
            Ok(()) => report.delivered += 1,
            Err(source) => match policy {
                DispatchPolicy::FailFast => {
                    debug!(index, error = %source, "handler failed, aborting dispatch");
                    return Err(HandlerFailure { index, source }.into());
                }
                DispatchPolicy::Isolate => {
                    warn!(index, error = %source, "handler failed");
                    report.failures.push(HandlerFailure { index, source });
                }
            },
        }
    }

    Ok(report)
}
