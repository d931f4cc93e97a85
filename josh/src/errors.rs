use crate::shell::APP_NAME;
use tracing::debug;

/// Display an error in a user-friendly format without stack traces.
/// Every print-and-continue failure funnels through here; the context
/// chain is rendered inline.
pub fn display_user_error(err: &anyhow::Error) {
    debug!("user error: {err:?}");
    eprintln!("{APP_NAME}: {err:#}");
}
