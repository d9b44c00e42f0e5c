use arc_core::CoreError;

/// Maps a raw `sqlx::Error` into the orchestration-layer's
/// `CoreError::Persistence` taxonomy, surfaced to callers as a 500.
pub(crate) fn to_core_error(context: &str, err: sqlx::Error) -> CoreError {
    log::error!("arc-storage: {context}: {err}");
    CoreError::Persistence(format!("{context}: {err}"))
}
