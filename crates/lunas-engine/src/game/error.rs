/// Fatal errors raised while constructing a `Game`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// No surface is registered under the configured identifier.
    #[error("surface with id \"{id}\" not found")]
    SurfaceNotFound { id: String },

    /// Neither the modern nor the legacy context could be acquired.
    #[error("unable to acquire a graphics context")]
    NoContext,
}
