use cloudwait_provider::ResourceHandle;

use crate::error::FetchError;

/// One remote lookup per call.
///
/// Implementations return a freshly fetched representation every time and
/// never cache. A missing resource must be reported as
/// [`FetchError::NotFound`] so the poller can apply its not-found policy.
pub trait ResourceFetcher {
    /// Representation produced by a successful lookup.
    type Resource;

    /// Blocking lookup of `handle`.
    fn fetch(&self, handle: &ResourceHandle) -> Result<Self::Resource, FetchError>;
}

impl<F: ResourceFetcher + ?Sized> ResourceFetcher for &F {
    type Resource = F::Resource;

    fn fetch(&self, handle: &ResourceHandle) -> Result<Self::Resource, FetchError> {
        (**self).fetch(handle)
    }
}
