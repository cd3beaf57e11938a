//! The fetch/execute seam.
//!
//! The loader never touches the network or runs code itself; both are the
//! job of an injected [`ModuleFetcher`]. The collaborator owns its own
//! timeout and must surface expiry as
//! [`ErrorCode::Timeout`]( crate::ErrorCode::Timeout ); the loader imposes
//! no wall clock of its own beyond the retry policy's attempt bound.

use std::future::Future ;

use async_trait::async_trait ;

use crate::error::FetchFailure ;



/// Downloads and executes the code unit at `url`, producing a module handle.
///
/// Implementations classify their failures via [`FetchFailure`]; anything
/// they cannot classify should use [`FetchFailure::other`], which the loader
/// treats as not retryable.
///
/// Any `Fn( String ) -> impl Future<Output = Result<M, FetchFailure>>`
/// closure implements this trait, which keeps tests and small hosts free of
/// boilerplate:
///
/// ```
/// use remote_link::{ FetchFailure, ModuleFetcher };
///
/// async fn fetch( url: String ) -> Result<&'static str, FetchFailure> {
///     let _ = url;
///     Ok( "module" )
/// }
///
/// fn takes_fetcher( _fetcher: impl ModuleFetcher<&'static str> ) {}
/// takes_fetcher( fetch );
/// ```
///
/// # Type Parameters
/// - `M`: Host-defined module handle type
#[async_trait]
pub trait ModuleFetcher<M>: Send + Sync {
    /// Fetches the code unit at `url` and executes it once.
    ///
    /// # Errors
    /// Fails with a classified [`FetchFailure`] on any transport, execution,
    /// or initialization error.
    async fn fetch_and_execute( &self, url: &str ) -> Result<M, FetchFailure> ;
}

#[async_trait]
impl<M, F, Fut> ModuleFetcher<M> for F
where
    M: Send + 'static,
    F: Fn( String ) -> Fut + Send + Sync,
    Fut: Future<Output = Result<M, FetchFailure>> + Send,
{
    async fn fetch_and_execute( &self, url: &str ) -> Result<M, FetchFailure> {
        self( url.to_string() ).await
    }
}
