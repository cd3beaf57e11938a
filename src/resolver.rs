//! Identifier resolution.
//!
//! Resolution maps an abstract module identifier plus its request context to
//! a concrete network location. It is a pure function of the request and the
//! injected [`HostConfig`]: no global registry, no ambient platform probing,
//! no side effects. Multiple load attempts may resolve concurrently.

use thiserror::Error ;

use crate::config::{ Environment, HostConfig, Platform };
use crate::module_id::{ Caller, ModuleId };



/// Whether a resolved artifact is a module's primary entry point or a
/// secondary code unit requested transitively by a loading container.
#[derive( Clone, Copy, Debug, Eq, PartialEq )]
pub enum LocationKind {
    /// The primary entry code unit for a module.
    Container,
    /// A secondary code unit belonging to an already-loading container.
    Chunk,
}

/// One resolution attempt's full context.
///
/// Produced per attempt and never persisted. `caller_base_url` is filled in
/// by the loader when the caller is a successfully loaded container, so a
/// chunk resolves against the same base URL its container used without the
/// resolver reaching into the cache.
#[derive( Clone, Debug )]
pub struct ResolutionRequest {
    /// The module being resolved
    pub module_id: ModuleId,
    /// Who asked for it
    pub caller: Caller,
    /// Platform the host is running on
    pub platform: Platform,
    /// Build environment
    pub environment: Environment,
    /// Base URL the calling container resolved against, when the caller is
    /// a cached, successfully loaded container
    pub caller_base_url: Option<String>,
}

/// A concrete network location for one fetch attempt.
///
/// Immutable and single-use; a retry produces a fresh resolution.
#[derive( Clone, Debug, Eq, PartialEq )]
pub struct ResolvedLocation {
    url: String,
    kind: LocationKind,
    base_url: String,
}

impl ResolvedLocation {

    fn new( base: String, id: &ModuleId, suffix: &str, kind: LocationKind ) -> Self {
        Self {
            url: format!( "{}/{}{}", base, id, suffix ),
            kind,
            base_url: base,
        }
    }

    /// Fully qualified artifact URL.
    #[inline] pub fn url( &self ) -> &str { &self.url }

    /// Container or chunk.
    #[inline] pub fn kind( &self ) -> LocationKind { self.kind }

    /// The base URL this location was resolved against. Secondary chunks of
    /// a container resolve against the same base their container used.
    #[inline] pub fn base_url( &self ) -> &str { &self.base_url }

}

/// Resolution failures. All of these are fatal for the current load attempt:
/// if no location can be computed, retrying the network cannot help.
#[derive( Error, Debug, Clone, Eq, PartialEq )]
pub enum ResolveError {
    /// No development base URL is registered for the requesting platform.
    #[error( "no development base URL registered for platform '{0}'" )] UnknownPlatform( String ),
    /// The caller is a module that is not a successfully loaded container,
    /// so there is no base URL to resolve a secondary chunk against.
    #[error( "caller '{caller}' of '{module}' is not a loaded container" )] UnknownCaller {
        /// The module that could not be resolved
        module: String,
        /// The caller it was attributed to
        caller: String,
    },
}

/// Maps `(module identifier, caller, platform, environment)` to a network
/// location, using the conventions carried by an injected [`HostConfig`].
///
/// Stateless apart from the configuration; safe to share across concurrent
/// load attempts.
#[derive( Clone, Debug )]
pub struct IdentifierResolver {
    config: HostConfig,
}

impl IdentifierResolver {

    /// Creates a resolver over the given host configuration.
    pub fn new( config: HostConfig ) -> Self { Self { config }}

    /// The configuration this resolver was constructed with.
    #[inline] pub fn config( &self ) -> &HostConfig { &self.config }

    /// Base URL a request of this platform and environment resolves against.
    ///
    /// # Errors
    /// Fails when the environment is [`Environment::Dev`] and no development
    /// base URL is registered for the platform.
    fn environment_base( &self, request: &ResolutionRequest ) -> Result<String, ResolveError> {
        match request.environment {
            Environment::Prod => Ok( self.config.production_base_url().to_string() ),
            Environment::Dev => self.config
                .platform( &request.platform )
                .map( | platform | platform.dev_base_url.clone() )
                .ok_or_else( || ResolveError::UnknownPlatform( request.platform.to_string() )),
        }
    }

    /// Resolves a request to a concrete location.
    ///
    /// Rules, in priority order: identifiers carrying the expose-chunk prefix
    /// resolve as chunks regardless of caller; host requests resolve as
    /// containers; module requests resolve as chunks against the base URL
    /// their calling container used.
    ///
    /// # Errors
    /// Fails when no base URL exists for the platform/environment, or when a
    /// module caller is not a loaded container. Both are fatal for the load:
    /// the location itself, not the network, is the problem.
    pub fn resolve( &self, request: &ResolutionRequest ) -> Result<ResolvedLocation, ResolveError> {

        let id = &request.module_id;

        if id.as_str().starts_with( self.config.chunk_prefix() ) {
            let base = self.environment_base( request )?;
            return Ok( ResolvedLocation::new( base, id, self.config.chunk_suffix(), LocationKind::Chunk ));
        }

        match &request.caller {
            Caller::Host => {
                let base = self.environment_base( request )?;
                Ok( ResolvedLocation::new( base, id, self.config.container_suffix(), LocationKind::Container ))
            }
            Caller::Module( caller_id ) => match &request.caller_base_url {
                Some( base ) => Ok( ResolvedLocation::new(
                    base.clone(), id, self.config.chunk_suffix(), LocationKind::Chunk,
                )),
                None => Err( ResolveError::UnknownCaller {
                    module: id.to_string(),
                    caller: caller_id.to_string(),
                }),
            },
        }

    }

}
