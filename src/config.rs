//! Host configuration for identifier resolution.
//!
//! A [`HostConfig`] is supplied by the host at construction time and injected
//! into the resolver. It carries the per-platform development base URLs, the
//! production base URL, and the naming conventions that turn a module
//! identifier into a concrete artifact name. The loader never inspects
//! ambient global state; everything environment-dependent arrives here.

use std::collections::HashMap ;



/// Identifies the platform a host is running on (e.g., `"ios"`, `"android"`,
/// `"web"`). Platforms are named by the host, not enumerated by the loader.
#[derive( Clone, Debug, Eq, Hash, PartialEq )]
pub struct Platform( String );

impl Platform {
    /// Creates a new platform identifier.
    pub fn new( id: impl Into<String> ) -> Self { Self( id.into() )}

    /// The platform identifier as a string slice.
    #[inline] pub fn as_str( &self ) -> &str { &self.0 }
}

impl std::fmt::Display for Platform {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt( &self.0, f )
    }
}

impl From<&str> for Platform {
    fn from( id: &str ) -> Self { Self( id.to_string() )}
}

/// Build environment a resolution request targets.
#[derive( Clone, Copy, Debug, Eq, PartialEq )]
pub enum Environment {
    /// Development builds fetch from per-platform development servers.
    Dev,
    /// Production builds fetch from the single production base URL.
    Prod,
}

/// Per-platform resolution settings.
#[derive( Clone, Debug )]
pub struct PlatformConfig {
    /// Base URL of the development bundle server for this platform,
    /// e.g. `"http://localhost:9005"` for an iOS simulator.
    pub dev_base_url: String,
}

/// Resolution configuration supplied by the host.
///
/// Construct with [`HostConfig::new`] and the `with_*` builders. Suffix and
/// prefix conventions default to the common federated-bundle naming scheme.
///
/// # Example
///
/// ```
/// use remote_link::HostConfig ;
///
/// let config = HostConfig::new( "https://cdn.example.com/modules" )
///     .with_platform( "ios", "http://localhost:9005" )
///     .with_platform( "android", "http://10.0.2.2:9006" );
/// ```
#[derive( Clone, Debug )]
pub struct HostConfig {
    /// Development base URLs, keyed by platform
    platforms: HashMap<Platform, PlatformConfig>,
    /// Base URL all platforms share in production
    production_base_url: String,
    /// Suffix appended to a module identifier to name its container artifact
    container_suffix: String,
    /// Suffix appended to a module identifier to name a chunk artifact
    chunk_suffix: String,
    /// Identifier prefix marking an expose chunk, resolved as a chunk
    /// regardless of caller
    chunk_prefix: String,
}

impl HostConfig {

    /// Creates a configuration with the default naming conventions:
    /// `".container.bundle"`, `".chunk.bundle"`, and `"__expose_"`.
    pub fn new( production_base_url: impl Into<String> ) -> Self {
        Self {
            platforms: HashMap::new(),
            production_base_url: production_base_url.into(),
            container_suffix: ".container.bundle".to_string(),
            chunk_suffix: ".chunk.bundle".to_string(),
            chunk_prefix: "__expose_".to_string(),
        }
    }

    /// Registers a platform's development base URL.
    pub fn with_platform(
        mut self,
        platform: impl Into<Platform>,
        dev_base_url: impl Into<String>,
    ) -> Self {
        self.platforms.insert(
            platform.into(),
            PlatformConfig { dev_base_url: dev_base_url.into() },
        );
        self
    }

    /// Overrides the container artifact suffix.
    pub fn with_container_suffix( mut self, suffix: impl Into<String> ) -> Self {
        self.container_suffix = suffix.into();
        self
    }

    /// Overrides the chunk artifact suffix.
    pub fn with_chunk_suffix( mut self, suffix: impl Into<String> ) -> Self {
        self.chunk_suffix = suffix.into();
        self
    }

    /// Overrides the expose-chunk identifier prefix.
    pub fn with_chunk_prefix( mut self, prefix: impl Into<String> ) -> Self {
        self.chunk_prefix = prefix.into();
        self
    }

    /// Development settings for `platform`, if registered.
    #[inline] pub fn platform( &self, platform: &Platform ) -> Option<&PlatformConfig> {
        self.platforms.get( platform )
    }

    /// Base URL all platforms share in production.
    #[inline] pub fn production_base_url( &self ) -> &str { &self.production_base_url }

    /// Suffix naming container artifacts.
    #[inline] pub fn container_suffix( &self ) -> &str { &self.container_suffix }

    /// Suffix naming chunk artifacts.
    #[inline] pub fn chunk_suffix( &self ) -> &str { &self.chunk_suffix }

    /// Identifier prefix marking an expose chunk.
    #[inline] pub fn chunk_prefix( &self ) -> &str { &self.chunk_prefix }

}

impl From<Platform> for String {
    fn from( platform: Platform ) -> Self { platform.0 }
}
