//! A dynamic remote module loader for building federated modular applications.
//!
//! Hosts built from independently deployed feature modules need to turn an
//! abstract module name into running code at runtime: resolve the name to a
//! network location (which varies by platform, build environment, and
//! caller), download and execute the code unit exactly once, retry transient
//! failures under a bounded policy, and let the rest of the application
//! observe the process without being coupled to it. `remote_link` implements
//! exactly that loop, with the transport kept behind a trait so the crate
//! stays platform-agnostic.
//!
//! # Core Concepts
//!
//! - [`ModuleId`]: An opaque logical name for a dynamically loadable code
//! 	unit. The loader's cache, events, and public API are all keyed by it.
//!
//! - [`RemoteModuleLoader`]: The orchestrator. Guarantees at-most-one
//! 	fetch+execute per identifier no matter how many callers race, drives
//! 	the per-module state machine, and emits [`LifecycleEvent`]s at every
//! 	externally observable transition.
//!
//! - [`IdentifierResolver`] / [`HostConfig`]: A pure mapping from
//! 	`(identifier, caller, platform, environment)` to a [`ResolvedLocation`].
//! 	All environment knowledge is injected through [`HostConfig`]; there is
//! 	no global registry, so independent loaders can coexist in one process.
//!
//! - [`ModuleFetcher`]: The injected fetch/execute collaborator. It owns the
//! 	network and the execution of fetched code, including its own timeout.
//! 	Any async closure of the right shape implements it.
//!
//! - [`RetryPolicy`]: Bounded exponential backoff over the transient
//! 	failure codes ([`ErrorCode::NetworkError`], [`ErrorCode::Timeout`]).
//! 	Everything else fails on the first attempt.
//!
//! - **Container** / **chunk**: A container is a module's primary entry
//! 	code unit; a chunk is a secondary unit a container pulls in
//! 	transitively. Chunks run the same state machine but only the owning
//! 	container's lifecycle is visible on the event channel.
//!
//! # Example
//!
//! ```
//! use remote_link::{
//! 	Environment, FetchFailure, HostConfig, LifecycleEvent, RemoteModuleLoader,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = tokio::runtime::Builder::new_current_thread()
//! 	.enable_time()
//! 	.build()?;
//! runtime.block_on( async {
//!
//! 	// Base URLs per platform in development, one shared base in production.
//! 	let config = HostConfig::new( "https://cdn.example.com/modules" )
//! 		.with_platform( "ios", "http://localhost:9005" )
//! 		.with_platform( "android", "http://10.0.2.2:9006" );
//!
//! 	// The fetcher owns transport and execution. Here the "module" is just
//! 	// the URL it was fetched from; a real host would evaluate the bytes
//! 	// and hand back an entry point.
//! 	let loader = RemoteModuleLoader::new(
//! 		config,
//! 		"ios",
//! 		Environment::Dev,
//! 		| url: String | async move { Ok::<_, FetchFailure>( url ) },
//! 	);
//!
//! 	// Lifecycle observation is opt-in; callers that never subscribe just
//! 	// see the load resolve or reject.
//! 	let subscription = loader.subscribe( | event: &LifecycleEvent | {
//! 		println!( "module {}: {:?}", event.module_id(), event );
//! 	});
//!
//! 	let handle = loader.load( "Remote" ).await?;
//! 	assert_eq!( handle, "http://localhost:9005/Remote.container.bundle" );
//!
//! 	// A second load returns the cached handle with no new fetch.
//! 	let again = loader.load( "Remote" ).await?;
//! 	assert_eq!( again, handle );
//!
//! 	subscription.unsubscribe();
//! 	Ok::<(), remote_link::LoadError>(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Handling
//!
//! Failures are classified by [`ErrorCode`]. `NETWORK_ERROR` and `TIMEOUT`
//! are retried with exponential backoff (500ms base, doubling, 8s cap, three
//! attempts by default); `SCRIPT_ERROR`, `INIT_ERROR`, `UNKNOWN`, and
//! unresolvable identifiers are terminal immediately. Callers of
//! [`RemoteModuleLoader::load`] see none of this until the terminal outcome:
//! the future resolves with the handle or rejects with the last
//! [`LoadError`]. All intermediate activity is published as
//! [`LifecycleEvent`]s, which carry a schema version and a stable,
//! serde-serializable wire shape.
//!
//! # Unloading
//!
//! [`RemoteModuleLoader::unload`] is the only cancellation primitive. It
//! invalidates the cache entry and emits `UNLOADED`, but does not abort an
//! in-flight fetch: the orphaned operation runs to completion, delivers its
//! outcome to the callers that were already waiting, and is then discarded.
//! The next load of the identifier starts from scratch.

mod cache ;
mod config ;
mod error ;
mod event ;
mod fetcher ;
mod loader ;
mod module_id ;
mod resolver ;
mod retry ;

pub use cache::LoadState ;
pub use config::{ Environment, HostConfig, Platform, PlatformConfig };
pub use error::{ ErrorCode, FetchFailure, LoadError };
pub use event::{ EventChannel, LifecycleEvent, Subscription, EVENT_SCHEMA_VERSION };
pub use fetcher::ModuleFetcher ;
pub use loader::RemoteModuleLoader ;
pub use module_id::{ Caller, ModuleId };
pub use resolver::{ IdentifierResolver, LocationKind, ResolutionRequest, ResolveError, ResolvedLocation };
pub use retry::{ RetryDecision, RetryPolicy };
