//! The load orchestrator.
//!
//! [`RemoteModuleLoader`] drives the per-module state machine:
//!
//! ```text
//! PENDING -> RESOLVING -> FETCHING -> LOADED
//!                |            |
//!                |            +-> FAILED_RETRYING -> RESOLVING (attempt += 1)
//!                |            |
//!                +------------+-> FAILED_TERMINAL
//! ```
//!
//! Each first request for a module spawns one driver task that owns every
//! transition for that module's record. Concurrent callers register waiters
//! on the shared record and receive the same eventual outcome, so a module
//! is fetched at most once no matter how many callers race. State is only
//! touched between suspension points, and the driver re-checks that its
//! record is still the cache's current one after every suspension, which is
//! what makes `unload` safe against in-flight operations.

use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };

use tracing::{ debug, info, warn };

use crate::cache::{ LoadRecord, LoadState, ModuleCache };
use crate::config::{ Environment, HostConfig, Platform };
use crate::error::{ ErrorCode, LoadError };
use crate::event::{ now_ms, EventChannel, LifecycleEvent, Subscription, EVENT_SCHEMA_VERSION };
use crate::fetcher::ModuleFetcher ;
use crate::module_id::{ Caller, ModuleId };
use crate::resolver::{ IdentifierResolver, ResolutionRequest };
use crate::retry::RetryPolicy ;



struct Inner<M> {
    resolver: IdentifierResolver,
    retry: RetryPolicy,
    fetcher: Arc<dyn ModuleFetcher<M>>,
    cache: ModuleCache<M>,
    events: EventChannel,
    platform: Platform,
    environment: Environment,
}

/// Loads remote modules: resolves identifiers to locations, fetches and
/// executes each module at most once, retries transient failures under a
/// bounded policy, and publishes lifecycle events.
///
/// Cloning the loader is cheap and yields another handle onto the same cache
/// and event channel. Independent loaders (e.g., in tests) do not share any
/// state.
///
/// # Type Parameters
/// - `M`: Host-defined module handle type produced by the fetcher
pub struct RemoteModuleLoader<M> {
    inner: Arc<Inner<M>>,
}

impl<M> Clone for RemoteModuleLoader<M> {
    fn clone( &self ) -> Self { Self { inner: Arc::clone( &self.inner )}}
}

impl<M> std::fmt::Debug for RemoteModuleLoader<M> {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        f.debug_struct( "RemoteModuleLoader" )
            .field( "platform", &self.inner.platform )
            .field( "environment", &self.inner.environment )
            .finish_non_exhaustive()
    }
}

fn lock<T>( record: &Mutex<T> ) -> MutexGuard<'_, T> {
    record.lock().unwrap_or_else( PoisonError::into_inner )
}

impl<M> RemoteModuleLoader<M>
where
    M: Clone + Send + 'static,
{

    /// Creates a loader for the given platform and environment.
    ///
    /// The platform identifier and the development/production switch come
    /// from the host's build configuration; the loader never inspects
    /// ambient state to discover them.
    pub fn new(
        config: HostConfig,
        platform: impl Into<Platform>,
        environment: Environment,
        fetcher: impl ModuleFetcher<M> + 'static,
    ) -> Self {
        Self {
            inner: Arc::new( Inner {
                resolver: IdentifierResolver::new( config ),
                retry: RetryPolicy::default(),
                fetcher: Arc::new( fetcher ),
                cache: ModuleCache::new(),
                events: EventChannel::new(),
                platform: platform.into(),
                environment,
            }),
        }
    }

    /// Replaces the default retry policy.
    ///
    /// Only meaningful before the first load; records already in flight keep
    /// the policy they started with. Callable only while this is the sole
    /// handle onto the loader.
    ///
    /// # Panics
    /// Panics if the loader has already been cloned or has spawned work.
    pub fn with_retry_policy( mut self, retry: RetryPolicy ) -> Self {
        let inner = Arc::get_mut( &mut self.inner )
            .expect( "with_retry_policy requires a loader with no other handles" );
        inner.retry = retry;
        self
    }

    /// Registers a handler for lifecycle events.
    ///
    /// Handlers run synchronously on the emitting task in subscription
    /// order. A handler may call back into the loader, including
    /// [`unload`]( Self::unload ).
    pub fn subscribe( &self, handler: impl Fn( &LifecycleEvent ) + Send + Sync + 'static ) -> Subscription {
        self.inner.events.subscribe( handler )
    }

    /// Current state of a module's load record, if one exists.
    pub fn state( &self, module_id: &ModuleId ) -> Option<LoadState> {
        self.inner.cache.get( module_id ).map( | record | lock( &record ).state() )
    }

    /// Loads a module on behalf of the host.
    ///
    /// Returns the cached handle immediately (no resolution, fetch, or
    /// events) when the module is already loaded. Otherwise joins the
    /// in-flight load, or starts one, and resolves once a terminal state is
    /// reached. Retries are invisible here; observe them via
    /// [`subscribe`]( Self::subscribe ).
    ///
    /// # Errors
    /// Fails with the terminal [`LoadError`] once the record reaches
    /// `FAILED_TERMINAL`. A terminally failed record keeps rejecting
    /// subsequent calls with the recorded error until it is unloaded.
    pub async fn load( &self, module_id: impl Into<ModuleId> ) -> Result<M, LoadError> {
        self.load_for( module_id, Caller::Host ).await
    }

    /// Loads a module on behalf of an explicit caller.
    ///
    /// Module callers mark the request as a secondary chunk of the calling
    /// container: the chunk resolves against the container's base URL, its
    /// lifecycle stays off the public event channel, and a terminal failure
    /// is attributed to the container.
    ///
    /// # Errors
    /// As [`load`]( Self::load ).
    pub async fn load_for( &self, module_id: impl Into<ModuleId>, caller: Caller ) -> Result<M, LoadError> {

        let module_id = module_id.into();

        let receiver = {
            let ( record, created ) = self.inner.cache.get_or_create( &module_id );
            let mut guard = lock( &record );
            match guard.state() {
                LoadState::Loaded => {
                    if let Some( handle ) = guard.handle() {
                        return Ok( handle.clone() );
                    }
                }
                LoadState::FailedTerminal => {
                    if let Some( error ) = guard.error() {
                        return Err( error.clone() );
                    }
                }
                _ => {}
            }
            let receiver = guard.register_waiter();
            drop( guard );
            if created {
                let inner = Arc::clone( &self.inner );
                let id = module_id.clone();
                tokio::spawn( async move {
                    drive( inner, id, caller, record ).await;
                });
            }
            receiver
        };

        match receiver.await {
            Ok( outcome ) => outcome,
            // The driver dropped its waiters without delivering an outcome.
            // Only reachable if the driver task itself was torn down.
            Err( _ ) => Err( LoadError {
                code: ErrorCode::Unknown,
                message: format!( "load of '{}' was abandoned", module_id ),
                retry_count: 0,
                will_retry: false,
            }),
        }

    }

    /// Warms the cache: same as [`load`]( Self::load ) but discards the
    /// handle.
    ///
    /// # Errors
    /// As [`load`]( Self::load ).
    pub async fn prefetch( &self, module_id: impl Into<ModuleId> ) -> Result<(), LoadError> {
        self.load( module_id ).await.map( |_| () )
    }

    /// Removes a module's record from the cache, whatever its state, and
    /// emits `UNLOADED`.
    ///
    /// An in-flight fetch is not aborted: it runs to completion, delivers
    /// its outcome to the waiters that were registered before this call,
    /// and is then discarded without touching the cache. A record waiting
    /// out a retry delay never re-enters resolution. The next `load` for
    /// the identifier starts from scratch.
    pub fn unload( &self, module_id: &ModuleId, reason: impl Into<String> ) {
        match self.inner.cache.invalidate( module_id ) {
            None => debug!( module = %module_id, "unload requested for unknown module" ),
            Some( record ) => {
                let state = lock( &record ).state();
                let reason = reason.into();
                info!( module = %module_id, ?state, reason = %reason, "module unloaded" );
                self.inner.events.emit( &LifecycleEvent::Unloaded {
                    version: EVENT_SCHEMA_VERSION,
                    module_id: module_id.clone(),
                    timestamp: now_ms(),
                    reason,
                });
            }
        }
    }

}

/// Drives one record from `PENDING` to a terminal state. Exactly one driver
/// exists per record; every suspension point is followed by a currency
/// check so an unloaded record is never written back or retried.
async fn drive<M: Clone + Send + 'static>(
    inner: Arc<Inner<M>>,
    module_id: ModuleId,
    caller: Caller,
    record: Arc<Mutex<LoadRecord<M>>>,
) {

    // Chunk loads run the same machine but stay off the public channel:
    // only the owning container's lifecycle is externally observable.
    let chunk_prefixed = module_id.as_str().starts_with( inner.resolver.config().chunk_prefix() );
    let observable = caller == Caller::Host && !chunk_prefixed;

    let started = tokio::time::Instant::now();

    // The spawn itself is a suspension point; the module may already have
    // been unloaded before the driver first ran. Nothing has started yet,
    // so no load event precedes or follows the unload.
    if !inner.cache.is_current( &module_id, &record ) {
        reject_orphan( &record );
        return;
    }

    {
        let mut guard = lock( &record );
        guard.state = LoadState::Resolving;
        guard.attempt = 1;
    }

    if observable {
        inner.events.emit( &LifecycleEvent::LoadingStarted {
            version: EVENT_SCHEMA_VERSION,
            module_id: module_id.clone(),
            timestamp: now_ms(),
            started_at: now_ms(),
        });
    } else {
        debug!( module = %module_id, caller = ?caller, "chunk load started" );
    }

    loop {

        let attempt = lock( &record ).attempt;
        let request = ResolutionRequest {
            module_id: module_id.clone(),
            caller: caller.clone(),
            platform: inner.platform.clone(),
            environment: inner.environment,
            caller_base_url: caller.module_id()
                .and_then( | caller_id | inner.cache.loaded_base_url( caller_id )),
        };

        let location = match inner.resolver.resolve( &request ) {
            Ok( location ) => location,
            Err( resolve_error ) => {
                let error = LoadError {
                    code: ErrorCode::Unresolvable,
                    message: resolve_error.to_string(),
                    retry_count: attempt,
                    will_retry: false,
                };
                warn!( module = %module_id, error = %resolve_error, "resolution failed" );
                emit_failure( &inner, &module_id, &caller, observable, &error );
                lock( &record ).complete_failed( error );
                return;
            }
        };

        {
            let mut guard = lock( &record );
            guard.state = LoadState::Fetching;
            guard.resolved = Some( location.clone() );
        }
        debug!( module = %module_id, url = %location.url(), attempt, "fetching" );

        let outcome = inner.fetcher.fetch_and_execute( location.url() ).await;
        let current = inner.cache.is_current( &module_id, &record );

        match outcome {

            Ok( handle ) => {
                if current {
                    let load_time_ms = u64::try_from( started.elapsed().as_millis() ).unwrap_or( u64::MAX );
                    if observable {
                        inner.events.emit( &LifecycleEvent::Loaded {
                            version: EVENT_SCHEMA_VERSION,
                            module_id: module_id.clone(),
                            timestamp: now_ms(),
                            url: location.url().to_string(),
                            load_time_ms,
                        });
                    }
                    info!( module = %module_id, url = %location.url(), load_time_ms, "module loaded" );
                } else {
                    debug!( module = %module_id, "load completed after unload; result discarded" );
                }
                // Always delivered: waiters registered before an unload
                // still receive the late outcome.
                lock( &record ).complete_loaded( handle );
                return;
            }

            Err( failure ) => {
                let decision = inner.retry.should_retry( failure.code, attempt );
                let error = LoadError {
                    code: failure.code,
                    message: failure.message,
                    retry_count: attempt,
                    will_retry: current && decision.retry,
                };

                if !current {
                    debug!( module = %module_id, "load failed after unload; result discarded" );
                    lock( &record ).complete_failed( error );
                    return;
                }

                warn!(
                    module = %module_id,
                    code = ?error.code,
                    attempt,
                    will_retry = error.will_retry,
                    "load attempt failed: {}", error.message,
                );
                lock( &record ).error = Some( error.clone() );
                if observable || !error.will_retry {
                    emit_failure( &inner, &module_id, &caller, observable, &error );
                }

                if !error.will_retry {
                    lock( &record ).complete_failed( error );
                    return;
                }

                lock( &record ).state = LoadState::FailedRetrying;
                tokio::time::sleep( decision.delay ).await;

                if !inner.cache.is_current( &module_id, &record ) {
                    debug!( module = %module_id, "unloaded during retry delay; giving up" );
                    reject_orphan( &record );
                    return;
                }

                let next_attempt = {
                    let mut guard = lock( &record );
                    guard.attempt += 1;
                    guard.state = LoadState::Resolving;
                    guard.attempt
                };
                if observable {
                    inner.events.emit( &LifecycleEvent::Retrying {
                        version: EVENT_SCHEMA_VERSION,
                        module_id: module_id.clone(),
                        timestamp: now_ms(),
                        attempt: next_attempt,
                        max_attempts: inner.retry.max_attempts(),
                        delay_ms: u64::try_from( decision.delay.as_millis() ).unwrap_or( u64::MAX ),
                    });
                } else {
                    debug!( module = %module_id, attempt = next_attempt, "retrying chunk load" );
                }
            }

        }

    }

}

/// Emits a `LOAD_FAILED` event. A chunk's terminal failure is reported as a
/// failure of its requesting container, with the chunk named separately.
fn emit_failure<M>(
    inner: &Inner<M>,
    module_id: &ModuleId,
    caller: &Caller,
    observable: bool,
    error: &LoadError,
) {
    let ( reported_id, chunk ) = match observable {
        true => ( module_id.clone(), None ),
        false => (
            caller.module_id().unwrap_or( module_id ).clone(),
            Some( module_id.clone() ),
        ),
    };
    inner.events.emit( &LifecycleEvent::LoadFailed {
        version: EVENT_SCHEMA_VERSION,
        module_id: reported_id,
        timestamp: now_ms(),
        code: error.code,
        message: error.message.clone(),
        retry_count: error.retry_count,
        will_retry: error.will_retry,
        chunk,
    });
}

/// Rejects the waiters of a record that was unloaded while no fetch was in
/// flight. The record is already out of the cache, so this reaches exactly
/// the waiters registered before the unload.
fn reject_orphan<M: Clone>( record: &Mutex<LoadRecord<M>> ) {
    let mut guard = lock( record );
    let error = match guard.error() {
        Some( error ) => LoadError { will_retry: false, ..error.clone() },
        None => LoadError {
            code: ErrorCode::Unknown,
            message: format!( "'{}' was unloaded before its load completed", guard.id() ),
            retry_count: guard.attempt,
            will_retry: false,
        },
    };
    guard.complete_failed( error );
}
