//! Lifecycle events and the channel that carries them.
//!
//! The loader announces every externally observable state transition as a
//! [`LifecycleEvent`] on a private [`EventChannel`]. Events are append-only
//! facts: emitted in transition order per module, never mutated, and tagged
//! with a schema version so consumers can evolve independently. A host that
//! wants these on a wider application bus subscribes here and re-emits.

use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::{ Arc, Mutex, Weak };
use std::time::{ SystemTime, UNIX_EPOCH };

use serde::{ Deserialize, Serialize };

use crate::error::ErrorCode ;
use crate::module_id::ModuleId ;



/// Version tag carried by every emitted event.
pub const EVENT_SCHEMA_VERSION: u32 = 1 ;

/// Milliseconds since the Unix epoch, for event timestamps.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since( UNIX_EPOCH )
        .map( | elapsed | u64::try_from( elapsed.as_millis() ).unwrap_or( u64::MAX ))
        .unwrap_or( 0 )
}

/// A loader lifecycle transition, as observed by subscribers.
///
/// The wire shape is stable: every variant carries `version`, `moduleId`,
/// and `timestamp`, plus the variant-specific fields below. Deserialization
/// tolerates unknown additional fields for forward compatibility.
#[derive( Clone, Debug, Serialize, Deserialize )]
#[serde( tag = "type", rename_all = "SCREAMING_SNAKE_CASE" )]
#[serde( rename_all_fields = "camelCase" )]
pub enum LifecycleEvent {
    /// A module's first load attempt began.
    LoadingStarted {
        /// Event schema version
        version: u32,
        /// The module being loaded
        module_id: ModuleId,
        /// Emission time, milliseconds since the Unix epoch
        timestamp: u64,
        /// When the load began; equals `timestamp` for this event
        started_at: u64,
    },
    /// A module reached its terminal success state.
    Loaded {
        /// Event schema version
        version: u32,
        /// The module that loaded
        module_id: ModuleId,
        /// Emission time, milliseconds since the Unix epoch
        timestamp: u64,
        /// The URL the module was fetched from
        url: String,
        /// Wall time from load start to success
        load_time_ms: u64,
    },
    /// A load attempt failed. Emitted per failed attempt; `will_retry`
    /// distinguishes an upcoming retry from the terminal failure.
    LoadFailed {
        /// Event schema version
        version: u32,
        /// The module whose load failed. For a chunk failure this is the
        /// owning container; the chunk itself is named in `chunk`.
        module_id: ModuleId,
        /// Emission time, milliseconds since the Unix epoch
        timestamp: u64,
        /// Failure classification
        code: ErrorCode,
        /// Human-readable description
        message: String,
        /// Attempts completed so far
        retry_count: u32,
        /// Whether another attempt is scheduled
        will_retry: bool,
        /// The failing secondary chunk, when the failure belongs to one
        #[serde( skip_serializing_if = "Option::is_none", default )]
        chunk: Option<ModuleId>,
    },
    /// A retry delay elapsed and another attempt is starting.
    Retrying {
        /// Event schema version
        version: u32,
        /// The module being retried
        module_id: ModuleId,
        /// Emission time, milliseconds since the Unix epoch
        timestamp: u64,
        /// The attempt number about to run (1-indexed)
        attempt: u32,
        /// The configured attempt bound
        max_attempts: u32,
        /// The delay that was applied before this attempt
        delay_ms: u64,
    },
    /// A module was explicitly unloaded and its cache entry invalidated.
    Unloaded {
        /// Event schema version
        version: u32,
        /// The module that was unloaded
        module_id: ModuleId,
        /// Emission time, milliseconds since the Unix epoch
        timestamp: u64,
        /// Host-supplied reason for the unload
        reason: String,
    },
}

impl LifecycleEvent {
    /// The module this event concerns.
    #[inline] pub fn module_id( &self ) -> &ModuleId {
        match self {
            LifecycleEvent::LoadingStarted { module_id, .. }
            | LifecycleEvent::Loaded { module_id, .. }
            | LifecycleEvent::LoadFailed { module_id, .. }
            | LifecycleEvent::Retrying { module_id, .. }
            | LifecycleEvent::Unloaded { module_id, .. } => module_id,
        }
    }
}

type Handler = Arc<dyn Fn( &LifecycleEvent ) + Send + Sync> ;

/// Subscription handle returned by [`EventChannel::subscribe`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to stop receiving events.
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Vec<( u64, Handler )>>>,
}

impl Subscription {
    /// Removes this subscriber from the channel.
    pub fn unsubscribe( self ) {
        if let Some( subscribers ) = self.subscribers.upgrade() {
            if let Ok( mut subscribers ) = subscribers.lock() {
                subscribers.retain( |( id, _ )| *id != self.id );
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        f.debug_struct( "Subscription" ).field( "id", &self.id ).finish_non_exhaustive()
    }
}

/// Typed publish/subscribe channel for lifecycle events.
///
/// Owned privately by a [`RemoteModuleLoader`]( crate::RemoteModuleLoader );
/// emission belongs solely to the loader, subscription is open to the host.
/// Handlers run synchronously on the emitting task, in subscription order.
/// The subscriber list is snapshotted before dispatch, so a handler may
/// subscribe, unsubscribe, or call back into the loader; subscribers added
/// during dispatch first see the next event.
#[derive( Default )]
pub struct EventChannel {
    subscribers: Arc<Mutex<Vec<( u64, Handler )>>>,
    next_id: AtomicU64,
}

impl EventChannel {

    /// Creates an empty channel.
    pub fn new() -> Self { Self::default() }

    /// Registers a handler for every subsequent event.
    pub fn subscribe( &self, handler: impl Fn( &LifecycleEvent ) + Send + Sync + 'static ) -> Subscription {
        let id = self.next_id.fetch_add( 1, Ordering::Relaxed );
        if let Ok( mut subscribers ) = self.subscribers.lock() {
            subscribers.push(( id, Arc::new( handler )));
        }
        Subscription { id, subscribers: Arc::downgrade( &self.subscribers )}
    }

    /// Delivers `event` to the subscribers registered at the time of the
    /// call. Handlers run outside the subscriber lock, so a handler may
    /// re-enter the channel (or the loader that owns it) freely.
    pub(crate) fn emit( &self, event: &LifecycleEvent ) {
        let handlers: Vec<Handler> = self.subscribers
            .lock()
            .map( | subscribers | subscribers.iter().map( |( _, handler )| Arc::clone( handler )).collect() )
            .unwrap_or_default();
        for handler in &handlers {
            handler( event );
        }
    }

}

impl std::fmt::Debug for EventChannel {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        let count = self.subscribers.lock().map( | subscribers | subscribers.len() ).unwrap_or( 0 );
        f.debug_struct( "EventChannel" ).field( "subscribers", &count ).finish()
    }
}
