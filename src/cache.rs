//! In-memory registry of in-flight and completed loads.
//!
//! The cache guarantees at-most-one load record per module identifier and,
//! through it, at-most-one concurrent fetch+execute per identifier: the
//! check-then-create in [`ModuleCache::get_or_create`] happens under a single
//! lock acquisition with no suspension point in between, so concurrent
//! callers always converge on the same record.
//!
//! Records survive completion. A loaded record keeps serving its handle and
//! a terminally failed record keeps serving its error until the host
//! explicitly invalidates the entry.

use std::collections::HashMap ;
use std::sync::{ Arc, Mutex };

use tokio::sync::oneshot ;

use crate::error::LoadError ;
use crate::module_id::ModuleId ;
use crate::resolver::ResolvedLocation ;



/// Per-record position in the load state machine.
///
/// `Loaded` and `FailedTerminal` are terminal; a record never transitions
/// out of them except by explicit invalidation.
#[derive( Clone, Copy, Debug, Eq, PartialEq )]
pub enum LoadState {
    /// Record created, no attempt started yet.
    Pending,
    /// An attempt is computing the module's network location.
    Resolving,
    /// An attempt handed the resolved URL to the fetch/execute collaborator.
    Fetching,
    /// Terminal success: the handle is cached and served to all callers.
    Loaded,
    /// An attempt failed with a transient error; the retry delay is running.
    FailedRetrying,
    /// Terminal failure: the recorded error is served to all callers.
    FailedTerminal,
}

impl LoadState {
    /// Whether no further automatic transition occurs from this state.
    #[inline] pub fn is_terminal( self ) -> bool {
        matches!( self, LoadState::Loaded | LoadState::FailedTerminal )
    }
}

/// A waiter's half of a pending load outcome.
pub(crate) type Waiter<M> = oneshot::Sender<Result<M, LoadError>> ;

/// The mutable entity tracking one module's load, from first request to
/// explicit invalidation.
///
/// # Type Parameters
/// - `M`: Host-defined module handle type produced by the fetcher
#[derive( Debug )]
pub(crate) struct LoadRecord<M> {
    /// The module this record tracks
    id: ModuleId,
    /// Current state machine position
    pub(crate) state: LoadState,
    /// Attempts completed or in progress; monotonically non-decreasing
    pub(crate) attempt: u32,
    /// Location of the attempt currently fetching (or last fetched);
    /// secondary chunks of a loaded container resolve against its base
    pub(crate) resolved: Option<ResolvedLocation>,
    /// The cached handle, once loaded
    pub(crate) handle: Option<M>,
    /// The latest failure; cleared only when a retry succeeds
    pub(crate) error: Option<LoadError>,
    /// Callers awaiting the outcome, in registration order
    pub(crate) waiters: Vec<Waiter<M>>,
}

impl<M: Clone> LoadRecord<M> {

    fn new( id: ModuleId ) -> Self {
        Self {
            id,
            state: LoadState::Pending,
            attempt: 0,
            resolved: None,
            handle: None,
            error: None,
            waiters: Vec::new(),
        }
    }

    /// The module this record tracks.
    #[inline] pub fn id( &self ) -> &ModuleId { &self.id }

    /// Current state machine position.
    #[inline] pub fn state( &self ) -> LoadState { self.state }

    /// The cached handle, once loaded.
    #[inline] pub fn handle( &self ) -> Option<&M> { self.handle.as_ref() }

    /// The latest failure.
    #[inline] pub fn error( &self ) -> Option<&LoadError> { self.error.as_ref() }

    /// Registers a waiter for this record's outcome and returns its
    /// receiving half. Waiters resolve in registration order.
    pub(crate) fn register_waiter( &mut self ) -> oneshot::Receiver<Result<M, LoadError>> {
        let ( sender, receiver ) = oneshot::channel();
        self.waiters.push( sender );
        receiver
    }

    /// Enters the terminal success state and resolves all waiters FIFO.
    pub(crate) fn complete_loaded( &mut self, handle: M ) {
        self.state = LoadState::Loaded;
        self.error = None;
        self.handle = Some( handle );
        self.drain_waiters();
    }

    /// Enters the terminal failure state and rejects all waiters FIFO.
    pub(crate) fn complete_failed( &mut self, error: LoadError ) {
        self.state = LoadState::FailedTerminal;
        self.handle = None;
        self.error = Some( error );
        self.drain_waiters();
    }

    /// Delivers the terminal outcome to waiters in registration order.
    /// Receivers that gave up are skipped.
    pub(crate) fn drain_waiters( &mut self ) {
        let outcome: Result<M, LoadError> = match ( &self.handle, &self.error ) {
            ( Some( handle ), _ ) => Ok( handle.clone() ),
            ( None, Some( error )) => Err( error.clone() ),
            ( None, None ) => return,
        };
        for waiter in self.waiters.drain( .. ) {
            let _ = waiter.send( outcome.clone() );
        }
    }

}

type SharedRecord<M> = Arc<Mutex<LoadRecord<M>>> ;

/// Registry of load records, keyed by module identifier.
///
/// # Type Parameters
/// - `M`: Host-defined module handle type produced by the fetcher
#[derive( Debug )]
pub(crate) struct ModuleCache<M> {
    records: Mutex<HashMap<ModuleId, SharedRecord<M>>>,
}

impl<M: Clone> Default for ModuleCache<M> {
    fn default() -> Self { Self { records: Mutex::new( HashMap::new() )}}
}

impl<M: Clone> ModuleCache<M> {

    /// Creates an empty cache.
    pub fn new() -> Self { Self::default() }

    /// Returns the record for `id`, creating it in [`LoadState::Pending`] if
    /// absent. The boolean is `true` when this call created the record.
    ///
    /// Check and creation happen under one lock acquisition, so two
    /// concurrent callers can never both create a record for the same id.
    pub(crate) fn get_or_create( &self, id: &ModuleId ) -> ( SharedRecord<M>, bool ) {
        let mut records = self.records.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        match records.get( id ) {
            Some( record ) => ( Arc::clone( record ), false ),
            None => {
                let record = Arc::new( Mutex::new( LoadRecord::new( id.clone() )));
                records.insert( id.clone(), Arc::clone( &record ));
                ( record, true )
            }
        }
    }

    /// Returns the record for `id`, if one exists.
    pub(crate) fn get( &self, id: &ModuleId ) -> Option<SharedRecord<M>> {
        let records = self.records.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        records.get( id ).map( Arc::clone )
    }

    /// Removes the record for `id` regardless of state, returning it.
    ///
    /// An in-flight fetch for an invalidated id completes against the
    /// removed record: its result reaches the waiters registered before
    /// invalidation but is never written back into the cache.
    pub(crate) fn invalidate( &self, id: &ModuleId ) -> Option<SharedRecord<M>> {
        let mut records = self.records.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        records.remove( id )
    }

    /// Whether `record` is still the cache's current record for `id`.
    ///
    /// A driver task re-checks this after every suspension point; a stale
    /// record means the module was unloaded mid-flight and the task must
    /// not write back, emit, or retry.
    pub(crate) fn is_current( &self, id: &ModuleId, record: &SharedRecord<M> ) -> bool {
        let records = self.records.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        records.get( id ).is_some_and( | current | Arc::ptr_eq( current, record ))
    }

    /// Base URL the loaded container `id` resolved against, if `id` is a
    /// cached, successfully loaded record.
    pub(crate) fn loaded_base_url( &self, id: &ModuleId ) -> Option<String> {
        let record = self.get( id )?;
        let record = record.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        match record.state {
            LoadState::Loaded => record.resolved.as_ref().map( | location | location.base_url().to_string() ),
            _ => None,
        }
    }

}
