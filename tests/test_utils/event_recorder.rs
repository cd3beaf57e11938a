// Included alongside scripted_fetcher.rs, which already imports the loader
// types; keep paths qualified here to avoid clashing imports.

use remote_link::LifecycleEvent ;

/// Subscribes to a loader and records every event it emits, in order.
pub struct EventRecorder {
	events: std::sync::Arc<std::sync::Mutex<Vec<LifecycleEvent>>>,
}

#[allow( dead_code )]
impl EventRecorder {

	pub fn attach<M: Clone + Send + 'static>( loader: &remote_link::RemoteModuleLoader<M> ) -> Self {
		let events = std::sync::Arc::new( std::sync::Mutex::new( Vec::new() ));
		let sink = std::sync::Arc::clone( &events );
		// Dropping the subscription handle keeps the subscription alive.
		let _ = loader.subscribe( move | event | sink.lock().unwrap().push( event.clone() ));
		Self { events }
	}

	pub fn events( &self ) -> Vec<LifecycleEvent> {
		self.events.lock().unwrap().clone()
	}

	/// Event kinds in emission order, for order assertions.
	pub fn kinds( &self ) -> Vec<&'static str> {
		self.events.lock().unwrap().iter()
			.map( | event | match event {
				LifecycleEvent::LoadingStarted { .. } => "LOADING_STARTED",
				LifecycleEvent::Loaded { .. } => "LOADED",
				LifecycleEvent::LoadFailed { .. } => "LOAD_FAILED",
				LifecycleEvent::Retrying { .. } => "RETRYING",
				LifecycleEvent::Unloaded { .. } => "UNLOADED",
			})
			.collect()
	}

}
