use std::sync::Arc ;

use remote_link::LifecycleEvent ;

use crate::{ dev_loader, EventRecorder, ScriptedFetcher };

#[tokio::test]
async fn unload_emits_event() {

	let fetcher = Arc::new( ScriptedFetcher::echo() );
	let loader = dev_loader( &fetcher );
	let recorder = EventRecorder::attach( &loader );

	loader.load( "Remote" ).await.expect( "load should succeed" );
	loader.unload( &"Remote".into(), "feature disabled" );

	assert_eq!( loader.state( &"Remote".into() ), None );
	match recorder.events().last() {
		Some( LifecycleEvent::Unloaded { module_id, reason, .. } ) => {
			assert_eq!( module_id.as_str(), "Remote" );
			assert_eq!( reason, "feature disabled" );
		}
		event => panic!( "expected Unloaded, found: {:?}", event ),
	}

	// Unloading an id with no record is a no-op with no event.
	loader.unload( &"Remote".into(), "again" );
	assert_eq!( recorder.kinds(), vec![ "LOADING_STARTED", "LOADED", "UNLOADED" ]);

	// The next load starts from scratch.
	loader.load( "Remote" ).await.expect( "reload should succeed" );
	assert_eq!( fetcher.calls(), 2 );

}
