use std::sync::Arc ;

use remote_link::LoadState ;

use crate::{ dev_loader, EventRecorder, ScriptedFetcher };

#[tokio::test]
async fn cached_handle_fast_path() {

	let fetcher = Arc::new( ScriptedFetcher::echo() );
	let loader = dev_loader( &fetcher );
	let recorder = EventRecorder::attach( &loader );

	let first = loader.load( "Remote" ).await.expect( "load should succeed" );
	assert_eq!( first, "http://localhost:9005/Remote.container.bundle" );
	assert_eq!( recorder.kinds(), vec![ "LOADING_STARTED", "LOADED" ]);
	assert_eq!( loader.state( &"Remote".into() ), Some( LoadState::Loaded ));

	// A loaded record serves the cached handle: no resolution, no fetch,
	// and no new events.
	let second = loader.load( "Remote" ).await.expect( "cached load should succeed" );
	assert_eq!( second, first );
	assert_eq!( fetcher.calls(), 1 );
	assert_eq!( recorder.kinds(), vec![ "LOADING_STARTED", "LOADED" ]);

}
