use std::sync::Arc ;
use std::time::Duration ;

use remote_link::FetchFailure ;

use crate::{ dev_loader, EventRecorder, ScriptedFetcher };

#[tokio::test( start_paused = true )]
async fn late_result_reaches_prior_waiters() {

	let fetcher = Arc::new(
		ScriptedFetcher::scripted([ Err( FetchFailure::script( "bad bundle" )) ])
			.with_delay( Duration::from_millis( 100 )),
	);
	let loader = dev_loader( &fetcher );
	let recorder = EventRecorder::attach( &loader );

	let in_flight = loader.clone();
	let waiter = tokio::spawn( async move { in_flight.load( "Remote" ).await });
	tokio::time::sleep( Duration::from_millis( 10 )).await;

	loader.unload( &"Remote".into(), "host teardown" );

	// The waiter registered before the unload still receives the orphaned
	// fetch's outcome, but nothing about it reaches the event channel.
	let outcome = waiter.await.expect( "task should not panic" );
	assert!( outcome.is_err() );
	assert_eq!( recorder.kinds(), vec![ "LOADING_STARTED", "UNLOADED" ]);

}
