use std::sync::Arc ;
use std::time::Duration ;

use remote_link::{ ErrorCode, FetchFailure, LifecycleEvent };

use crate::{ dev_loader, EventRecorder, ScriptedFetcher };

#[tokio::test( start_paused = true )]
async fn network_failures_exhaust_attempts() {

	let fetcher = Arc::new( ScriptedFetcher::scripted([
		Err( FetchFailure::network( "connection refused" )),
		Err( FetchFailure::network( "connection refused" )),
		Err( FetchFailure::network( "connection refused" )),
	]));
	let loader = dev_loader( &fetcher );
	let recorder = EventRecorder::attach( &loader );

	let start = tokio::time::Instant::now();
	let error = loader.load( "Remote" ).await.expect_err( "load should exhaust attempts" );

	// Backoff is 500ms then 1000ms; the paused clock makes this exact.
	assert_eq!( start.elapsed(), Duration::from_millis( 1500 ));
	assert_eq!( fetcher.calls(), 3 );

	assert_eq!( error.code, ErrorCode::NetworkError );
	assert_eq!( error.retry_count, 3 );
	assert!( !error.will_retry );

	assert_eq!( recorder.kinds(), vec![
		"LOADING_STARTED",
		"LOAD_FAILED", "RETRYING",
		"LOAD_FAILED", "RETRYING",
		"LOAD_FAILED",
	]);

	let terminal_failures = recorder.events().iter()
		.filter( | event | matches!( event, LifecycleEvent::LoadFailed { will_retry: false, .. } ))
		.count();
	assert_eq!( terminal_failures, 1 );

}
