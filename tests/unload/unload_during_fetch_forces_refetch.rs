use std::sync::Arc ;
use std::time::Duration ;

use crate::{ dev_loader, ScriptedFetcher };

#[tokio::test( start_paused = true )]
async fn unload_during_fetch_forces_refetch() {

	let fetcher = Arc::new( ScriptedFetcher::echo().with_delay( Duration::from_millis( 100 )));
	let loader = dev_loader( &fetcher );

	let in_flight = loader.clone();
	let first = tokio::spawn( async move { in_flight.load( "Remote" ).await });
	tokio::time::sleep( Duration::from_millis( 10 )).await;
	assert_eq!( fetcher.calls(), 1 );

	// Unload while the first fetch is still in flight...
	loader.unload( &"Remote".into(), "replaced by test" );

	// ...and the very next load must start a fresh resolve+fetch rather
	// than joining the orphaned one.
	let second = loader.load( "Remote" ).await.expect( "fresh load should succeed" );
	assert_eq!( second, "http://localhost:9005/Remote.container.bundle" );
	assert_eq!( fetcher.calls(), 2 );

	// The orphaned operation still completed for its original caller.
	let first = first.await.expect( "task should not panic" );
	assert!( first.is_ok() );

}
