use std::sync::Arc ;

use crate::{ dev_loader, ScriptedFetcher };

#[tokio::test]
async fn prefetch_warms_cache() {

	let fetcher = Arc::new( ScriptedFetcher::echo() );
	let loader = dev_loader( &fetcher );

	loader.prefetch( "Remote" ).await.expect( "prefetch should succeed" );
	assert_eq!( fetcher.calls(), 1 );

	let handle = loader.load( "Remote" ).await.expect( "load should hit the warm cache" );
	assert_eq!( handle, "http://localhost:9005/Remote.container.bundle" );
	assert_eq!( fetcher.calls(), 1 );

}
