use std::sync::Arc ;

use crate::{ dev_loader, ScriptedFetcher };

#[tokio::test]
async fn concurrent_loads_share_one_fetch() {

	let fetcher = Arc::new( ScriptedFetcher::echo() );
	let loader = dev_loader( &fetcher );

	let ( first, second ) = tokio::join!( loader.load( "Remote" ), loader.load( "Remote" ));

	let first = first.expect( "first load should succeed" );
	let second = second.expect( "second load should succeed" );
	assert_eq!( first, second );
	assert_eq!( fetcher.calls(), 1, "concurrent loads must share one fetch" );

}
