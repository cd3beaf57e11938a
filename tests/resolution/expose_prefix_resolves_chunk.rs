use remote_link::{ Environment, LocationKind };

use crate::{ host_request, test_resolver };

#[test]
fn expose_prefix_resolves_chunk() {

	let resolver = test_resolver();

	// The expose prefix marks a chunk in every environment, caller or not.
	let dev = resolver
		.resolve( &host_request( "__expose_Remote", Environment::Dev ))
		.expect( "dev expose chunk should resolve" );
	assert_eq!( dev.kind(), LocationKind::Chunk );
	assert_eq!( dev.url(), "http://localhost:9005/__expose_Remote.chunk.bundle" );

	let prod = resolver
		.resolve( &host_request( "__expose_Remote", Environment::Prod ))
		.expect( "prod expose chunk should resolve" );
	assert_eq!( prod.kind(), LocationKind::Chunk );
	assert_eq!( prod.url(), "https://cdn.example.com/modules/__expose_Remote.chunk.bundle" );

}
