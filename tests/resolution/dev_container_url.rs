use remote_link::{ Environment, LocationKind };

use crate::{ host_request, test_resolver };

#[test]
fn dev_container_url() {

	let resolver = test_resolver();
	let location = resolver
		.resolve( &host_request( "Remote", Environment::Dev ))
		.expect( "dev host request should resolve" );

	assert_eq!( location.url(), "http://localhost:9005/Remote.container.bundle" );
	assert_eq!( location.kind(), LocationKind::Container );
	assert_eq!( location.base_url(), "http://localhost:9005" );

}
