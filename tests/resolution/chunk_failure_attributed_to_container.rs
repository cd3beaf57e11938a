use std::sync::Arc ;

use remote_link::{ Caller, ErrorCode, FetchFailure, LifecycleEvent };

use crate::{ dev_loader, EventRecorder, ScriptedFetcher };

#[tokio::test]
async fn chunk_failure_attributed_to_container() {

	let fetcher = Arc::new( ScriptedFetcher::scripted([
		Ok( "shell".to_string() ),
		Err( FetchFailure::script( "unexpected token" )),
	]));
	let loader = dev_loader( &fetcher );
	let recorder = EventRecorder::attach( &loader );

	loader.load( "Shell" ).await.expect( "container should load" );

	let error = loader
		.load_for( "Extras", Caller::Module( "Shell".into() ))
		.await
		.expect_err( "chunk load should fail" );
	assert_eq!( error.code, ErrorCode::ScriptError );

	// The chunk's terminal failure is reported against its owning
	// container, with the chunk named separately.
	assert_eq!( recorder.kinds(), vec![ "LOADING_STARTED", "LOADED", "LOAD_FAILED" ]);
	match recorder.events().last() {
		Some( LifecycleEvent::LoadFailed { module_id, chunk, will_retry, .. } ) => {
			assert_eq!( module_id.as_str(), "Shell" );
			assert_eq!( chunk.as_ref().map( remote_link::ModuleId::as_str ), Some( "Extras" ));
			assert!( !will_retry );
		}
		event => panic!( "expected LoadFailed, found: {:?}", event ),
	}

}
