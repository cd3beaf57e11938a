use std::collections::VecDeque ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };
use std::time::Duration ;

use remote_link::{ Environment, FetchFailure, HostConfig, ModuleFetcher, RemoteModuleLoader };

/// Fetcher driven by a script of outcomes, one per attempt. Once the script
/// runs out it echoes the fetch URL back as the module handle. Counts every
/// invocation so tests can assert the at-most-one-fetch guarantee.
pub struct ScriptedFetcher {
	outcomes: Mutex<VecDeque<Result<String, FetchFailure>>>,
	delay: Option<Duration>,
	calls: AtomicUsize,
	urls: Mutex<Vec<String>>,
}

#[allow( dead_code )]
impl ScriptedFetcher {

	pub fn scripted( outcomes: impl IntoIterator<Item = Result<String, FetchFailure>> ) -> Self {
		Self {
			outcomes: Mutex::new( outcomes.into_iter().collect() ),
			delay: None,
			calls: AtomicUsize::new( 0 ),
			urls: Mutex::new( Vec::new() ),
		}
	}

	/// A fetcher that always succeeds, echoing the URL as the handle.
	pub fn echo() -> Self {
		Self::scripted( [] )
	}

	/// Makes every fetch take `delay` of (tokio) time before completing.
	pub fn with_delay( mut self, delay: Duration ) -> Self {
		self.delay = Some( delay );
		self
	}

	pub fn calls( &self ) -> usize {
		self.calls.load( Ordering::SeqCst )
	}

	pub fn fetched_urls( &self ) -> Vec<String> {
		self.urls.lock().unwrap().clone()
	}

}

#[async_trait::async_trait]
impl ModuleFetcher<String> for ScriptedFetcher {
	async fn fetch_and_execute( &self, url: &str ) -> Result<String, FetchFailure> {
		self.calls.fetch_add( 1, Ordering::SeqCst );
		self.urls.lock().unwrap().push( url.to_string() );
		if let Some( delay ) = self.delay {
			tokio::time::sleep( delay ).await;
		}
		let next = self.outcomes.lock().unwrap().pop_front();
		match next {
			Some( outcome ) => outcome,
			None => Ok( url.to_string() ),
		}
	}
}

/// Hands a shared fetcher to a loader through the closure seam, so the test
/// keeps its own handle for call-count and URL assertions.
#[allow( dead_code )]
pub fn share( fetcher: &Arc<ScriptedFetcher> ) -> impl ModuleFetcher<String> + 'static {
	let fetcher = Arc::clone( fetcher );
	move | url: String | {
		let fetcher = Arc::clone( &fetcher );
		async move { fetcher.fetch_and_execute( &url ).await }
	}
}

/// The standard test host: iOS development builds served from port 9005.
#[allow( dead_code )]
pub fn dev_loader( fetcher: &Arc<ScriptedFetcher> ) -> RemoteModuleLoader<String> {
	let config = HostConfig::new( "https://cdn.example.com/modules" )
		.with_platform( "ios", "http://localhost:9005" );
	RemoteModuleLoader::new( config, "ios", Environment::Dev, share( fetcher ))
}

/// Call at the top of a test to see loader tracing; filter with `RUST_LOG`.
#[allow( dead_code )]
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter( tracing_subscriber::EnvFilter::from_default_env() )
		.try_init();
}
