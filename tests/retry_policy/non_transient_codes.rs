use remote_link::{ ErrorCode, RetryPolicy };

#[test]
fn non_transient_codes_never_retry() {

	let policy = RetryPolicy::default().with_max_attempts( 10 );

	for code in [
		ErrorCode::ScriptError,
		ErrorCode::InitError,
		ErrorCode::Unresolvable,
		ErrorCode::Unknown,
	] {
		let decision = policy.should_retry( code, 1 );
		assert!( !decision.retry, "{:?} must not be retried", code );
	}

}
