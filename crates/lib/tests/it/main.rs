/*! Integration tests for the Mentora client.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - creds: Tests for credential storage implementations
 * - session: Tests for the session state machine lifecycle and login paths
 * - resources: Tests for the resource clients and cache invalidation
 *
 * Remote behavior is simulated by a stub API server (see `helpers`) bound to
 * an ephemeral port per test.
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mentora=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}
