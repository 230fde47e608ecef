use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Circuit breaker type guarding one external lookup provider.
pub type ProviderBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Creates a circuit breaker for an external company-data provider.
///
/// # Configuration
///
/// - **Failure threshold**: 3 consecutive failures triggers OPEN state.
/// - **Backoff**: Exponential backoff from 30s to 300s before attempting recovery.
///
/// While the circuit is open, lookups are rejected without a network call and
/// the enrichment cascade moves straight to its next tier.
///
/// # Example
///
/// ```rust
/// use leadgen_pro::circuit_breaker::create_provider_circuit_breaker;
/// use failsafe::CircuitBreaker;
///
/// let breaker = create_provider_circuit_breaker();
/// assert!(breaker.is_call_permitted());
/// ```
pub fn create_provider_circuit_breaker() -> ProviderBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(30),  // Initial delay
        Duration::from_secs(300), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(3, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}
