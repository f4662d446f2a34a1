// In-memory rate providers for tests and offline use
pub mod mock;

// HTTP exchange-rate provider
pub mod rates;

// Persisted theme preference
pub mod theme;
