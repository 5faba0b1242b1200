//! Fixed test IDs and secrets for deterministic tests

use uuid::Uuid;

// User IDs (100-199)
pub const TEST_USER_ALICE: Uuid = Uuid::from_u128(100);

// Room IDs
pub const TEST_ROOM_UNKNOWN: &str = "zzz999";
pub const TEST_ROOM_INVALID: &str = "not-a-room";

/// Signing secret the test server is configured with.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-do-not-use-in-production-0123";

/// A different secret of valid length, for forged tokens.
pub const TEST_OTHER_JWT_SECRET: &str = "some-other-secret-that-the-server-never-saw-99";
