//! Domain constants
//!
//! Centralized location for defaults, wire codes and on-disk layout constants.

// Cache defaults
pub const DEFAULT_TTL_MS: i64 = 60 * 60 * 1000;
pub const DEFAULT_JSON_TTL_PROPERTY: &str = "ttl";
pub const STAGE_ACS_CURRENT: &str = "ACSCurrent";

// Backoff defaults
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_INITIAL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_RETRY_CAPACITY_MS: u64 = 10_000;

// Multi-region fetch
pub const DEFAULT_REQUEST_WAIT_TIMEOUT_MS: u64 = 10 * 60 * 1000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_ENDPOINT_PORT: u16 = 443;

// On-disk cache layout
pub const CACHE_FILE_PREFIX: &str = "stage_";
pub const CACHE_FILE_SUFFIX: &str = ".json";

// Outbound identification
pub const USER_AGENT: &str = "secretcache-rs";
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

// Service error codes
pub const ERROR_CODE_THROTTLING: &str = "Rejected.Throttling";
pub const ERROR_CODE_SERVICE_UNAVAILABLE: &str = "ServiceUnavailableTemporary";
pub const ERROR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";
pub const ERROR_CODE_READ_TIMEOUT: &str = "SDK.ReadTimeout";
pub const ERROR_CODE_TIMEOUT: &str = "SDK.TimeoutError";
pub const ERROR_CODE_SERVER_UNREACHABLE: &str = "SDK.ServerUnreachable";
pub const ERROR_CODE_IN_DEBT: &str = "Forbidden.InDebt";
pub const ERROR_CODE_IN_DEBT_OVERDUE: &str = "Forbidden.InDebtOverdue";
pub const ERROR_CODE_NOT_FOUND: &str = "Forbidden.ResourceNotFound";
