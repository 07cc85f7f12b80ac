//! Fixed values shared by the fetcher, the renderer and the cache.

/// PRODID of every generated calendar.
pub const PRODID: &str = "-//obtuse.kr//SchoolScheduleToICS//KO";

/// The only timezone NEIS schedules are published in.
pub const TZID: &str = "Asia/Seoul";

/// Suffix appended to the school name in X-WR-CALNAME.
pub const CALNAME_SUFFIX: &str = "학사일정";

/// Custom calendar property recording when a document was rendered.
pub const CREATED_TIME_PROPERTY: &str = "X-CREATED-TIME";

/// Compact UTC format used for X-CREATED-TIME and DTSTAMP.
pub const CREATED_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub const DEFAULT_API_BASE_URL: &str = "https://open.neis.go.kr";

/// Path of the school schedule dataset on the NEIS Open API.
pub const SCHOOL_SCHEDULE_PATH: &str = "/hub/SchoolSchedule";

/// Rows requested per call; one academic year fits comfortably.
pub const PAGE_SIZE: u32 = 1000;

/// NEIS result code for a successful query.
pub const NEIS_OK: &str = "INFO-000";

/// NEIS result code for a query that matched no rows.
pub const NEIS_NO_DATA: &str = "INFO-200";

/// Value shipped in sample configs; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

pub const DEFAULT_CACHE_DAYS: u32 = 7;
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3007";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
