/// Default page size for file listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Content type sent to the object store when the upload part carries none
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Allowance on top of the file size limit for multipart boundaries and part headers
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;
