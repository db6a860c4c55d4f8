// Remote service
pub const DEFAULT_API_BASE: &str =
    "https://sport-reservation-api-bootcamp.do.dibimbing.id/api/v1";

// Listing defaults
pub const FIRST_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 5;

// Notification banners auto-dismiss after this many seconds
pub const NOTIFICATION_TTL_SECONDS: i64 = 3;

// Proof-of-payment uploads
pub const ALLOWED_PROOF_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

// Roles reported by the `me` endpoint
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

// Banner messages
pub const MSG_TRANSACTION_CANCELLED: &str = "Transaction cancelled successfully";
pub const MSG_PROOF_UPDATED: &str = "Payment proof updated successfully";

// Error messages
pub const ERR_FETCH_TRANSACTIONS: &str = "Failed to fetch transactions";
pub const ERR_CANCEL_TRANSACTION: &str = "Failed to cancel transaction";
pub const ERR_UPLOAD_PROOF: &str = "Failed to upload payment proof";
pub const ERR_UPDATE_PROOF: &str = "Failed to update payment proof";
