use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Listing and mutation responses arrive as `{error, message, result}`.
#[derive(Deserialize, Debug)]
pub struct ResultEnvelope<T> {
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub result: T,
}

/// The auth endpoints (`login`, `me`) wrap their payload as `{data}` instead.
#[derive(Deserialize, Debug)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Deserialize, Debug)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub last_page: u32,
    #[serde(default)]
    pub current_page: Option<u32>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginResult {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ParticipantUser {
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Participant {
    pub id: i64,
    pub user: ParticipantUser,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Organizer {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Province {
    pub province_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct City {
    pub city_name_full: String,
    #[serde(default)]
    pub province: Option<Province>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sport_category: Category,
    pub activity_date: String,
    pub start_time: String,
    pub end_time: String,
    pub address: String,
    pub price: f64,
    pub price_discount: f64,
    pub slot: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub organizer: Option<Organizer>,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default)]
    pub map_url: Option<String>,
}

impl Activity {
    /// The struck-through reference price. `price` is the current price and
    /// `price_discount` the reference one (the upstream field naming is
    /// inverted); the reference is shown only when it exceeds `price`.
    pub fn reference_price(&self) -> Option<f64> {
        if self.price_discount > self.price {
            Some(self.price_discount)
        } else {
            None
        }
    }

    pub fn booked_slots(&self) -> u32 {
        self.participants.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.booked_slots() >= self.slot
    }
}

/// Payload for admin category create/update forms.
#[derive(Serialize, Debug, Clone)]
pub struct CategoryPayload {
    pub name: String,
}

/// Payload for admin activity create/update forms.
#[derive(Serialize, Debug, Clone)]
pub struct ActivityPayload {
    pub title: String,
    pub sport_category_id: i64,
    pub activity_date: String,
    pub start_time: String,
    pub end_time: String,
    pub address: String,
    pub price: f64,
    pub slot: u32,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Settlement states observed on the wire. The service uses `success` in the
/// admin status endpoint and `paid` in the user-facing listing for the same
/// settled-positive outcome; both literals pass through unchanged and map to
/// the same display tone. Unknown literals are carried opaquely.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Paid,
    Failed,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

/// Display tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Warning,
    Positive,
    Negative,
    Neutral,
}

impl TransactionStatus {
    /// Maps a wire literal to its variant; unknown literals pass through
    /// opaquely.
    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "pending" => TransactionStatus::Pending,
            "success" => TransactionStatus::Success,
            "paid" => TransactionStatus::Paid,
            "failed" => TransactionStatus::Failed,
            "cancelled" => TransactionStatus::Cancelled,
            other => TransactionStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Other(raw) => raw,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Pending)
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            TransactionStatus::Pending => StatusTone::Warning,
            TransactionStatus::Success | TransactionStatus::Paid => StatusTone::Positive,
            TransactionStatus::Failed | TransactionStatus::Cancelled => StatusTone::Negative,
            TransactionStatus::Other(_) => StatusTone::Neutral,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity subset embedded in a transaction's line item.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransactionActivity {
    pub activity_date: String,
    pub start_time: String,
    pub end_time: String,
    pub address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransactionItems {
    pub title: String,
    pub sport_activities: TransactionActivity,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub invoice_id: String,
    pub order_date: String,
    pub expired_date: String,
    pub total_amount: f64,
    pub status: TransactionStatus,
    #[serde(default)]
    pub proof_payment_url: Option<String>,
    pub transaction_items: TransactionItems,
}

#[derive(Serialize)]
pub struct UpdateStatusPayload {
    pub status: TransactionStatus,
}

#[derive(Serialize)]
pub struct UpdateProofPayload {
    pub proof_payment_url: String,
}
