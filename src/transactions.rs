use time::{Duration, OffsetDateTime};
use tracing::error;

use crate::api::ApiClient;
use crate::constants::{
    ERR_CANCEL_TRANSACTION, ERR_FETCH_TRANSACTIONS, ERR_UPDATE_PROOF, ERR_UPLOAD_PROOF,
    MSG_PROOF_UPDATED, MSG_TRANSACTION_CANCELLED, NOTIFICATION_TTL_SECONDS,
};
use crate::error::ClientError;
use crate::format::parse_remote_date;
use crate::models::{Transaction, TransactionStatus};
use crate::proof::{ProofRequest, ProofUpload};
use crate::requests::{FetchGuard, FetchTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionScope {
    /// The authenticated user's own transactions.
    Mine,
    /// Every transaction, for the admin view.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient banner shown after a lifecycle action, auto-dismissed once its
/// deadline passes. Expiry is checked lazily on read rather than by timer.
#[derive(Debug, Clone)]
pub struct Notification {
    message: String,
    kind: NotificationKind,
    expires_at: OffsetDateTime,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind, ttl_seconds: i64) -> Self {
        Notification {
            message: message.into(),
            kind,
            expires_at: OffsetDateTime::now_utc() + Duration::seconds(ttl_seconds),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() >= self.expires_at
    }
}

/// Proof that a cancel is reachable: only a transaction currently in
/// `pending` yields one, which makes cancelling anything else impossible to
/// express rather than merely rejected.
#[derive(Debug, Clone, Copy)]
pub struct CancelRequest {
    transaction_id: i64,
}

impl CancelRequest {
    pub fn transaction_id(&self) -> i64 {
        self.transaction_id
    }
}

/// Owns the in-memory transaction collection for the lifetime of the view
/// and applies every lifecycle transition against it. The collection is
/// rebuilt wholesale on each successful list fetch, so positions are not
/// stable across refetches; only `id` is.
pub struct TransactionManager {
    client: ApiClient,
    scope: TransactionScope,
    transactions: Vec<Transaction>,
    sort_ascending: bool,
    notification: Option<Notification>,
    last_error: Option<String>,
    list_guard: FetchGuard,
    proof: Option<ProofUpload>,
}

impl TransactionManager {
    pub fn new(client: ApiClient, scope: TransactionScope) -> Self {
        TransactionManager {
            client,
            scope,
            transactions: Vec::new(),
            // First sort invocation orders newest-first; each call flips
            // the direction applied by the next one.
            sort_ascending: false,
            notification: None,
            last_error: None,
            list_guard: FetchGuard::default(),
            proof: None,
        }
    }

    pub fn scope(&self) -> TransactionScope {
        self.scope
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, transaction_id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == transaction_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn active_notification(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| !n.is_expired())
    }

    /// Drops an expired banner. Front ends call this on each render pass,
    /// the same way expired pending state is swept lazily elsewhere.
    pub fn dismiss_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired()) {
            self.notification = None;
        }
    }

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notification = Some(Notification::new(message, kind, NOTIFICATION_TTL_SECONDS));
    }

    // List fetch

    /// Issues a ticket for a list fetch, superseding any request still in
    /// flight. Pair with [`apply_list`] when driving the request from an
    /// external task.
    ///
    /// [`apply_list`]: TransactionManager::apply_list
    pub fn begin_list_fetch(&mut self) -> FetchTicket {
        self.list_guard.begin()
    }

    pub fn apply_list(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Transaction>, ClientError>,
    ) {
        if !self.list_guard.is_current(ticket) {
            return;
        }
        match outcome {
            Ok(transactions) => {
                self.transactions = transactions;
                self.last_error = None;
            }
            Err(err) => {
                error!("Error fetching transactions: {err}");
                self.last_error = Some(match err {
                    ClientError::Remote(_) => ERR_FETCH_TRANSACTIONS.to_string(),
                    other => other.to_string(),
                });
            }
        }
    }

    /// Fetches the full set for this scope (`is_paginate=false`) and
    /// replaces the in-memory collection with the response.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_list_fetch();
        let outcome = match self.scope {
            TransactionScope::Mine => self.client.my_transactions().await,
            TransactionScope::All => self.client.all_transactions().await,
        };
        self.apply_list(ticket, outcome);
    }

    // Cancel

    /// A cancel handle for the transaction, present only while its status
    /// is exactly `pending`.
    pub fn cancel_request(&self, transaction_id: i64) -> Option<CancelRequest> {
        self.transactions
            .iter()
            .find(|t| t.id == transaction_id && t.status.is_pending())
            .map(|t| CancelRequest {
                transaction_id: t.id,
            })
    }

    /// `pending -> cancelled`. The local view is not patched optimistically:
    /// after the service accepts the cancel, the full list is refetched for
    /// authoritative state. A banner is raised either way.
    pub async fn cancel(&mut self, request: CancelRequest) {
        match self.client.cancel_transaction(request.transaction_id).await {
            Ok(()) => {
                self.notify(MSG_TRANSACTION_CANCELLED, NotificationKind::Success);
                self.refresh().await;
            }
            Err(err) => {
                error!("Error cancelling transaction: {err}");
                let message = match &err {
                    ClientError::Conflict(m) | ClientError::Validation(m) => m.clone(),
                    _ => ERR_CANCEL_TRANSACTION.to_string(),
                };
                self.notify(message, NotificationKind::Error);
            }
        }
    }

    // Admin override

    /// Admin status override. When the service confirms the change the
    /// local record is patched in place immediately, with no confirmation
    /// refetch — deliberately asymmetric with [`cancel`].
    ///
    /// [`cancel`]: TransactionManager::cancel
    pub async fn override_status(
        &mut self,
        transaction_id: i64,
        status: TransactionStatus,
    ) -> Result<(), ClientError> {
        let confirmed = match self
            .client
            .update_transaction_status(transaction_id, &status)
            .await
        {
            Ok(confirmed) => confirmed,
            Err(err) => {
                error!("Failed to update status: {err}");
                return Err(err);
            }
        };

        if confirmed {
            if let Some(transaction) = self
                .transactions
                .iter_mut()
                .find(|t| t.id == transaction_id)
            {
                transaction.status = status;
            }
        }
        Ok(())
    }

    // Sort

    /// Re-orders the in-memory collection by `order_date` only, flipping
    /// direction on each invocation. Pure view-side state: the next refetch
    /// returns to server order.
    pub fn sort_by_order_date(&mut self) {
        let ascending = self.sort_ascending;
        self.transactions.sort_by(|a, b| {
            let key_a = parse_remote_date(&a.order_date);
            let key_b = parse_remote_date(&b.order_date);
            if ascending {
                key_a.cmp(&key_b)
            } else {
                key_b.cmp(&key_a)
            }
        });
        self.sort_ascending = !ascending;
    }

    /// Direction the next [`sort_by_order_date`] call will apply, for the
    /// toggle label.
    ///
    /// [`sort_by_order_date`]: TransactionManager::sort_by_order_date
    pub fn next_sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    // Proof of payment

    /// A proof-upload handle, present only while the transaction is
    /// pending.
    pub fn proof_request(&self, transaction_id: i64) -> Option<ProofRequest> {
        self.transactions
            .iter()
            .find(|t| t.id == transaction_id && t.status.is_pending())
            .map(|t| ProofRequest::new(t.id))
    }

    /// Opens the proof modal for one transaction, replacing any modal that
    /// was already open.
    pub fn open_proof(&mut self, request: ProofRequest) {
        self.proof = Some(ProofUpload::new(request.transaction_id()));
    }

    pub fn proof(&self) -> Option<&ProofUpload> {
        self.proof.as_ref()
    }

    /// Phase one: upload the image and hold the returned URL. On failure
    /// the modal stays open with an error banner and nothing is staged.
    pub async fn stage_proof(&mut self, file_name: &str, bytes: Vec<u8>) {
        if self.proof.is_none() {
            return;
        }
        match self.client.upload_image(file_name, bytes).await {
            Ok(url) => {
                if let Some(upload) = self.proof.as_mut() {
                    upload.stage(url);
                }
            }
            Err(err) => {
                error!("Failed to upload payment proof: {err}");
                self.notify(ERR_UPLOAD_PROOF, NotificationKind::Error);
            }
        }
    }

    /// Phase two: attach the staged URL to the transaction. A no-op until a
    /// staged URL exists. Success closes the modal, clears the staged URL,
    /// and refetches the list; the status itself is advanced only by the
    /// service once the proof is reviewed.
    pub async fn confirm_proof(&mut self) {
        let Some((transaction_id, url)) = self
            .proof
            .as_ref()
            .and_then(|u| u.staged_url().map(|url| (u.transaction_id(), url.to_string())))
        else {
            return;
        };

        match self.client.update_proof_payment(transaction_id, &url).await {
            Ok(()) => {
                self.proof = None;
                self.notify(MSG_PROOF_UPDATED, NotificationKind::Success);
                self.refresh().await;
            }
            Err(err) => {
                error!("Failed to update payment proof: {err}");
                let message = match &err {
                    ClientError::Conflict(m) | ClientError::Validation(m) => m.clone(),
                    _ => ERR_UPDATE_PROOF.to_string(),
                };
                self.notify(message, NotificationKind::Error);
            }
        }
    }

    /// Closes the modal, discarding any staged URL without an attach call.
    pub fn close_proof(&mut self) {
        self.proof = None;
    }
}
