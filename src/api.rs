use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::constants::ERR_UPLOAD_PROOF;
use crate::error::ClientError;
use crate::models::{
    Activity, ActivityPayload, Category, CategoryPayload, DataEnvelope, LoginPayload, LoginResult,
    PageResult, ResultEnvelope, Transaction, TransactionStatus, UpdateProofPayload,
    UpdateStatusPayload, UserProfile,
};
use crate::pagination::PageCursor;
use crate::session::Session;

fn build_query_params(params: &[(&str, Option<String>)]) -> String {
    let query_parts: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{}={}", urlencoding::encode(key), urlencoding::encode(v)))
        })
        .collect();

    if query_parts.is_empty() {
        String::new()
    } else {
        format!("?{}", query_parts.join("&"))
    }
}

/// Acknowledgement body of a mutating call; the service reports failure
/// through the `error` flag even on a 2xx.
#[derive(Deserialize)]
struct MutationAck {
    #[serde(default)]
    error: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

async fn remote_message(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    let value: serde_json::Value = serde_json::from_str(&body).ok()?;
    value.get("message")?.as_str().map(|s| s.to_string())
}

/// Client for the remote reservation service. Bearer-token auth comes from
/// the shared [`Session`]; a 401 on any call invalidates that session.
/// Requests are plain request/response pairs: no caching, no automatic
/// retry, no de-duplication of overlapping identical calls.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: Client::new(),
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}/{}", self.base_url, path_and_query)
    }

    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate().await;
            return Err(ClientError::NotAuthenticated);
        }

        let message = remote_message(response).await;
        match status {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => Err(ClientError::Conflict(
                message.unwrap_or_else(|| format!("Request failed with status {}", status)),
            )),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(
                ClientError::Validation(message.unwrap_or_else(|| "Invalid request".to_string())),
            ),
            _ => Err(ClientError::Remote(
                message.unwrap_or_else(|| format!("status {}", status)),
            )),
        }
    }

    async fn get_result<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<T, ClientError> {
        let builder = self.authorized(self.http.get(self.url(path_and_query))).await;
        let response = self.check(builder.send().await?).await?;
        let envelope: ResultEnvelope<T> = response.json().await?;
        Ok(envelope.result)
    }

    async fn post_ack<P: serde::Serialize>(
        &self,
        path: &str,
        payload: Option<&P>,
    ) -> Result<bool, ClientError> {
        let mut builder = self.http.post(self.url(path));
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        let builder = self.authorized(builder).await;
        let response = self.check(builder.send().await?).await?;
        let ack: MutationAck = response.json().await?;
        if ack.error == Some(true) {
            return Err(ClientError::Remote(
                ack.message.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        Ok(true)
    }

    // Auth

    /// Logs in, stores the bearer token, then resolves the profile through
    /// `me` so the role is available for admin gating.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .check(self.http.post(self.url("login")).json(&payload).send().await?)
            .await?;
        let envelope: DataEnvelope<LoginResult> = response.json().await?;
        self.session.authenticate(envelope.data.token).await;

        let profile = self.me().await?;
        self.session.set_profile(profile.clone()).await;
        Ok(profile)
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let builder = self.authorized(self.http.get(self.url("me"))).await;
        let response = self.check(builder.send().await?).await?;
        let envelope: DataEnvelope<UserProfile> = response.json().await?;
        Ok(envelope.data)
    }

    // Catalog

    pub async fn get_categories(
        &self,
        cursor: &PageCursor,
    ) -> Result<PageResult<Category>, ClientError> {
        let query = build_query_params(&[
            ("is_paginate", Some("true".to_string())),
            ("per_page", Some(cursor.per_page().to_string())),
            ("page", Some(cursor.page().to_string())),
        ]);
        self.get_result(&format!("sport-categories{}", query)).await
    }

    pub async fn get_categories_unpaginated(&self) -> Result<Vec<Category>, ClientError> {
        self.get_result("sport-categories?is_paginate=false").await
    }

    pub async fn get_activities_page(
        &self,
        cursor: &PageCursor,
    ) -> Result<PageResult<Activity>, ClientError> {
        let query = build_query_params(&[
            ("is_paginate", Some("true".to_string())),
            ("per_page", Some(cursor.per_page().to_string())),
            ("page", Some(cursor.page().to_string())),
        ]);
        self.get_result(&format!("sport-activities{}", query)).await
    }

    /// All activities for one category in a single unpaginated response.
    pub async fn get_activities_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Activity>, ClientError> {
        let query = build_query_params(&[
            ("is_paginate", Some("false".to_string())),
            ("sport_category_id", Some(category_id.to_string())),
        ]);
        self.get_result(&format!("sport-activities{}", query)).await
    }

    pub async fn get_activity(&self, activity_id: i64) -> Result<Activity, ClientError> {
        self.get_result(&format!("sport-activities/{}", activity_id))
            .await
    }

    // Transactions

    pub async fn my_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.get_result("my-transaction?is_paginate=false").await
    }

    pub async fn all_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.get_result("all-transaction?is_paginate=false").await
    }

    pub async fn cancel_transaction(&self, transaction_id: i64) -> Result<(), ClientError> {
        self.post_ack::<()>(&format!("transaction/cancel/{}", transaction_id), None)
            .await?;
        Ok(())
    }

    /// Admin status override. Returns whether the service confirmed the
    /// change (`error == false`); only a confirmed change may be patched
    /// into local state.
    pub async fn update_transaction_status(
        &self,
        transaction_id: i64,
        status: &TransactionStatus,
    ) -> Result<bool, ClientError> {
        let payload = UpdateStatusPayload {
            status: status.clone(),
        };
        self.post_ack(
            &format!("transaction/update-status/{}", transaction_id),
            Some(&payload),
        )
        .await
    }

    /// Stages an image in blob storage and returns its URL. No transaction
    /// association happens here; that is `update_proof_payment`.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .check(
                self.http
                    .post(self.url("upload-image"))
                    .multipart(form)
                    .send()
                    .await?,
            )
            .await?;
        let envelope: ResultEnvelope<String> = response.json().await?;
        if envelope.error == Some(true) {
            return Err(ClientError::Remote(
                envelope
                    .message
                    .unwrap_or_else(|| ERR_UPLOAD_PROOF.to_string()),
            ));
        }
        Ok(envelope.result)
    }

    pub async fn update_proof_payment(
        &self,
        transaction_id: i64,
        proof_url: &str,
    ) -> Result<(), ClientError> {
        let payload = UpdateProofPayload {
            proof_payment_url: proof_url.to_string(),
        };
        self.post_ack(
            &format!("transaction/update-proof-payment/{}", transaction_id),
            Some(&payload),
        )
        .await?;
        Ok(())
    }

    // Admin catalog management

    pub async fn create_category(&self, name: &str) -> Result<(), ClientError> {
        let payload = CategoryPayload {
            name: name.to_string(),
        };
        self.post_ack("sport-categories/create", Some(&payload))
            .await?;
        Ok(())
    }

    pub async fn update_category(&self, category_id: i64, name: &str) -> Result<(), ClientError> {
        let payload = CategoryPayload {
            name: name.to_string(),
        };
        self.post_ack(
            &format!("sport-categories/update/{}", category_id),
            Some(&payload),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_category(&self, category_id: i64) -> Result<(), ClientError> {
        let builder = self
            .authorized(
                self.http
                    .delete(self.url(&format!("sport-categories/delete/{}", category_id))),
            )
            .await;
        self.check(builder.send().await?).await?;
        Ok(())
    }

    pub async fn create_activity(&self, payload: &ActivityPayload) -> Result<(), ClientError> {
        self.post_ack("sport-activities", Some(payload)).await?;
        Ok(())
    }

    pub async fn update_activity(
        &self,
        activity_id: i64,
        payload: &ActivityPayload,
    ) -> Result<(), ClientError> {
        let builder = self
            .authorized(
                self.http
                    .put(self.url(&format!("sport-activities/update/{}", activity_id)))
                    .json(payload),
            )
            .await;
        self.check(builder.send().await?).await?;
        Ok(())
    }

    pub async fn delete_activity(&self, activity_id: i64) -> Result<(), ClientError> {
        let builder = self
            .authorized(
                self.http
                    .delete(self.url(&format!("sport-activities/delete/{}", activity_id))),
            )
            .await;
        self.check(builder.send().await?).await?;
        Ok(())
    }
}
