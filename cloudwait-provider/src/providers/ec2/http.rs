//! EC2 Query API 请求方法

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::sign::{SigningRequest, SigningScope, authorization, canonical_query};
use super::types::ErrorResponse;
use super::{EC2_API_VERSION, EC2_SERVICE, EMPTY_BODY_SHA256, Ec2Provider};

impl Ec2Provider {
    /// 统一处理 EC2 响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: &ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        // 尝试解析结构化错误 (<Response><Errors><Error>)
        if let Ok(resp) = quick_xml::de::from_str::<ErrorResponse>(response_text)
            && let Some(error) = resp.errors.error.into_iter().next()
        {
            return Err(self.map_error(RawApiError::with_code(error.code, error.message), ctx));
        }

        // 回退到通用错误
        Err(self.unknown_error(RawApiError::new(format!(
            "HTTP {status}: {}",
            truncate_for_log(response_text)
        ))))
    }

    /// Runs one signed Query API action and parses the XML response.
    ///
    /// `params` are the action-specific parameters; `Action` and `Version`
    /// are added here.
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, &str)],
        region: &str,
        ctx: &ErrorContext,
    ) -> Result<T> {
        let mut all_params = vec![("Action", action), ("Version", EC2_API_VERSION)];
        all_params.extend_from_slice(params);
        let query = canonical_query(&all_params);

        let endpoint = self.endpoint_for(region);
        let (host, path) = self.endpoint_parts(&endpoint)?;
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

        let auth = authorization(
            &SigningRequest {
                method: "GET",
                host: &host,
                path: &path,
                query: &query,
                amz_date: &amz_date,
                session_token: self.session_token.as_deref(),
                payload_hash: EMPTY_BODY_SHA256,
            },
            &SigningScope {
                region,
                service: EC2_SERVICE,
            },
            &self.access_key_id,
            &self.secret_access_key,
        );

        // endpoint has no trailing slash, so this lands on `path`
        let url = format!("{endpoint}/?{query}");
        let mut request = self
            .client
            .get(&url)
            .header("Host", &host)
            .header("X-Amz-Date", &amz_date)
            .header("Authorization", auth);
        if let Some(token) = &self.session_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            action,
            self.max_retries,
        )
        .await?;

        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_xml(&response_text, self.provider_name())
    }
}
