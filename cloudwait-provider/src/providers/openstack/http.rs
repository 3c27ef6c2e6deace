//! OpenStack HTTP 请求方法

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::OpenstackProvider;
use super::types::FaultResponse;

/// Nova microversion that exposes `OS-EXT-AZ` and attachment ids.
const NOVA_MICROVERSION: &str = "2.1";

/// Which service endpoint a request goes to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Service {
    Compute,
    Volume,
}

impl OpenstackProvider {
    /// 统一处理响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: &ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        let message = serde_json::from_str::<FaultResponse>(response_text)
            .ok()
            .and_then(|faults| faults.into_values().next())
            .map_or_else(
                || truncate_for_log(response_text),
                |fault| fault.message,
            );

        Err(self.map_error(RawApiError::with_code(status.to_string(), message), ctx))
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        ctx: &ErrorContext,
    ) -> Result<T> {
        let base = match service {
            Service::Compute => &self.compute_endpoint,
            Service::Volume => &self.volume_endpoint,
        };
        let url = format!("{base}{path}");

        let mut request = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.auth_token)
            .header("Accept", "application/json");
        if matches!(service, Service::Compute) {
            request = request.header("X-OpenStack-Nova-API-Version", NOVA_MICROVERSION);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            &url,
            self.max_retries,
        )
        .await?;

        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }
}
