use async_trait::async_trait;
use event_portal_web::api::{join_url, Endpoint, Method, Transport};
use event_portal_web::config::PortalConfig;
use event_portal_web::error::{PortalError, PortalResult};
use reqwasm::http::Request;

use crate::dom::{csrf_header, CsrfHeader};

#[derive(Clone, Debug)]
pub struct HttpTransport {
    base: String,
    csrf: Option<CsrfHeader>,
}

impl HttpTransport {
    pub fn new(config: &PortalConfig) -> Self {
        Self {
            base: config.api_base.clone(),
            csrf: csrf_header(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, endpoint: Endpoint) -> PortalResult<String> {
        let url = join_url(&self.base, &endpoint.path());
        let mut req = match endpoint.method() {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        };
        req = req
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest");
        if endpoint.method() == Method::Post {
            if let Some(csrf) = &self.csrf {
                req = req.header(&csrf.name, &csrf.token);
            }
        }
        let resp = req
            .send()
            .await
            .map_err(|e| PortalError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PortalError::Network(format!("reading response failed: {e}")))?;
        if !resp.ok() {
            return Err(PortalError::Http { status, body: text });
        }
        Ok(text)
    }
}
