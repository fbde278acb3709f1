//! Request metadata recorded with account activity.

use actix_web::http::header::USER_AGENT;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::ClientContext;

/// Caller IP address and user agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Client(pub ClientContext);

impl Client {
    /// Read the peer address and `User-Agent` header of `req`.
    pub fn from_http_request(req: &HttpRequest) -> Self {
        let ip_address = req.peer_addr().map(|addr| addr.ip().to_string());
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Self(ClientContext {
            ip_address,
            user_agent,
        })
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> ClientContext {
        self.0
    }
}

impl FromRequest for Client {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_http_request(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn reads_peer_and_user_agent() {
        let req = TestRequest::default()
            .peer_addr("203.0.113.7:51000".parse().expect("socket address"))
            .insert_header((USER_AGENT, "itinerary-app/2.1"))
            .to_http_request();

        let Client(context) = Client::from_http_request(&req);
        assert_eq!(context.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(context.user_agent.as_deref(), Some("itinerary-app/2.1"));
    }

    #[rstest]
    fn missing_metadata_is_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(Client::from_http_request(&req), Client::default());
    }
}
