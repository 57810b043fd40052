// web-server/src/middleware/session_auth.rs
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use common::models::session::AuthenticatedSession;
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects requests without a live session cookie.
///
/// On success the resolved [`AuthenticatedSession`] is stored in the request
/// extensions; handlers read it with `web::ReqData<AuthenticatedSession>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireSession;

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireSessionMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let authenticated = authenticate(&req).await;
            match authenticated {
                Ok(session) => {
                    req.extensions_mut().insert(session);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedSession, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state not configured".to_string()))?;

    let session_id = req
        .cookie(&state.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Session ID not found".to_string()))?;

    let entry = state.sessions.get(&session_id).ok_or_else(|| {
        tracing::debug!(path = req.path(), "Session cache miss");
        ApiError::MissingToken("Identity token not found for session".to_string())
    })?;

    let wallet_address = state.verifier.wallet_address(&entry.id_token).await?;
    tracing::debug!(age_secs = entry.age_seconds(), "Session resolved");

    Ok(AuthenticatedSession {
        session_id,
        id_token: entry.id_token,
        wallet_address,
    })
}
