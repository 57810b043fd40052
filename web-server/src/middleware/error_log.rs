// web-server/src/middleware/error_log.rs
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

/// Logs every 5xx with the request path, status and cause
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorLog;

impl<S, B> Transform<S, ServiceRequest> for ErrorLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = ErrorLogMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorLogMiddleware { service }))
    }
}

pub struct ErrorLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();
        let method = req.method().clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let status = res.status();
                    if status.is_server_error() {
                        let cause = res
                            .response()
                            .error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "unknown".to_string());
                        tracing::error!(%method, path = %path, status = status.as_u16(), "Request failed: {}", cause);
                    }
                    Ok(res)
                },
                Err(e) => {
                    let status = e.as_response_error().status_code();
                    if status.is_server_error() {
                        tracing::error!(%method, path = %path, status = status.as_u16(), "Request failed: {}", e);
                    }
                    Err(e)
                }
            }
        })
    }
}
