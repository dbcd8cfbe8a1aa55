use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use colored::Colorize;
use env_logger::{Builder, Env};
use futures_util::future::LocalBoxFuture;
use log::{debug, error, info, warn, Level};
use std::future::{ready, Ready};
use std::io::Write;
use std::time::Instant;

/// Logs one line per request: route, status and latency, at a level
/// matching the status class.
pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggerMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService { service }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let route = format!("{} {}", req.method(), req.path());
        debug!("server request: {}", route);
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let elapsed = started.elapsed().as_millis();
            if status.is_server_error() {
                error!("server response: {} -> {} ({} ms)", route, status, elapsed);
            } else if status.is_client_error() {
                warn!("server response: {} -> {} ({} ms)", route, status, elapsed);
            } else {
                info!("server response: {} -> {} ({} ms)", route, status, elapsed);
            }
            Ok(res)
        })
    }
}

/// Level-coloured output; filter from `RUST_LOG`, `info` when unset.
pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = record.level();
            let tag = match level {
                Level::Error => level.as_str().red().bold(),
                Level::Warn => level.as_str().yellow().bold(),
                Level::Info => level.as_str().green().bold(),
                Level::Debug => level.as_str().blue().bold(),
                Level::Trace => level.as_str().magenta().bold(),
            };
            writeln!(buf, "{} - {}", tag, record.args())
        })
        .init()
}
