use super::ApplicationEnv;
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::{HttpMakeClassifier, TraceLayer},
};

pub struct ApplicationMiddleware {
    pub body_limit: RequestBodyLimitLayer,
    pub trace: TraceLayer<HttpMakeClassifier>,
}

pub fn create_middleware(env: &ApplicationEnv) -> ApplicationMiddleware {
    let body_limit = RequestBodyLimitLayer::new(env.max_http_content_len);
    let trace = TraceLayer::new_for_http();

    ApplicationMiddleware { body_limit, trace }
}
